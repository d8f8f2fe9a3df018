use criterion::{black_box, criterion_group, criterion_main, Criterion};

use oxvocab_core::meanings::parse_meanings;
use oxvocab_core::validation::is_valid;

fn bench_is_valid(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_valid");

    let meanings = vec![
        "rumah".to_string(),
        "tempat tinggal".to_string(),
        "kediaman".to_string(),
        "hunian keluarga".to_string(),
    ];

    group.bench_function("exact", |b| {
        b.iter(|| is_valid(black_box("rumah"), black_box(&meanings)))
    });

    group.bench_function("single_token", |b| {
        b.iter(|| is_valid(black_box("tinggal"), black_box(&meanings)))
    });

    group.bench_function("multi_token", |b| {
        b.iter(|| is_valid(black_box("keluarga hunian"), black_box(&meanings)))
    });

    group.bench_function("rejected", |b| {
        b.iter(|| is_valid(black_box("mobil"), black_box(&meanings)))
    });

    group.finish();
}

fn bench_parse_meanings(c: &mut Criterion) {
    let simple = "rumah, tempat tinggal, kediaman";
    let listed = "1. rumah\n2. tempat tinggal\n3. kediaman\n* hunian\n- \"griya\"";
    let noisy = {
        let mut s = String::new();
        for i in 0..40 {
            s.push_str(&format!("arti{i}; Arti{i} | "));
        }
        s
    };

    let mut group = c.benchmark_group("parse_meanings");
    group.bench_function("simple", |b| b.iter(|| parse_meanings(black_box(simple))));
    group.bench_function("listed", |b| b.iter(|| parse_meanings(black_box(listed))));
    group.bench_function("noisy", |b| b.iter(|| parse_meanings(black_box(&noisy))));
    group.finish();
}

criterion_group!(benches, bench_is_valid, bench_parse_meanings);
criterion_main!(benches);
