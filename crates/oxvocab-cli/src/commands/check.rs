//! The `oxvocab check` command: report what a game needs before starting one.

use std::path::PathBuf;

use anyhow::Result;

use oxvocab_core::model::CefrLevel;
use oxvocab_core::traits::Translator;
use oxvocab_core::vocabulary::load_csv;
use oxvocab_providers::{load_config_from, QuizConfig};

pub async fn execute(
    translate: Option<String>,
    class: String,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let mut issues = 0;

    println!("Provider: {} (model {})", config.default_provider, config.default_model);
    println!("Target language: {}", config.target_language);
    println!(
        "Retries: {} (base delay {} ms), timeout {} s",
        config.max_retries, config.retry_delay_ms, config.timeout_secs
    );

    issues += check_credentials(&config);
    issues += check_data_file(&config);

    if config.scores_dir.is_dir() {
        println!("[ok] scores directory: {}", config.scores_dir.display());
    } else {
        println!(
            "[ok] scores directory: {} (created on first game)",
            config.scores_dir.display()
        );
    }

    if let Some(word) = translate {
        match config.build_translator() {
            Ok(translator) => match translator.translate(&word, &class).await {
                Ok(meanings) if !meanings.is_empty() => {
                    println!("[ok] {word} ({class}): {}", meanings.join(", "));
                }
                Ok(_) => {
                    println!("[!!] {word} ({class}): no meanings returned");
                    issues += 1;
                }
                Err(e) => {
                    println!("[!!] translation failed: {e:#}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("[!!] translator unavailable: {e:#}");
                issues += 1;
            }
        }
    }

    if issues > 0 {
        anyhow::bail!("environment check found {issues} issue(s)");
    }
    println!("\nAll checks passed.");
    Ok(())
}

fn check_credentials(config: &QuizConfig) -> usize {
    match config.provider_config() {
        Ok(provider) if provider.has_credentials() => {
            println!("[ok] provider '{}' is configured", config.default_provider);
            0
        }
        Ok(_) => {
            println!(
                "[!!] provider '{}' has no API key; set GROQ_API_KEY",
                config.default_provider
            );
            1
        }
        Err(e) => {
            println!("[!!] {e:#}");
            1
        }
    }
}

fn check_data_file(config: &QuizConfig) -> usize {
    match load_csv(&config.data_file) {
        Ok(entries) if entries.is_empty() => {
            println!("[!!] {} contains no usable words", config.data_file.display());
            1
        }
        Ok(entries) => {
            println!(
                "[ok] vocabulary: {} words in {}",
                entries.len(),
                config.data_file.display()
            );
            for level in CefrLevel::ALL {
                let count = entries.iter().filter(|e| e.level == level).count();
                println!("     {}: {count}", level.as_str().to_uppercase());
            }
            0
        }
        Err(e) => {
            println!("[!!] vocabulary: {e:#}");
            1
        }
    }
}
