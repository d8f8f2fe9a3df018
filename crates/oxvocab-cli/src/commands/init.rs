//! The `oxvocab init` command.

use std::path::Path;

use anyhow::{Context, Result};

use oxvocab_providers::config::CONFIG_FILE;
use oxvocab_providers::QuizConfig;

pub fn execute() -> Result<()> {
    let defaults = QuizConfig::default();

    if Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE, QuizConfig::template())
            .with_context(|| format!("failed to write {CONFIG_FILE}"))?;
        println!("Created {CONFIG_FILE}");
    }

    let data_file = &defaults.data_file;
    if data_file.exists() {
        println!("{} already exists, skipping.", data_file.display());
    } else {
        if let Some(parent) = data_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(data_file, SAMPLE_VOCABULARY)
            .with_context(|| format!("failed to write {}", data_file.display()))?;
        println!("Created {}", data_file.display());
    }

    println!("\nNext steps:");
    println!("  1. Export GROQ_API_KEY or edit {CONFIG_FILE}");
    println!("  2. Replace {} with the full word list", data_file.display());
    println!("  3. Run: oxvocab check --translate home");
    println!("  4. Run: oxvocab");

    Ok(())
}

const SAMPLE_VOCABULARY: &str = "\
word,class,level
home,noun,a1
water,noun,a1
friend,noun,a1
good,adjective,a1
book,noun,a1
city,noun,a2
teacher,noun,a2
important,adjective,a2
history,noun,b1
education,noun,b1
issue,noun,b2
business,noun,b2
";
