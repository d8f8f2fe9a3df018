//! The `oxvocab reset` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};

use oxvocab_core::model::CefrLevel;
use oxvocab_core::scores::TopScores;
use oxvocab_providers::load_config_from;

use crate::context::{open_selector, DataPaths};

pub fn execute(
    yes: bool,
    level: Option<CefrLevel>,
    word: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let paths = DataPaths::from(&config);
    let mut selector = open_selector(&config, &paths)?;

    if let Some(word) = word {
        let word = word.trim().to_lowercase();
        let matches: Vec<_> = selector
            .vocabulary()
            .iter()
            .filter(|entry| entry.word == word)
            .filter(|entry| level.map_or(true, |l| entry.level == l))
            .cloned()
            .collect();
        if matches.is_empty() {
            anyhow::bail!("'{word}' is not in the vocabulary");
        }
        for entry in &matches {
            selector.reset_word(entry)?;
        }
        println!("Reset statistics for {} entr(ies) of '{word}'.", matches.len());
        return Ok(());
    }

    let scope = match level {
        Some(level) => format!("all {} progress and its high score", level.as_str().to_uppercase()),
        None => "ALL progress and high scores".to_string(),
    };
    if !yes && !confirm(&scope)? {
        println!("Reset cancelled.");
        return Ok(());
    }

    let mut scores = TopScores::load(&paths.top_scores());
    match level {
        Some(level) => {
            selector.reset_level(level)?;
            scores.reset_level(level);
        }
        None => {
            selector.reset_all()?;
            scores = TopScores::default();
        }
    }
    scores.save(&paths.top_scores())?;
    println!("Reset {scope}.");
    Ok(())
}

fn confirm(scope: &str) -> Result<bool> {
    println!("This will reset {scope}!");
    println!("Type 'RESET' to confirm:");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read confirmation")?;
    Ok(line.trim() == "RESET")
}
