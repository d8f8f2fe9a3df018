//! The `oxvocab stats` command.

use std::path::PathBuf;

use anyhow::Result;

use oxvocab_core::model::CefrLevel;
use oxvocab_core::scores::{TopScores, WordHistory};
use oxvocab_providers::load_config_from;

use crate::context::{open_selector, DataPaths};
use crate::report;

pub fn execute(level: Option<CefrLevel>, limit: usize, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let paths = DataPaths::from(&config);
    let selector = open_selector(&config, &paths)?;
    let scores = TopScores::load(&paths.top_scores());
    let history = WordHistory::load(&paths.history());

    println!("High Scores:");
    println!("{}", report::high_scores_table(&scores));

    if !scores.sessions.is_empty() {
        println!("\nRecent Sessions:");
        println!("{}", report::sessions_table(&scores, limit));
    }

    let levels: Vec<CefrLevel> = match level {
        Some(level) => vec![level],
        None => CefrLevel::ALL.to_vec(),
    };
    println!("\nLearning Progress:");
    println!("{}", report::level_progress_table(&selector, &levels));

    let difficult = selector.difficult_words(level, limit);
    if difficult.is_empty() {
        println!("\nNo difficult words yet.");
    } else {
        println!("\nWords Needing Practice:");
        println!("{}", report::word_table(&difficult));
    }

    let mastered = selector.mastered_words(level, limit);
    if !mastered.is_empty() {
        println!("\nMastered Words:");
        println!("{}", report::word_table(&mastered));
    }

    if !history.wrong_words.is_empty() {
        println!("\nRecently Missed Words:");
        println!("{}", report::history_table(&history.wrong_words, limit));
    }

    Ok(())
}
