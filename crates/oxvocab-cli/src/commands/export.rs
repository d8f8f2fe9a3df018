//! The `oxvocab export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use oxvocab_core::scores::TopScores;
use oxvocab_core::traits::CacheStats;
use oxvocab_providers::load_config_from;

use crate::context::{open_selector, DataPaths};
use crate::report::ExportDocument;

pub fn execute(output: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let paths = DataPaths::from(&config);
    let selector = open_selector(&config, &paths)?;
    let scores = TopScores::load(&paths.top_scores());

    let path = match output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(paths.dir())
                .with_context(|| format!("failed to create {}", paths.dir().display()))?;
            paths.export_file(Local::now())
        }
    };

    // The translation cache lives only as long as a game process.
    ExportDocument::new(&selector, &scores, CacheStats::default()).write(&path)?;
    println!("Statistics exported to: {}", path.display());
    Ok(())
}
