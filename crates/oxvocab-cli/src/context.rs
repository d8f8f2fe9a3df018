//! Locations of the persisted documents and construction of the selector.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use oxvocab_core::scores::{SESSION_FILE, TOP_SCORES_FILE, WEIGHTS_FILE, WORD_HISTORY_FILE};
use oxvocab_core::selector::WeightSelector;
use oxvocab_core::store::JsonWeightStore;
use oxvocab_core::vocabulary::load_csv;
use oxvocab_providers::QuizConfig;

/// Files kept under the scores directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn weights(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    pub fn top_scores(&self) -> PathBuf {
        self.dir.join(TOP_SCORES_FILE)
    }

    pub fn history(&self) -> PathBuf {
        self.dir.join(WORD_HISTORY_FILE)
    }

    pub fn session(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Timestamped export file name, e.g. `export_20240131_174501.json`.
    pub fn export_file(&self, at: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("export_{}.json", at.format("%Y%m%d_%H%M%S")))
    }

    /// Remove every JSON document in the directory. Returns how many were
    /// deleted.
    pub fn remove_documents(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match std::fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("could not remove {}: {e}", path.display()),
                }
            }
        }
        Ok(removed)
    }
}

impl From<&QuizConfig> for DataPaths {
    fn from(config: &QuizConfig) -> Self {
        Self::new(&config.scores_dir)
    }
}

/// Load the vocabulary and the persisted weights.
pub fn open_selector(config: &QuizConfig, paths: &DataPaths) -> Result<WeightSelector> {
    let vocabulary = load_csv(&config.data_file)?;
    WeightSelector::new(vocabulary, Box::new(JsonWeightStore::new(paths.weights())))
}
