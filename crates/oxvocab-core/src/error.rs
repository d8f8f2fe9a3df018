//! Core error types.

use thiserror::Error;

use crate::model::CefrLevel;

/// Errors raised by the word selector and the vocabulary loader.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The level filter left no candidate words.
    #[error("no words available for level: {}", level_label(level))]
    NoWordsAvailable { level: Option<CefrLevel> },

    /// The weight store could not be written. In-memory state is kept.
    #[error("failed to persist word weights: {0}")]
    Persistence(String),

    /// The vocabulary source is unusable.
    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),
}

fn level_label(level: &Option<CefrLevel>) -> String {
    level.map(|l| l.to_string()).unwrap_or_else(|| "any".into())
}

impl CoreError {
    /// Returns `true` if the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CoreError::Persistence(_))
    }
}
