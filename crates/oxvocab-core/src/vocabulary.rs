//! Vocabulary list loading.
//!
//! Reads a CSV file with at least the columns `word`, `class` and `level`
//! (extra columns are ignored). Values are trimmed and lowercased, rows with
//! an empty field or an unknown level are dropped, and duplicate rows are
//! collapsed.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::CoreError;
use crate::model::{CefrLevel, VocabularyEntry};

const REQUIRED_COLUMNS: [&str; 3] = ["word", "class", "level"];

/// Load a vocabulary CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<VocabularyEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary file: {}", path.display()))?;

    let entries = load_csv_str(&content)
        .with_context(|| format!("failed to parse vocabulary file: {}", path.display()))?;

    tracing::info!(
        "loaded {} words from {}",
        entries.len(),
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    Ok(entries)
}

/// Parse vocabulary CSV content (useful for testing).
pub fn load_csv_str(content: &str) -> Result<Vec<VocabularyEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let mut indices = [0usize; 3];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = column(name).ok_or_else(|| {
            CoreError::Vocabulary(format!(
                "CSV must contain columns: {}",
                REQUIRED_COLUMNS.join(", ")
            ))
        })?;
    }
    let [word_idx, class_idx, level_idx] = indices;

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut dropped = 0usize;

    for row in reader.records() {
        let row = row.context("malformed CSV row")?;
        let field = |idx: usize| row.get(idx).unwrap_or_default().trim().to_lowercase();

        let word = field(word_idx);
        let class = field(class_idx);
        let level = field(level_idx).parse::<CefrLevel>();

        match level {
            Ok(level) if !word.is_empty() && !class.is_empty() => {
                let entry = VocabularyEntry { word, class, level };
                if seen.insert(entry.clone()) {
                    entries.push(entry);
                }
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!("dropped {dropped} vocabulary row(s) with missing fields or unknown level");
    }

    Ok(entries)
}
