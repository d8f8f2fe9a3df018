//! Statistics tables and the export document.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};
use serde::Serialize;

use oxvocab_core::model::CefrLevel;
use oxvocab_core::scores::{save_json, GameMode, HistoryEntry, TopScores};
use oxvocab_core::selector::WeightSelector;
use oxvocab_core::statistics::{StatisticsExport, WordSummary};
use oxvocab_core::traits::CacheStats;

/// Everything written by an export.
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub export_time: DateTime<Utc>,
    pub game_scores: TopScores,
    pub word_statistics: StatisticsExport,
    pub cache_stats: CacheStats,
}

impl ExportDocument {
    pub fn new(selector: &WeightSelector, scores: &TopScores, cache_stats: CacheStats) -> Self {
        Self {
            export_time: Utc::now(),
            game_scores: scores.clone(),
            word_statistics: selector.export(),
            cache_stats,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        save_json(path, self)
    }
}

pub fn high_scores_table(scores: &TopScores) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Best"]);
    table.add_row(vec![Cell::new("Overall"), Cell::new(scores.overall)]);
    table.add_row(vec![
        Cell::new("Custom mode"),
        Cell::new(scores.mode_best(GameMode::Custom)),
    ]);
    table.add_row(vec![
        Cell::new("Adventure mode"),
        Cell::new(scores.mode_best(GameMode::Adventure)),
    ]);
    for level in CefrLevel::ALL {
        table.add_row(vec![
            Cell::new(format!("{} ({})", level.as_str().to_uppercase(), level.title())),
            Cell::new(scores.level_best(level)),
        ]);
    }
    table
}

pub fn level_progress_table(selector: &WeightSelector, levels: &[CefrLevel]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Level", "Words", "Attempts", "Avg Accuracy", "Mastery"]);
    for level in levels {
        let stats = selector.level_statistics(*level);
        table.add_row(vec![
            Cell::new(level.as_str().to_uppercase()),
            Cell::new(stats.total_words),
            Cell::new(stats.total_attempts),
            Cell::new(format!("{:.1}%", stats.average_accuracy)),
            Cell::new(format!("{:.1}%", stats.mastery_level)),
        ]);
    }
    table
}

pub fn word_table(words: &[WordSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Word", "Class", "Level", "Accuracy", "Attempts", "Weight"]);
    for word in words {
        table.add_row(vec![
            Cell::new(&word.key.word),
            Cell::new(&word.key.class),
            Cell::new(word.key.level.as_str().to_uppercase()),
            Cell::new(format!("{:.1}%", word.accuracy)),
            Cell::new(word.attempts),
            Cell::new(format!("{:.2}", word.weight)),
        ]);
    }
    table
}

pub fn sessions_table(scores: &TopScores, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Score", "Mode", "Level", "Accuracy"]);
    for session in scores.sessions.iter().rev().take(limit) {
        table.add_row(vec![
            Cell::new(session.start_time.format("%Y-%m-%d %H:%M")),
            Cell::new(session.final_score.unwrap_or(session.words_correct)),
            Cell::new(session.mode),
            Cell::new(
                session
                    .target_level
                    .map_or_else(|| "random".to_string(), |l| l.as_str().to_uppercase()),
            ),
            Cell::new(format!("{:.1}%", session.accuracy())),
        ]);
    }
    table
}

pub fn history_table(entries: &[HistoryEntry], limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Word", "Class", "Level", "Meanings"]);
    for item in entries.iter().take(limit) {
        let shown: Vec<&str> = item.meanings.iter().take(3).map(String::as_str).collect();
        let mut meanings = shown.join(", ");
        if item.meanings.len() > 3 {
            meanings.push_str(", ...");
        }
        table.add_row(vec![
            Cell::new(&item.entry.word),
            Cell::new(&item.entry.class),
            Cell::new(item.entry.level.as_str().to_uppercase()),
            Cell::new(meanings),
        ]);
    }
    table
}
