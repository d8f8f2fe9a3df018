//! Aggregate learning statistics derived from the weight table.

use serde::{Deserialize, Serialize};

use crate::model::{CefrLevel, WordKey, WordRecord};
use crate::selector::WeightSelector;

/// Minimum attempts before a word can show up as difficult.
pub const DIFFICULT_MIN_ATTEMPTS: u32 = 2;
/// Minimum weight for a word to count as difficult.
pub const DIFFICULT_MIN_WEIGHT: f64 = 1.5;

/// Progress summary for one CEFR level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStatistics {
    /// Words with a record at this level.
    pub total_words: usize,
    pub total_attempts: u32,
    pub total_correct: u32,
    /// `total_correct / total_attempts` as a percentage, 0 without attempts.
    pub average_accuracy: f64,
    /// Percentage of this level's words that are mastered.
    pub mastery_level: f64,
}

/// One row of a difficult/mastered word listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSummary {
    #[serde(flatten)]
    pub key: WordKey,
    pub weight: f64,
    /// Percentage.
    pub accuracy: f64,
    pub attempts: u32,
    pub consecutive_correct: u32,
    pub consecutive_wrong: u32,
}

impl WordSummary {
    fn new(key: &WordKey, record: &WordRecord) -> Self {
        Self {
            key: key.clone(),
            weight: record.weight,
            accuracy: record.accuracy_percent(),
            attempts: record.total_attempts,
            consecutive_correct: record.consecutive_correct,
            consecutive_wrong: record.consecutive_wrong,
        }
    }
}

/// Full dump of the weight table for offline analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsExport {
    pub total_words: usize,
    pub words: Vec<ExportedWord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedWord {
    #[serde(flatten)]
    pub key: WordKey,
    /// Percentage.
    pub accuracy: f64,
    #[serde(flatten)]
    pub record: WordRecord,
}

impl WeightSelector {
    /// Aggregate progress at `level`.
    pub fn level_statistics(&self, level: CefrLevel) -> LevelStatistics {
        let level_records: Vec<&WordRecord> = self
            .records()
            .iter()
            .filter(|(key, _)| key.level == level)
            .map(|(_, record)| record)
            .collect();

        if level_records.is_empty() {
            return LevelStatistics::default();
        }

        let total_words = level_records.len();
        let total_attempts: u32 = level_records.iter().map(|r| r.total_attempts).sum();
        let total_correct: u32 = level_records.iter().map(|r| r.correct_count).sum();

        let average_accuracy = if total_attempts > 0 {
            total_correct as f64 / total_attempts as f64 * 100.0
        } else {
            0.0
        };

        let mastered = level_records.iter().filter(|r| r.is_mastered()).count();
        let mastery_level = mastered as f64 / total_words as f64 * 100.0;

        LevelStatistics {
            total_words,
            total_attempts,
            total_correct,
            average_accuracy,
            mastery_level,
        }
    }

    /// Words needing practice, highest weight first.
    pub fn difficult_words(&self, level: Option<CefrLevel>, limit: usize) -> Vec<WordSummary> {
        let mut words: Vec<WordSummary> = self
            .filtered(level)
            .filter(|(_, r)| {
                r.total_attempts >= DIFFICULT_MIN_ATTEMPTS && r.weight >= DIFFICULT_MIN_WEIGHT
            })
            .map(|(key, record)| WordSummary::new(key, record))
            .collect();

        words.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.key.cmp(&b.key)));
        words.truncate(limit);
        words
    }

    /// Mastered words, best accuracy first, then longest streak.
    pub fn mastered_words(&self, level: Option<CefrLevel>, limit: usize) -> Vec<WordSummary> {
        let mut words: Vec<WordSummary> = self
            .filtered(level)
            .filter(|(_, r)| r.is_mastered())
            .map(|(key, record)| WordSummary::new(key, record))
            .collect();

        words.sort_by(|a, b| {
            b.accuracy
                .total_cmp(&a.accuracy)
                .then_with(|| b.consecutive_correct.cmp(&a.consecutive_correct))
                .then_with(|| a.key.cmp(&b.key))
        });
        words.truncate(limit);
        words
    }

    /// Every record with its derived accuracy, sorted by key.
    pub fn export(&self) -> StatisticsExport {
        let mut words: Vec<ExportedWord> = self
            .records()
            .iter()
            .map(|(key, record)| ExportedWord {
                key: key.clone(),
                accuracy: record.accuracy_percent(),
                record: record.clone(),
            })
            .collect();
        words.sort_by(|a, b| a.key.cmp(&b.key));

        StatisticsExport {
            total_words: words.len(),
            words,
        }
    }

    fn filtered(
        &self,
        level: Option<CefrLevel>,
    ) -> impl Iterator<Item = (&WordKey, &WordRecord)> + '_ {
        self.records()
            .iter()
            .filter(move |(key, _)| level.map_or(true, |l| key.level == l))
    }
}
