//! Core data model types for oxvocab.
//!
//! These are the fundamental types shared by the selector, the stores, and
//! the driving loop: CEFR levels, vocabulary entries, composite word keys and
//! per-word performance records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Common European Framework of Reference difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// All levels, weakest first.
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Levels used by adventure mode.
    pub const ADVENTURE: [CefrLevel; 4] =
        [CefrLevel::A1, CefrLevel::A2, CefrLevel::B1, CefrLevel::B2];

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "a1",
            CefrLevel::A2 => "a2",
            CefrLevel::B1 => "b1",
            CefrLevel::B2 => "b2",
            CefrLevel::C1 => "c1",
            CefrLevel::C2 => "c2",
        }
    }

    /// Human-readable description, "<Name> - <summary>".
    pub fn description(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "Beginner - Basic everyday expressions",
            CefrLevel::A2 => "Elementary - Simple phrases and frequently used expressions",
            CefrLevel::B1 => "Intermediate - Clear standard input on familiar matters",
            CefrLevel::B2 => "Upper-Intermediate - Complex text on concrete and abstract topics",
            CefrLevel::C1 => "Advanced - Wide range of demanding texts",
            CefrLevel::C2 => "Proficient - Virtually everything heard or read",
        }
    }

    /// Short name without the summary (e.g. "Beginner").
    pub fn title(&self) -> &'static str {
        self.description()
            .split(" - ")
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a1" => Ok(CefrLevel::A1),
            "a2" => Ok(CefrLevel::A2),
            "b1" => Ok(CefrLevel::B1),
            "b2" => Ok(CefrLevel::B2),
            "c1" => Ok(CefrLevel::C1),
            "c2" => Ok(CefrLevel::C2),
            other => Err(format!("unknown CEFR level: {other}")),
        }
    }
}

/// A word from the vocabulary list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// The English word.
    pub word: String,
    /// Part of speech (e.g. "noun", "verb").
    pub class: String,
    /// CEFR difficulty level.
    pub level: CefrLevel,
}

impl VocabularyEntry {
    pub fn new(word: impl Into<String>, class: impl Into<String>, level: CefrLevel) -> Self {
        Self {
            word: word.into(),
            class: class.into(),
            level,
        }
    }

    /// The composite key identifying this entry's performance record.
    pub fn key(&self) -> WordKey {
        WordKey {
            word: self.word.clone(),
            class: self.class.clone(),
            level: self.level,
        }
    }
}

/// Composite (word, part-of-speech, level) key of a [`WordRecord`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordKey {
    pub word: String,
    pub class: String,
    pub level: CefrLevel,
}

impl WordKey {
    pub fn to_entry(&self) -> VocabularyEntry {
        VocabularyEntry::new(self.word.clone(), self.class.clone(), self.level)
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.word, self.class, self.level)
    }
}

/// Rolling performance of the learner on a single word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Relative draw weight, kept in `[MIN_WEIGHT, MAX_WEIGHT]`.
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub wrong_count: u32,
    /// Always `correct_count + wrong_count`.
    #[serde(default)]
    pub total_attempts: u32,
    #[serde(default)]
    pub consecutive_correct: u32,
    #[serde(default)]
    pub consecutive_wrong: u32,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 5.0;

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl Default for WordRecord {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            correct_count: 0,
            wrong_count: 0,
            total_attempts: 0,
            consecutive_correct: 0,
            consecutive_wrong: 0,
            last_seen: None,
        }
    }
}

impl WordRecord {
    /// Fraction of correct answers in `[0, 1]`, or `None` before the first attempt.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_attempts == 0 {
            None
        } else {
            Some(self.correct_count as f64 / self.total_attempts as f64)
        }
    }

    /// Accuracy as a percentage, 0 when never attempted.
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy().map(|a| a * 100.0).unwrap_or(0.0)
    }

    /// At least three attempts with 80% or better accuracy.
    pub fn is_mastered(&self) -> bool {
        self.total_attempts >= 3 && self.accuracy().is_some_and(|a| a >= 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_display_and_parse() {
        assert_eq!(CefrLevel::B2.to_string(), "b2");
        assert_eq!("A1".parse::<CefrLevel>().unwrap(), CefrLevel::A1);
        assert_eq!(" c2 ".parse::<CefrLevel>().unwrap(), CefrLevel::C2);
        assert!("d1".parse::<CefrLevel>().is_err());
        assert!("".parse::<CefrLevel>().is_err());
    }

    #[test]
    fn level_title() {
        assert_eq!(CefrLevel::A1.title(), "Beginner");
        assert_eq!(CefrLevel::B2.title(), "Upper-Intermediate");
    }

    #[test]
    fn level_serializes_lowercase() {
        let json = serde_json::to_string(&CefrLevel::B1).unwrap();
        assert_eq!(json, "\"b1\"");
    }

    #[test]
    fn record_defaults() {
        let record = WordRecord::default();
        assert_eq!(record.weight, 1.0);
        assert_eq!(record.total_attempts, 0);
        assert!(record.accuracy().is_none());
        assert_eq!(record.accuracy_percent(), 0.0);
        assert!(!record.is_mastered());
    }

    #[test]
    fn record_partial_json_fills_defaults() {
        let record: WordRecord =
            serde_json::from_str(r#"{"correct_count": 2, "total_attempts": 2}"#).unwrap();
        assert_eq!(record.weight, 1.0);
        assert_eq!(record.correct_count, 2);
        assert!(record.last_seen.is_none());
    }

    #[test]
    fn keys_with_underscores_stay_distinct() {
        let a = VocabularyEntry::new("ice_cream", "noun", CefrLevel::A1).key();
        let b = VocabularyEntry::new("ice", "cream_noun", CefrLevel::A1).key();
        assert_ne!(a, b);
    }
}
