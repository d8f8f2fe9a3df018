//! High scores, session statistics, and word history.
//!
//! All three are plain JSON documents under the scores directory. A missing
//! or unreadable file loads as the default document.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{CefrLevel, VocabularyEntry};
use crate::store::write_atomic;

pub const TOP_SCORES_FILE: &str = "top_score.json";
pub const SESSION_FILE: &str = "current_session.json";
pub const WORD_HISTORY_FILE: &str = "word_history.json";
pub const WEIGHTS_FILE: &str = "word_weights.json";

/// Sessions kept in the high-score file.
pub const MAX_SESSIONS: usize = 20;
/// Entries kept in the recent-words history.
pub const MAX_RECENT_WORDS: usize = 50;
/// Entries kept in the missed-words history.
pub const MAX_WRONG_WORDS: usize = 100;

/// How words are picked during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// The learner picks one level.
    Custom,
    /// Each word comes from a random level between A1 and B2.
    Adventure,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Custom => write!(f, "custom"),
            GameMode::Adventure => write!(f, "adventure"),
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "custom" => Ok(GameMode::Custom),
            "adventure" => Ok(GameMode::Adventure),
            other => Err(format!("unknown game mode: {other}")),
        }
    }
}

/// A high score that was beaten at the end of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewRecord {
    Overall,
    Level(CefrLevel),
    Mode(GameMode),
}

impl fmt::Display for NewRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewRecord::Overall => write!(f, "Overall High Score!"),
            NewRecord::Level(level) => {
                write!(f, "New {} Level Record!", level.as_str().to_uppercase())
            }
            NewRecord::Mode(GameMode::Custom) => write!(f, "New Custom Mode Record!"),
            NewRecord::Mode(GameMode::Adventure) => write!(f, "New Adventure Mode Record!"),
        }
    }
}

/// Best scores plus the most recent finished sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopScores {
    #[serde(default)]
    pub overall: u32,
    #[serde(default = "zero_by_level")]
    pub by_level: BTreeMap<CefrLevel, u32>,
    #[serde(default = "zero_by_mode")]
    pub by_mode: BTreeMap<GameMode, u32>,
    #[serde(default)]
    pub sessions: Vec<SessionStats>,
}

fn zero_by_level() -> BTreeMap<CefrLevel, u32> {
    CefrLevel::ALL.iter().map(|l| (*l, 0)).collect()
}

fn zero_by_mode() -> BTreeMap<GameMode, u32> {
    [(GameMode::Custom, 0), (GameMode::Adventure, 0)]
        .into_iter()
        .collect()
}

impl Default for TopScores {
    fn default() -> Self {
        Self {
            overall: 0,
            by_level: zero_by_level(),
            by_mode: zero_by_mode(),
            sessions: Vec::new(),
        }
    }
}

impl TopScores {
    pub fn level_best(&self, level: CefrLevel) -> u32 {
        self.by_level.get(&level).copied().unwrap_or(0)
    }

    pub fn mode_best(&self, mode: GameMode) -> u32 {
        self.by_mode.get(&mode).copied().unwrap_or(0)
    }

    /// The score to beat for a game in `mode` at `level`.
    pub fn target_for(&self, mode: GameMode, level: Option<CefrLevel>) -> u32 {
        match (mode, level) {
            (GameMode::Custom, Some(level)) => self.level_best(level),
            (GameMode::Adventure, _) => self.mode_best(GameMode::Adventure),
            (GameMode::Custom, None) => self.overall,
        }
    }

    /// Fold a finished session into the high scores and session list.
    ///
    /// Level records only apply to custom games played at a fixed level.
    pub fn record_session(&mut self, session: SessionStats) -> Vec<NewRecord> {
        let score = session.final_score.unwrap_or(session.words_correct);
        let mut records = Vec::new();

        if score > self.overall {
            self.overall = score;
            records.push(NewRecord::Overall);
        }

        if let (GameMode::Custom, Some(level)) = (session.mode, session.target_level) {
            let best = self.by_level.entry(level).or_insert(0);
            if score > *best {
                *best = score;
                records.push(NewRecord::Level(level));
            }
        }

        let best = self.by_mode.entry(session.mode).or_insert(0);
        if score > *best {
            *best = score;
            records.push(NewRecord::Mode(session.mode));
        }

        self.sessions.push(session);
        if self.sessions.len() > MAX_SESSIONS {
            let excess = self.sessions.len() - MAX_SESSIONS;
            self.sessions.drain(..excess);
        }

        records
    }

    /// Zero the high score of one level.
    pub fn reset_level(&mut self, level: CefrLevel) {
        self.by_level.insert(level, 0);
    }

    pub fn load(path: &Path) -> TopScores {
        load_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(path, self)
    }
}

/// Per-level tally within one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTally {
    pub attempted: u32,
    pub correct: u32,
}

/// What the learner typed for a word they missed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum UserAnswer {
    Typed(String),
    Skipped,
}

/// A missed or skipped word within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrongAnswer {
    #[serde(flatten)]
    pub entry: VocabularyEntry,
    pub user_answer: UserAnswer,
    pub correct_meanings: Vec<String>,
}

/// Running bookkeeping of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub id: Uuid,
    pub mode: GameMode,
    /// Fixed level of a custom game; `None` in adventure mode.
    #[serde(default)]
    pub target_level: Option<CefrLevel>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub words_attempted: u32,
    #[serde(default)]
    pub words_correct: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub level_stats: BTreeMap<CefrLevel, LevelTally>,
    #[serde(default)]
    pub wrong_answers: Vec<WrongAnswer>,
    #[serde(default)]
    pub final_score: Option<u32>,
}

impl SessionStats {
    pub fn new(mode: GameMode, target_level: Option<CefrLevel>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            target_level,
            start_time: Utc::now(),
            end_time: None,
            words_attempted: 0,
            words_correct: 0,
            current_streak: 0,
            best_streak: 0,
            level_stats: BTreeMap::new(),
            wrong_answers: Vec::new(),
            final_score: None,
        }
    }

    /// Count one answered word.
    pub fn record(&mut self, level: CefrLevel, is_correct: bool) {
        let tally = self.level_stats.entry(level).or_default();
        tally.attempted += 1;
        self.words_attempted += 1;

        if is_correct {
            tally.correct += 1;
            self.words_correct += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
    }

    /// Remember a missed word for the end-of-game summary.
    pub fn record_wrong(
        &mut self,
        entry: &VocabularyEntry,
        user_answer: UserAnswer,
        meanings: &[String],
    ) {
        self.wrong_answers.push(WrongAnswer {
            entry: entry.clone(),
            user_answer,
            correct_meanings: meanings.to_vec(),
        });
    }

    /// Percentage of correct answers, 0 before the first answer.
    pub fn accuracy(&self) -> f64 {
        if self.words_attempted == 0 {
            0.0
        } else {
            self.words_correct as f64 / self.words_attempted as f64 * 100.0
        }
    }

    /// Close the session with its final score.
    pub fn finish(&mut self, score: u32) {
        self.end_time = Some(Utc::now());
        self.final_score = Some(score);
    }
}

/// Snapshot of a game in progress, written after each correct answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current_score: u32,
    pub stats: SessionStats,
    pub timestamp: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn save(path: &Path, score: u32, stats: &SessionStats) -> Result<()> {
        let snapshot = SessionSnapshot {
            current_score: score,
            stats: stats.clone(),
            timestamp: Utc::now(),
        };
        save_json(path, &snapshot)
    }
}

/// A word shown during a game, with the meanings it had.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub entry: VocabularyEntry,
    pub meanings: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Recently shown and recently missed words, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordHistory {
    #[serde(default)]
    pub recent_words: Vec<HistoryEntry>,
    #[serde(default)]
    pub wrong_words: Vec<HistoryEntry>,
}

impl WordHistory {
    pub fn add(&mut self, entry: &VocabularyEntry, is_correct: bool, meanings: &[String]) {
        let item = HistoryEntry {
            entry: entry.clone(),
            meanings: meanings.to_vec(),
            timestamp: Utc::now(),
        };

        if !is_correct {
            self.wrong_words.insert(0, item.clone());
            self.wrong_words.truncate(MAX_WRONG_WORDS);
        }
        self.recent_words.insert(0, item);
        self.recent_words.truncate(MAX_RECENT_WORDS);
    }

    pub fn load(path: &Path) -> WordHistory {
        load_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(path, self)
    }
}

/// Read a JSON document, falling back to the default on any failure.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    let parsed = std::fs::read_to_string(path)
        .context("failed to read file")
        .and_then(|content| serde_json::from_str(&content).context("failed to parse JSON"));
    match parsed {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("error loading {}: {e:#}", path.display());
            T::default()
        }
    }
}

/// Write a pretty-printed JSON document atomically.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    write_atomic(path, json.as_bytes())
}
