//! Durable storage of word performance records.
//!
//! [`WeightStore`] is the persistence contract the selector depends on.
//! [`JsonWeightStore`] writes a JSON array with one object per word, the key
//! fields flattened next to the record fields:
//!
//! ```json
//! [{ "word": "home", "class": "noun", "level": "a1", "weight": 1.0, ... }]
//! ```

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::{WordKey, WordRecord};

/// Mapping from composite key to performance record.
pub type WeightMap = HashMap<WordKey, WordRecord>;

/// Load/save contract for the weight table.
pub trait WeightStore: Send {
    /// Read the persisted table. Missing storage is an empty table.
    fn load(&self) -> Result<WeightMap>;

    /// Replace the persisted table with `records`.
    fn save(&self, records: &WeightMap) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    #[serde(flatten)]
    key: WordKey,
    #[serde(flatten)]
    record: WordRecord,
}

/// Weight table stored as a JSON file, written atomically.
#[derive(Debug, Clone)]
pub struct JsonWeightStore {
    path: PathBuf,
}

impl JsonWeightStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WeightStore for JsonWeightStore {
    fn load(&self) -> Result<WeightMap> {
        if !self.path.exists() {
            return Ok(WeightMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read weights: {}", self.path.display()))?;

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "ignoring unreadable weights file {}: {e}",
                    self.path.display()
                );
                return Ok(WeightMap::new());
            }
        };

        let mut records = WeightMap::new();
        let mut skipped = 0usize;
        match value {
            serde_json::Value::Array(entries) => {
                for entry in entries {
                    match serde_json::from_value::<StoredRecord>(entry) {
                        Ok(stored) => {
                            records.insert(stored.key, stored.record);
                        }
                        Err(e) => {
                            tracing::debug!("skipping malformed weight record: {e}");
                            skipped += 1;
                        }
                    }
                }
            }
            serde_json::Value::Object(map) => {
                // Older files keyed records by "word_class_level".
                for (joined, mut entry) in map {
                    normalize_last_seen(&mut entry);
                    let record = serde_json::from_value::<WordRecord>(entry);
                    match (parse_joined_key(&joined), record) {
                        (Some(key), Ok(record)) => {
                            records.insert(key, record);
                        }
                        _ => skipped += 1,
                    }
                }
            }
            _ => {
                tracing::warn!(
                    "ignoring weights file with unexpected layout: {}",
                    self.path.display()
                );
            }
        }
        if skipped > 0 {
            tracing::warn!(
                "skipped {skipped} malformed record(s) in {}",
                self.path.display()
            );
        }

        tracing::info!("loaded weights for {} words", records.len());
        Ok(records)
    }

    fn save(&self, records: &WeightMap) -> Result<()> {
        let mut stored: Vec<StoredRecord> = records
            .iter()
            .map(|(key, record)| StoredRecord {
                key: key.clone(),
                record: record.clone(),
            })
            .collect();
        stored.sort_by(|a, b| a.key.cmp(&b.key));

        let json = serde_json::to_string_pretty(&stored).context("failed to serialize weights")?;
        write_atomic(&self.path, json.as_bytes())?;

        tracing::debug!("saved weights for {} words", records.len());
        Ok(())
    }
}

/// Rewrite `last_seen` of an older record into RFC 3339. Those files stored
/// local timestamps without an offset; they are read as UTC. Anything
/// unparseable becomes `null` so the counts are kept.
fn normalize_last_seen(entry: &mut serde_json::Value) {
    let Some(slot) = entry.get_mut("last_seen") else {
        return;
    };
    let parsed = match slot.as_str() {
        Some(text) => parse_timestamp(text),
        None => return,
    };
    *slot = match parsed {
        Some(at) => serde_json::Value::String(at.to_rfc3339()),
        None => serde_json::Value::Null,
    };
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_joined_key(joined: &str) -> Option<WordKey> {
    let mut parts = joined.rsplitn(3, '_');
    let level = parts.next()?.parse().ok()?;
    let class = parts.next()?;
    let word = parts.next()?;
    if word.is_empty() || class.is_empty() {
        return None;
    }
    Some(WordKey {
        word: word.to_string(),
        class: class.to_string(),
        level,
    })
}

/// Write `contents` to `path` through a temp file in the same directory,
/// creating parent directories as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create directory: {}", parent.display()))?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    temp.write_all(contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    temp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryWeightStore {
    records: Mutex<WeightMap>,
    fail_saves: AtomicBool,
    save_count: AtomicU32,
}

impl MemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing table.
    pub fn with_records(records: WeightMap) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every subsequent `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.save_count.load(Ordering::Relaxed)
    }

    /// Copy of the last saved table.
    pub fn snapshot(&self) -> WeightMap {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl WeightStore for MemoryWeightStore {
    fn load(&self) -> Result<WeightMap> {
        Ok(self.snapshot())
    }

    fn save(&self, records: &WeightMap) -> Result<()> {
        if self.fail_saves.load(Ordering::Relaxed) {
            anyhow::bail!("simulated write failure");
        }
        *self.records.lock().unwrap_or_else(|e| e.into_inner()) = records.clone();
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl<S: WeightStore + Sync> WeightStore for std::sync::Arc<S> {
    fn load(&self) -> Result<WeightMap> {
        (**self).load()
    }

    fn save(&self, records: &WeightMap) -> Result<()> {
        (**self).save(records)
    }
}
