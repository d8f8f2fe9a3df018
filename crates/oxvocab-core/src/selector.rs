//! Adaptive word selection.
//!
//! [`WeightSelector`] owns the per-word performance table and serves
//! weighted random draws over the vocabulary. Every recorded outcome
//! recomputes the word's weight with [`adaptive_weight`] and writes the whole
//! table through to the injected [`WeightStore`].

use anyhow::Result;
use chrono::Utc;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::CoreError;
use crate::model::{
    CefrLevel, VocabularyEntry, WordKey, WordRecord, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT,
};
use crate::store::{WeightMap, WeightStore};

/// Compute a word's draw weight from its performance record.
///
/// Lower accuracy gives a higher weight. A streak of three correct answers
/// halves the weight, two wrong in a row multiplies it by 2.5, new words get
/// a small boost and well-practiced words a small discount. The result is
/// clamped to `[MIN_WEIGHT, MAX_WEIGHT]` so no word ever becomes impossible
/// to draw.
pub fn adaptive_weight(record: &WordRecord) -> f64 {
    let Some(accuracy) = record.accuracy() else {
        return DEFAULT_WEIGHT;
    };

    let base: f64 = if accuracy >= 0.8 {
        0.3
    } else if accuracy >= 0.6 {
        0.7
    } else if accuracy >= 0.4 {
        1.2
    } else {
        2.0
    };

    let streak: f64 = if record.consecutive_correct >= 3 {
        0.5
    } else if record.consecutive_wrong >= 2 {
        2.5
    } else {
        1.0
    };

    let practice: f64 = if record.total_attempts <= 3 {
        1.2
    } else if record.total_attempts >= 10 {
        0.9
    } else {
        1.0
    };

    (base * streak * practice).clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Weighted sampler over a vocabulary, backed by a persistent weight table.
pub struct WeightSelector {
    vocabulary: Vec<VocabularyEntry>,
    records: WeightMap,
    store: Box<dyn WeightStore>,
}

impl WeightSelector {
    /// Load the store and create default records for vocabulary entries it
    /// does not know yet. Existing records are left untouched.
    pub fn new(vocabulary: Vec<VocabularyEntry>, store: Box<dyn WeightStore>) -> Result<Self> {
        let records = store.load()?;
        let mut selector = Self {
            vocabulary,
            records,
            store,
        };

        let mut created = 0usize;
        for entry in &selector.vocabulary {
            selector.records.entry(entry.key()).or_insert_with(|| {
                created += 1;
                WordRecord::default()
            });
        }

        if created > 0 {
            tracing::info!("initialized weights for {created} new words");
            if let Err(e) = selector.persist() {
                tracing::error!("{e}");
            }
        }

        Ok(selector)
    }

    /// The vocabulary this selector draws from.
    pub fn vocabulary(&self) -> &[VocabularyEntry] {
        &self.vocabulary
    }

    /// Performance record for a key, if one exists.
    pub fn record(&self, key: &WordKey) -> Option<&WordRecord> {
        self.records.get(key)
    }

    /// All records, keyed by word.
    pub fn records(&self) -> &WeightMap {
        &self.records
    }

    /// Draw one word, optionally restricted to a level, using the thread RNG.
    pub fn draw(&self, level: Option<CefrLevel>) -> Result<VocabularyEntry, CoreError> {
        self.draw_with(level, &mut rand::thread_rng())
    }

    /// Draw one word with probability proportional to its weight.
    ///
    /// Each call is an independent draw with replacement. Fails with
    /// [`CoreError::NoWordsAvailable`] when no entry matches `level`.
    pub fn draw_with<R: Rng + ?Sized>(
        &self,
        level: Option<CefrLevel>,
        rng: &mut R,
    ) -> Result<VocabularyEntry, CoreError> {
        let candidates: Vec<&VocabularyEntry> = self
            .vocabulary
            .iter()
            .filter(|entry| level.map_or(true, |l| entry.level == l))
            .collect();

        if candidates.is_empty() {
            return Err(CoreError::NoWordsAvailable { level });
        }

        let weights = candidates.iter().map(|entry| self.weight_of(entry));

        let picked = match WeightedIndex::new(weights) {
            Ok(dist) => candidates[dist.sample(rng)],
            Err(e) => {
                tracing::warn!("weighted selection failed ({e}), falling back to uniform");
                candidates
                    .choose(rng)
                    .copied()
                    .ok_or(CoreError::NoWordsAvailable { level })?
            }
        };

        Ok(picked.clone())
    }

    fn weight_of(&self, entry: &VocabularyEntry) -> f64 {
        self.records
            .get(&entry.key())
            .map(|r| r.weight)
            .unwrap_or(DEFAULT_WEIGHT)
    }

    /// Record the learner's answer on `entry` and recompute its weight.
    ///
    /// The in-memory update always happens. A failed save is logged and
    /// returned as [`CoreError::Persistence`].
    pub fn record_outcome(
        &mut self,
        entry: &VocabularyEntry,
        is_correct: bool,
    ) -> Result<(), CoreError> {
        let record = self.records.entry(entry.key()).or_default();

        record.total_attempts += 1;
        record.last_seen = Some(Utc::now());
        if is_correct {
            record.correct_count += 1;
            record.consecutive_correct += 1;
            record.consecutive_wrong = 0;
        } else {
            record.wrong_count += 1;
            record.consecutive_wrong += 1;
            record.consecutive_correct = 0;
        }
        record.weight = adaptive_weight(record);

        tracing::info!(
            "updated '{}': accuracy={:.1}%, weight={:.2}",
            entry.word,
            record.accuracy_percent(),
            record.weight
        );

        self.persist()
    }

    /// Return every record to its defaults and persist.
    pub fn reset_all(&mut self) -> Result<(), CoreError> {
        for record in self.records.values_mut() {
            *record = WordRecord::default();
        }
        tracing::info!("reset all word statistics");
        self.persist()
    }

    /// Reset the record of a single word, if it has one.
    pub fn reset_word(&mut self, entry: &VocabularyEntry) -> Result<(), CoreError> {
        match self.records.get_mut(&entry.key()) {
            Some(record) => {
                *record = WordRecord::default();
                tracing::info!("reset statistics for '{}'", entry.word);
                self.persist()
            }
            None => Ok(()),
        }
    }

    /// Reset the records of every word at `level`.
    pub fn reset_level(&mut self, level: CefrLevel) -> Result<(), CoreError> {
        self.records
            .iter_mut()
            .filter(|(key, _)| key.level == level)
            .for_each(|(_, record)| *record = WordRecord::default());
        tracing::info!("reset statistics for level {level}");
        self.persist()
    }

    fn persist(&self) -> Result<(), CoreError> {
        self.store.save(&self.records).map_err(|e| {
            let err = CoreError::Persistence(format!("{e:#}"));
            tracing::error!("{err}");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::store::MemoryWeightStore;

    fn entry(word: &str, level: CefrLevel) -> VocabularyEntry {
        VocabularyEntry::new(word, "noun", level)
    }

    fn vocabulary() -> Vec<VocabularyEntry> {
        vec![
            entry("home", CefrLevel::A1),
            entry("water", CefrLevel::A1),
            entry("issue", CefrLevel::B2),
        ]
    }

    fn selector_with(store: Arc<MemoryWeightStore>) -> WeightSelector {
        WeightSelector::new(vocabulary(), Box::new(store)).unwrap()
    }

    fn record(correct: u32, wrong: u32, streak_correct: u32, streak_wrong: u32) -> WordRecord {
        WordRecord {
            correct_count: correct,
            wrong_count: wrong,
            total_attempts: correct + wrong,
            consecutive_correct: streak_correct,
            consecutive_wrong: streak_wrong,
            ..WordRecord::default()
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn weight_of_unseen_word_is_default() {
        assert_eq!(adaptive_weight(&WordRecord::default()), 1.0);
    }

    #[test]
    fn weight_brackets() {
        // 5 attempts: no practice multiplier, no streaks
        assert!(approx(adaptive_weight(&record(4, 1, 0, 1)), 0.3));
        assert!(approx(adaptive_weight(&record(3, 2, 0, 1)), 0.7));
        assert!(approx(adaptive_weight(&record(2, 3, 1, 0)), 1.2));
        assert!(approx(adaptive_weight(&record(1, 4, 0, 1)), 2.0));
    }

    #[test]
    fn weight_streak_multipliers() {
        // three right in a row on a new word: 0.3 * 0.5 * 1.2
        assert!(approx(adaptive_weight(&record(3, 0, 3, 0)), 0.18));
        // two wrong on a new word: 2.0 * 2.5 * 1.2 = 6.0, clamped
        assert!(approx(adaptive_weight(&record(0, 2, 0, 2)), MAX_WEIGHT));
        // one wrong: 2.0 * 1.2
        assert!(approx(adaptive_weight(&record(0, 1, 0, 1)), 2.4));
    }

    #[test]
    fn weight_practice_discount() {
        // 10 attempts, 100%: 0.3 * 0.5 * 0.9 = 0.135
        assert!(approx(adaptive_weight(&record(10, 0, 10, 0)), 0.135));
        // 20 attempts, 90%, streak broken: 0.3 * 1.0 * 0.9
        assert!(approx(adaptive_weight(&record(18, 2, 0, 1)), 0.27));
    }

    #[test]
    fn weight_floor() {
        let mut r = record(40, 0, 40, 0);
        r.weight = adaptive_weight(&r);
        assert!(r.weight >= MIN_WEIGHT);
    }

    #[test]
    fn new_creates_missing_records_only() {
        let mut existing = HashMap::new();
        let tuned = WordRecord {
            weight: 4.2,
            ..record(0, 3, 0, 3)
        };
        existing.insert(entry("home", CefrLevel::A1).key(), tuned.clone());
        let store = Arc::new(MemoryWeightStore::with_records(existing));

        let selector = selector_with(Arc::clone(&store));

        assert_eq!(selector.records().len(), 3);
        assert_eq!(
            selector.record(&entry("home", CefrLevel::A1).key()),
            Some(&tuned)
        );
        assert_eq!(
            selector
                .record(&entry("issue", CefrLevel::B2).key())
                .unwrap()
                .weight,
            1.0
        );
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn new_without_missing_records_does_not_save() {
        let store = Arc::new(MemoryWeightStore::new());
        drop(selector_with(Arc::clone(&store)));
        assert_eq!(store.save_count(), 1);
        drop(selector_with(Arc::clone(&store)));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn draw_respects_level() {
        let selector = selector_with(Arc::new(MemoryWeightStore::new()));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = selector.draw_with(Some(CefrLevel::B2), &mut rng).unwrap();
            assert_eq!(picked.word, "issue");
        }
    }

    #[test]
    fn draw_from_empty_level_fails() {
        let selector = selector_with(Arc::new(MemoryWeightStore::new()));
        let err = selector.draw(Some(CefrLevel::C1)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NoWordsAvailable {
                level: Some(CefrLevel::C1)
            }
        ));
    }

    #[test]
    fn draw_from_empty_vocabulary_fails() {
        let selector =
            WeightSelector::new(Vec::new(), Box::new(MemoryWeightStore::new())).unwrap();
        assert!(matches!(
            selector.draw(None),
            Err(CoreError::NoWordsAvailable { level: None })
        ));
    }

    #[test]
    fn draw_follows_weights() {
        let mut records = HashMap::new();
        records.insert(
            entry("home", CefrLevel::A1).key(),
            WordRecord {
                weight: 4.5,
                ..WordRecord::default()
            },
        );
        records.insert(
            entry("water", CefrLevel::A1).key(),
            WordRecord {
                weight: 0.5,
                ..WordRecord::default()
            },
        );
        let selector = selector_with(Arc::new(MemoryWeightStore::with_records(records)));

        let mut rng = StdRng::seed_from_u64(42);
        let draws = 2000;
        let homes = (0..draws)
            .filter(|_| selector.draw_with(Some(CefrLevel::A1), &mut rng).unwrap().word == "home")
            .count();

        // expected share is 0.9
        let share = homes as f64 / draws as f64;
        assert!((0.85..0.95).contains(&share), "share was {share}");
    }

    #[test]
    fn draw_falls_back_to_uniform_on_zero_weights() {
        let mut records = HashMap::new();
        for word in ["home", "water"] {
            records.insert(
                entry(word, CefrLevel::A1).key(),
                WordRecord {
                    weight: 0.0,
                    ..WordRecord::default()
                },
            );
        }
        let selector = selector_with(Arc::new(MemoryWeightStore::with_records(records)));
        let picked = selector.draw(Some(CefrLevel::A1)).unwrap();
        assert_eq!(picked.level, CefrLevel::A1);
    }

    #[test]
    fn draw_has_no_side_effects() {
        let store = Arc::new(MemoryWeightStore::new());
        let selector = selector_with(Arc::clone(&store));
        let before = selector.records().clone();
        for _ in 0..10 {
            selector.draw(None).unwrap();
        }
        assert_eq!(selector.records(), &before);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn record_outcome_updates_counts_and_streaks() {
        let store = Arc::new(MemoryWeightStore::new());
        let mut selector = selector_with(Arc::clone(&store));
        let home = entry("home", CefrLevel::A1);

        selector.record_outcome(&home, true).unwrap();
        selector.record_outcome(&home, true).unwrap();
        selector.record_outcome(&home, false).unwrap();

        let r = selector.record(&home.key()).unwrap();
        assert_eq!(r.total_attempts, 3);
        assert_eq!(r.correct_count, 2);
        assert_eq!(r.wrong_count, 1);
        assert_eq!(r.consecutive_correct, 0);
        assert_eq!(r.consecutive_wrong, 1);
        assert!(r.last_seen.is_some());
        // 66% accuracy on a new word: 0.7 * 1.2
        assert!(approx(r.weight, 0.84));

        // write-through after each outcome
        assert_eq!(store.save_count(), 4);
        assert_eq!(store.snapshot()[&home.key()], *r);
    }

    #[test]
    fn record_outcome_creates_unknown_word() {
        let mut selector = selector_with(Arc::new(MemoryWeightStore::new()));
        let stranger = VocabularyEntry::new("serendipity", "noun", CefrLevel::C2);
        selector.record_outcome(&stranger, false).unwrap();
        let r = selector.record(&stranger.key()).unwrap();
        assert_eq!(r.wrong_count, 1);
        assert!(approx(r.weight, 2.4));
    }

    #[test]
    fn streak_dominates_after_three_correct() {
        let mut selector = selector_with(Arc::new(MemoryWeightStore::new()));
        let water = entry("water", CefrLevel::A1);
        for outcome in [false, false, false, false, true, true, true] {
            selector.record_outcome(&water, outcome).unwrap();
        }
        let r = selector.record(&water.key()).unwrap();
        // 3/7 accuracy: base 1.2, streak 0.5, no practice multiplier
        assert!(approx(r.weight, 0.6));
    }

    #[test]
    fn weight_stays_in_bounds_for_any_sequence() {
        let mut selector = selector_with(Arc::new(MemoryWeightStore::new()));
        let home = entry("home", CefrLevel::A1);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            selector.record_outcome(&home, rng.gen_bool(0.5)).unwrap();
            let r = selector.record(&home.key()).unwrap();
            assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(&r.weight));
            assert_eq!(r.total_attempts, r.correct_count + r.wrong_count);
            assert!((r.consecutive_correct == 0) != (r.consecutive_wrong == 0));
        }
    }

    #[test]
    fn persistence_failure_keeps_update() {
        let store = Arc::new(MemoryWeightStore::new());
        let mut selector = selector_with(Arc::clone(&store));
        store.fail_saves(true);

        let home = entry("home", CefrLevel::A1);
        let err = selector.record_outcome(&home, true).unwrap_err();
        assert!(matches!(err, CoreError::Persistence(_)));
        assert_eq!(selector.record(&home.key()).unwrap().correct_count, 1);
        assert_eq!(store.snapshot()[&home.key()].correct_count, 0);
    }

    #[test]
    fn reset_all_is_idempotent() {
        let mut selector = selector_with(Arc::new(MemoryWeightStore::new()));
        let home = entry("home", CefrLevel::A1);
        selector.record_outcome(&home, false).unwrap();
        selector.record_outcome(&home, false).unwrap();

        selector.reset_all().unwrap();
        let once = selector.records().clone();
        selector.reset_all().unwrap();

        assert_eq!(selector.records(), &once);
        assert!(once.values().all(|r| *r == WordRecord::default()));
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn reset_level_only_touches_that_level() {
        let mut selector = selector_with(Arc::new(MemoryWeightStore::new()));
        let home = entry("home", CefrLevel::A1);
        let issue = entry("issue", CefrLevel::B2);
        selector.record_outcome(&home, false).unwrap();
        selector.record_outcome(&issue, false).unwrap();

        selector.reset_level(CefrLevel::B2).unwrap();

        assert_eq!(selector.record(&home.key()).unwrap().total_attempts, 1);
        assert_eq!(selector.record(&issue.key()).unwrap().total_attempts, 0);
    }

    #[test]
    fn reset_word_ignores_unknown() {
        let store = Arc::new(MemoryWeightStore::new());
        let mut selector = selector_with(Arc::clone(&store));
        let stranger = VocabularyEntry::new("serendipity", "noun", CefrLevel::C2);
        selector.reset_word(&stranger).unwrap();
        assert!(selector.record(&stranger.key()).is_none());
        assert_eq!(store.save_count(), 1);
    }
}
