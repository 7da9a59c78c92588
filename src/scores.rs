//! Per-difficulty best score ledger
//!
//! Persisted to LocalStorage, one record per difficulty. Records are written
//! only on strict improvement, never per-frame.

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

/// Stored record for one difficulty (JSON envelope in LocalStorage)
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct BestRecord {
    #[serde(rename = "bestScore", default)]
    best_score: u32,
}

/// Best-score ledger, one entry per difficulty
#[derive(Debug, Clone, Default)]
pub struct BestScores {
    entries: [u32; Difficulty::ALL.len()],
}

impl BestScores {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score on record for a difficulty
    pub fn best(&self, difficulty: Difficulty) -> u32 {
        self.entries[difficulty as usize]
    }

    /// Record a finished run. Returns true when the score strictly improved
    /// the stored best; only that case warrants a persistence write.
    pub fn record(&mut self, difficulty: Difficulty, score: u32) -> bool {
        if score > self.best(difficulty) {
            self.entries[difficulty as usize] = score;
            true
        } else {
            false
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn storage_key(difficulty: Difficulty) -> String {
        format!("neon_tiles_best_{}", difficulty.as_str())
    }

    /// Load the ledger from LocalStorage (WASM only); malformed or missing
    /// records read as no record.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let mut scores = Self::new();
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            for difficulty in Difficulty::ALL {
                if let Ok(Some(json)) = storage.get_item(&Self::storage_key(difficulty)) {
                    if let Ok(record) = serde_json::from_str::<BestRecord>(&json) {
                        scores.entries[difficulty as usize] = record.best_score;
                    }
                }
            }
            log::info!("Loaded best scores");
        }

        scores
    }

    /// Persist one difficulty's record (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, difficulty: Difficulty) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let record = BestRecord {
                best_score: self.best(difficulty),
            };
            if let Ok(json) = serde_json::to_string(&record) {
                let _ = storage.set_item(&Self::storage_key(difficulty), &json);
                log::info!(
                    "Best score saved ({}: {})",
                    difficulty.as_str(),
                    record.best_score
                );
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, _difficulty: Difficulty) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_score_idempotence() {
        let mut scores = BestScores::new();
        let runs = [5, 3, 8, 8, 2];
        let expected_best = [5, 5, 8, 8, 8];
        let expected_write = [true, false, true, false, false];

        for i in 0..runs.len() {
            let wrote = scores.record(Difficulty::Easy, runs[i]);
            assert_eq!(wrote, expected_write[i], "run {}", i);
            assert_eq!(scores.best(Difficulty::Easy), expected_best[i], "run {}", i);
        }
    }

    #[test]
    fn test_difficulties_are_independent() {
        let mut scores = BestScores::new();
        scores.record(Difficulty::Easy, 12);
        scores.record(Difficulty::Hard, 4);

        assert_eq!(scores.best(Difficulty::Easy), 12);
        assert_eq!(scores.best(Difficulty::Hard), 4);
        assert_eq!(scores.best(Difficulty::Extreme), 0);
    }

    #[test]
    fn test_zero_score_never_writes() {
        let mut scores = BestScores::new();
        assert!(!scores.record(Difficulty::Medium, 0));
        assert_eq!(scores.best(Difficulty::Medium), 0);
    }

    #[test]
    fn test_malformed_record_reads_as_zero() {
        // non-JSON, missing field, and wrong-typed values all degrade to 0
        let cases = ["garbage", "{}", r#"{"bestScore":"NaN"}"#];
        for case in cases {
            let best = serde_json::from_str::<BestRecord>(case)
                .map(|r| r.best_score)
                .unwrap_or_default();
            assert_eq!(best, 0, "case {:?}", case);
        }
        let record: BestRecord = serde_json::from_str(r#"{"bestScore":7}"#).unwrap();
        assert_eq!(record.best_score, 7);
    }
}
