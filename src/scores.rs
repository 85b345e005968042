//! Persistent score table
//!
//! Saved as JSON in the working directory, tracks the top 10 finishes.

use std::fs;

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// One finished-session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player number within the session
    pub player: usize,
    /// Rounds won
    pub score: u32,
    /// Board seed the session was played on
    pub seed: u64,
}

/// Score table, sorted descending by score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    /// On-disk file name
    const FILE: &'static str = "rebound_robots_scores.json";

    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a record if it qualifies
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn record(&mut self, player: usize, score: u32, seed: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreEntry {
            player,
            score,
            seed,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    /// Load the table from the working directory, empty if absent
    pub fn load() -> Self {
        match fs::read_to_string(Self::FILE) {
            Ok(json) => match serde_json::from_str::<ScoreBoard>(&json) {
                Ok(scores) => {
                    log::info!("loaded {} score entries", scores.entries.len());
                    scores
                }
                Err(err) => {
                    log::warn!("score table unreadable ({err}), starting fresh");
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no score table found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the table; failures are logged, not fatal
    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(Self::FILE, json) {
                    log::warn!("could not save score table: {err}");
                } else {
                    log::info!("score table saved ({} entries)", self.entries.len());
                }
            }
            Err(err) => log::warn!("could not serialize score table: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_scores_never_qualify() {
        let scores = ScoreBoard::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_records_stay_sorted_and_bounded() {
        let mut scores = ScoreBoard::new();
        for (player, score) in [(0, 3), (1, 7), (2, 5)] {
            scores.record(player, score, 42);
        }
        let ordered: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![7, 5, 3]);
        assert_eq!(scores.record(3, 6, 42), Some(2));

        for i in 0..20 {
            scores.record(4, 10 + i, 42);
        }
        assert_eq!(scores.entries.len(), MAX_ENTRIES);
        // The weakest entries fell off the bottom
        assert!(scores.entries.iter().all(|e| e.score >= 10));
    }
}
