//! Players and their scores

use serde::{Deserialize, Serialize};

/// A participant; the round machine only ever increments the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub number: usize,
    pub score: u32,
}

impl Player {
    pub fn new(number: usize) -> Self {
        Self { number, score: 0 }
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
        log::info!("player {} is now at {} point(s)", self.number + 1, self.score);
    }
}
