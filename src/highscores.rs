//! Session high score
//!
//! Lives only in memory for the browser session; nothing is persisted.

use serde::{Deserialize, Serialize};

/// Result of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreOutcome {
    /// Final score of the run
    pub score: u64,
    /// High score after recording
    pub high_score: u64,
    /// The run beat the previous high score
    pub new_high: bool,
}

/// Best score seen this session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Current best (0 when no run has scored)
    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether a high score has been set yet
    pub fn is_set(&self) -> bool {
        self.best > 0
    }

    /// Would this score beat the current best?
    pub fn is_beaten_by(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run: best becomes `max(best, score)`
    pub fn record(&mut self, score: u64) -> HighScoreOutcome {
        let new_high = self.is_beaten_by(score);
        if new_high {
            self.best = score;
        }
        HighScoreOutcome {
            score,
            high_score: self.best,
            new_high,
        }
    }
}
