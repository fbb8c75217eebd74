use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("max level must be at least {MIN_LEVEL}, got {provided}")]
    InvalidMaxLevel { provided: u32 },
}

//
// ─── DIFFICULTY SCHEDULER ──────────────────────────────────────────────────────
//

/// Levels start at 1; depth 1 is the tree root.
pub const MIN_LEVEL: u32 = 1;

/// Default difficulty ceiling for a session.
pub const DEFAULT_MAX_LEVEL: u32 = 5;

/// Maps rolling session accuracy to a target tree depth.
///
/// Accuracy is cumulative over the whole session, not a sliding window: early
/// answers weigh heavily at first and less as the session goes on. Above 80%
/// the level steps up by one (clamped to the max), below 40% it steps down
/// (clamped to 1), and inside the 40–80% band it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyScheduler {
    level: u32,
    max_level: u32,
    answered: u32,
    correct: u32,
    streak: u32,
    best_streak: u32,
}

impl DifficultyScheduler {
    /// Create a scheduler starting at level 1.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidMaxLevel` when `max_level` is zero.
    pub fn new(max_level: u32) -> Result<Self, SchedulerError> {
        if max_level < MIN_LEVEL {
            return Err(SchedulerError::InvalidMaxLevel {
                provided: max_level,
            });
        }
        Ok(Self {
            level: MIN_LEVEL,
            max_level,
            answered: 0,
            correct: 0,
            streak: 0,
            best_streak: 0,
        })
    }

    /// Record one answer and return the (possibly adjusted) current level.
    ///
    /// Counts and streak update first, then the level is re-evaluated against
    /// the cumulative accuracy.
    pub fn on_answer(&mut self, correct: bool) -> u32 {
        self.answered += 1;
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }

        let accuracy = self.accuracy_percent();
        if accuracy > 80.0 {
            self.level = (self.level + 1).min(self.max_level);
        } else if accuracy < 40.0 {
            self.level = self.level.saturating_sub(1).max(MIN_LEVEL);
        }
        self.level
    }

    /// Cumulative session accuracy, 0.0 before the first correct answer.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        if self.correct == 0 {
            return 0.0;
        }
        100.0 * f64::from(self.correct) / f64::from(self.answered)
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }
}

impl Default for DifficultyScheduler {
    fn default() -> Self {
        Self {
            level: MIN_LEVEL,
            max_level: DEFAULT_MAX_LEVEL,
            answered: 0,
            correct: 0,
            streak: 0,
            best_streak: 0,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
