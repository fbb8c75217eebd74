use serde::{Deserialize, Serialize};

use crate::error::SessionConfigError;

/// How many questions a session asks and how they spread over difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    count: usize,
    max_level: u32,
    balance_difficulty: bool,
    allow_repeats: bool,
}

impl SessionConfig {
    /// Validated constructor.
    ///
    /// # Errors
    ///
    /// Returns `SessionConfigError::ZeroCount` when `count` is zero and
    /// `SessionConfigError::ZeroMaxLevel` when `max_level` is zero.
    pub fn new(
        count: usize,
        max_level: u32,
        balance_difficulty: bool,
        allow_repeats: bool,
    ) -> Result<Self, SessionConfigError> {
        if count == 0 {
            return Err(SessionConfigError::ZeroCount);
        }
        if max_level == 0 {
            return Err(SessionConfigError::ZeroMaxLevel);
        }
        Ok(Self {
            count,
            max_level,
            balance_difficulty,
            allow_repeats,
        })
    }

    /// Number of questions to ask in one session.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Highest difficulty level (tree depth) the session targets.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Spread slots evenly across levels instead of drawing levels at random.
    #[must_use]
    pub fn balance_difficulty(&self) -> bool {
        self.balance_difficulty
    }

    /// Allow the same question to be issued more than once.
    #[must_use]
    pub fn allow_repeats(&self) -> bool {
        self.allow_repeats
    }
}

impl Default for SessionConfig {
    /// Five questions over five levels, balanced, no repeats.
    fn default() -> Self {
        Self {
            count: 5,
            max_level: 5,
            balance_difficulty: true,
            allow_repeats: false,
        }
    }
}
