//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::BankError;
use quiz_core::scheduler::SchedulerError;
use quiz_core::tree::TreeError;
use storage::repository::StorageError;

/// Errors from validating a `SessionConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionConfigError {
    #[error("session must ask at least one question")]
    ZeroCount,
    #[error("session needs at least one difficulty level")]
    ZeroMaxLevel,
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("not enough unused questions: requested {requested}, selected {selected}")]
    InsufficientQuestions { requested: usize, selected: usize },
    #[error("session has already issued all of its questions")]
    Exhausted,
    #[error("question was not issued by this session: {0}")]
    UnknownQuestion(String),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Config(#[from] SessionConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True when the error is an unknown-category failure from the bank.
    #[must_use]
    pub fn is_unknown_category(&self) -> bool {
        matches!(self, Self::Bank(BankError::UnknownCategory { .. }))
    }
}
