#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{SessionConfigError, SessionError};

pub use sessions::{
    QuizService, QuizSession, SessionConfig, SessionProgress, SessionSelector, SessionSummary,
};
