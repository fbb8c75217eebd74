mod config;
mod plan;
mod selector;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{SessionConfigError, SessionError};
pub use config::SessionConfig;
pub use selector::SessionSelector;
pub use service::{QuizSession, SessionProgress, SessionSummary};
pub use workflow::QuizService;
