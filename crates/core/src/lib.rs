#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod scheduler;
pub mod time;
pub mod tree;

pub use error::Error;
pub use model::{BankError, Question, QuestionBank, QuestionError};
pub use scheduler::{DifficultyScheduler, SchedulerError};
pub use time::Clock;
pub use tree::{QuestionTree, TreeError};
