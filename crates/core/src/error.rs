use thiserror::Error;

use crate::model::{BankError, QuestionError};
use crate::scheduler::SchedulerError;
use crate::tree::TreeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
