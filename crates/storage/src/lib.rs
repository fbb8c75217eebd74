#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::JsonPlayerStore;
pub use repository::{InMemoryPlayerStore, PlayerRecord, PlayerStore, ProgressRecord, StorageError};
