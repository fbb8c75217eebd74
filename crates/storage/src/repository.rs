use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by player store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted progress for one finished session in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub category: String,
    pub total_answered: u32,
    pub correct_answers: u32,
    pub best_streak: u32,
    pub level: u32,
    pub recorded_at: DateTime<Utc>,
}

/// A player and their per-category progress history, newest record last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub name: String,
    pub registered_at: DateTime<Utc>,
    pub progress: BTreeMap<String, Vec<ProgressRecord>>,
}

impl PlayerRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, registered_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            registered_at,
            progress: BTreeMap::new(),
        }
    }

    /// Latest progress record for a category, if any.
    #[must_use]
    pub fn latest_progress(&self, category: &str) -> Option<&ProgressRecord> {
        self.progress.get(category).and_then(|records| records.last())
    }

    pub fn push_progress(&mut self, record: ProgressRecord) {
        self.progress
            .entry(record.category.clone())
            .or_default()
            .push(record);
    }
}

//
// ─── PLAYER STORE ──────────────────────────────────────────────────────────────
//

/// Synchronous boundary collaborator for player progress.
///
/// The engine only talks to the store at session boundaries, never mid-round,
/// and a failed call must never corrupt in-memory session state — callers
/// report the error and carry on.
pub trait PlayerStore: Send + Sync {
    /// Latest progress for a player in a category; `Ok(None)` when the player
    /// or category has no history yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store cannot be read.
    fn load_progress(
        &self,
        player: &str,
        category: &str,
    ) -> Result<Option<ProgressRecord>, StorageError>;

    /// Append a progress record, registering the player on first save.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the record cannot be persisted.
    fn save_progress(&self, player: &str, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Full player record, `Ok(None)` for unknown players.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store cannot be read.
    fn load_player(&self, name: &str) -> Result<Option<PlayerRecord>, StorageError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

/// Map-backed store for tests and ephemeral play.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayerStore {
    players: Arc<Mutex<HashMap<String, PlayerRecord>>>,
}

impl InMemoryPlayerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_players<T>(&self, f: impl FnOnce(&mut HashMap<String, PlayerRecord>) -> T) -> T {
        let mut guard = self.players.lock().unwrap_or_else(|poisoned| {
            // A panic while holding the lock cannot leave a partial write
            // here; the map is always in a consistent state.
            poisoned.into_inner()
        });
        f(&mut guard)
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn load_progress(
        &self,
        player: &str,
        category: &str,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        Ok(self.with_players(|players| {
            players
                .get(player)
                .and_then(|record| record.latest_progress(category).cloned())
        }))
    }

    fn save_progress(&self, player: &str, record: &ProgressRecord) -> Result<(), StorageError> {
        self.with_players(|players| {
            players
                .entry(player.to_string())
                .or_insert_with(|| PlayerRecord::new(player, record.recorded_at))
                .push_progress(record.clone());
        });
        Ok(())
    }

    fn load_player(&self, name: &str) -> Result<Option<PlayerRecord>, StorageError> {
        Ok(self.with_players(|players| players.get(name).cloned()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn record(category: &str, answered: u32) -> ProgressRecord {
        ProgressRecord {
            category: category.to_string(),
            total_answered: answered,
            correct_answers: answered / 2,
            best_streak: 2,
            level: 3,
            recorded_at: fixed_now(),
        }
    }

    #[test]
    fn load_progress_on_unknown_player_is_none() {
        let store = InMemoryPlayerStore::new();
        assert!(store.load_progress("ana", "Farm").unwrap().is_none());
    }

    #[test]
    fn save_registers_player_and_appends_history() {
        let store = InMemoryPlayerStore::new();
        store.save_progress("ana", &record("Farm", 5)).unwrap();
        store.save_progress("ana", &record("Farm", 10)).unwrap();
        store.save_progress("ana", &record("Forest", 3)).unwrap();

        let latest = store.load_progress("ana", "Farm").unwrap().unwrap();
        assert_eq!(latest.total_answered, 10);

        let player = store.load_player("ana").unwrap().unwrap();
        assert_eq!(player.progress["Farm"].len(), 2);
        assert_eq!(player.progress["Forest"].len(), 1);
    }

    #[test]
    fn progress_record_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&record("Farm", 5)).unwrap();
        assert!(json.contains("\"totalAnswered\":5"));
        assert!(json.contains("\"correctAnswers\":2"));
        assert!(json.contains("\"bestStreak\":2"));
    }
}
