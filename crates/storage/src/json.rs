use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{PlayerRecord, PlayerStore, ProgressRecord, StorageError};

//
// ─── JSON FILE STORE ───────────────────────────────────────────────────────────
//

/// One pretty-printed JSON file per player under a data directory.
///
/// Writes go through a full read-modify-write of the player's file; the store
/// is a session-boundary collaborator, so there is no contention to worry
/// about within one game process.
#[derive(Debug, Clone)]
pub struct JsonPlayerStore {
    root: PathBuf,
}

impl JsonPlayerStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn player_path(&self, name: &str) -> PathBuf {
        // Player names become file names; keep only characters that are safe
        // on every filesystem.
        let safe: String = name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }

    fn read_player(&self, name: &str) -> Result<Option<PlayerRecord>, StorageError> {
        let path = self.player_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(|e| StorageError::Io(e.to_string()))?;
        let record = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(record))
    }

    fn write_player(&self, record: &PlayerRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(self.player_path(&record.name), raw)
            .map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl PlayerStore for JsonPlayerStore {
    fn load_progress(
        &self,
        player: &str,
        category: &str,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        Ok(self
            .read_player(player)?
            .and_then(|record| record.latest_progress(category).cloned()))
    }

    fn save_progress(&self, player: &str, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut player_record = self
            .read_player(player)?
            .unwrap_or_else(|| PlayerRecord::new(player, record.recorded_at));
        player_record.push_progress(record.clone());
        self.write_player(&player_record)
    }

    fn load_player(&self, name: &str) -> Result<Option<PlayerRecord>, StorageError> {
        self.read_player(name)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> JsonPlayerStore {
        let unique = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "quiz-json-store-{}-{unique}",
            std::process::id()
        ));
        JsonPlayerStore::open(root).unwrap()
    }

    fn record(category: &str) -> ProgressRecord {
        ProgressRecord {
            category: category.to_string(),
            total_answered: 5,
            correct_answers: 4,
            best_streak: 4,
            level: 2,
            recorded_at: fixed_now(),
        }
    }

    #[test]
    fn round_trips_progress_through_disk() {
        let store = temp_store();
        store.save_progress("ana", &record("Farm")).unwrap();

        let loaded = store.load_progress("ana", "Farm").unwrap().unwrap();
        assert_eq!(loaded, record("Farm"));
        assert!(store.load_progress("ana", "Forest").unwrap().is_none());
        assert!(store.load_progress("bruno", "Farm").unwrap().is_none());
    }

    #[test]
    fn appends_keep_history_in_order() {
        let store = temp_store();
        let mut second = record("Farm");
        second.total_answered = 9;

        store.save_progress("ana", &record("Farm")).unwrap();
        store.save_progress("ana", &second).unwrap();

        let player = store.load_player("ana").unwrap().unwrap();
        assert_eq!(player.progress["Farm"].len(), 2);
        assert_eq!(player.latest_progress("Farm").unwrap().total_answered, 9);
    }

    #[test]
    fn unsafe_characters_in_names_do_not_escape_the_root() {
        let store = temp_store();
        store.save_progress("../evil name", &record("Farm")).unwrap();

        let path = store.player_path("../evil name");
        assert!(path.starts_with(store.root()));
        assert!(store.load_progress("../evil name", "Farm").unwrap().is_some());
    }
}
