//! Per-user analysis history
//!
//! Each user's history is a JSON array stored under `history_{user_id}`,
//! newest first and capped at `HISTORY_CAP` entries.

use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::core::store::{decode, KeyValueStore};
use crate::types::HistoryItem;
use crate::{Result, HISTORY_CAP};

/// History service over any key-value backend
pub struct HistoryService {
    store: Arc<dyn KeyValueStore>,
    /// Serializes reads against read-modify-write cycles
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for HistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryService").finish_non_exhaustive()
    }
}

impl HistoryService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn key(user_id: &str) -> String {
        format!("history_{}", user_id)
    }

    fn read(&self, user_id: &str) -> Result<Vec<HistoryItem>> {
        let key = Self::key(user_id);
        match self.store.get(&key)? {
            Some(raw) => decode(&key, &raw),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, user_id: &str, items: &[HistoryItem]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(&Self::key(user_id), &json)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Prepend `item`, dropping the oldest entries past the cap
    pub fn save(&self, user_id: &str, item: HistoryItem) -> Result<()> {
        let _guard = self.lock();
        let mut items = self.read(user_id)?;
        items.insert(0, item);
        items.truncate(HISTORY_CAP);
        debug!(user_id, entries = items.len(), "history saved");
        self.write(user_id, &items)
    }

    /// Newest first
    pub fn list(&self, user_id: &str) -> Result<Vec<HistoryItem>> {
        let _guard = self.lock();
        self.read(user_id)
    }

    /// Remove the entry with `id`; unknown ids are ignored
    pub fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        let _guard = self.lock();
        let mut items = self.read(user_id)?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() != before {
            self.write(user_id, &items)?;
        }
        Ok(())
    }

    /// Attach notes to an entry; false if no entry has `id`
    pub fn update_notes(&self, user_id: &str, id: &str, notes: &str) -> Result<bool> {
        let _guard = self.lock();
        let mut items = self.read(user_id)?;
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            return Ok(false);
        };
        item.user_notes = Some(notes.to_string());
        self.write(user_id, &items)?;
        Ok(true)
    }
}
