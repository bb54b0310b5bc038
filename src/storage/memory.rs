/// In-memory implementation of the storage interfaces
///
/// Keeps everything in maps behind a mutex. Used by tests and anywhere a
/// throwaway tracker is handy; behaves like `SqliteStorage`, including
/// cascading deletes and the missing-item errors.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{CompletionRecord, ItemKind, TrackableId, TrackableItem, WaterLog};
use crate::storage::{CompletionRepository, StorageError, TrackerStorage};

#[derive(Default)]
struct MemoryState {
    items: HashMap<TrackableId, TrackableItem>,
    records: HashMap<TrackableId, CompletionRecord>,
    water: WaterLog,
    water_target: Option<u32>,
}

/// Storage that lives and dies with the process
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn not_found(item_id: &TrackableId) -> StorageError {
    StorageError::ItemNotFound {
        item_id: item_id.to_string(),
    }
}

impl TrackerStorage for MemoryStorage {
    fn create_item(&self, item: &TrackableItem) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if state.items.contains_key(&item.id) {
            return Err(StorageError::DuplicateItem {
                item_id: item.id.to_string(),
            });
        }
        state.items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn get_item(&self, item_id: &TrackableId) -> Result<TrackableItem, StorageError> {
        self.lock()?
            .items
            .get(item_id)
            .cloned()
            .ok_or_else(|| not_found(item_id))
    }

    fn update_item(&self, item: &TrackableItem) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let stored = state.items.get_mut(&item.id).ok_or_else(|| not_found(&item.id))?;
        *stored = item.clone();
        Ok(())
    }

    fn delete_item(&self, item_id: &TrackableId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.items.remove(item_id).ok_or_else(|| not_found(item_id))?;
        state.records.remove(item_id);
        Ok(())
    }

    fn list_items(
        &self,
        kind: Option<ItemKind>,
        active_only: bool,
    ) -> Result<Vec<TrackableItem>, StorageError> {
        let state = self.lock()?;
        let mut items: Vec<TrackableItem> = state
            .items
            .values()
            .filter(|item| kind.map_or(true, |k| item.kind == k))
            .filter(|item| !active_only || item.is_active)
            .cloned()
            .collect();

        items.sort_by(|a, b| a.created_on.cmp(&b.created_on).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    fn load_water_log(&self) -> Result<WaterLog, StorageError> {
        Ok(self.lock()?.water.clone())
    }

    fn save_water_log(&self, log: &WaterLog) -> Result<(), StorageError> {
        self.lock()?.water = log.clone();
        Ok(())
    }

    fn water_target(&self) -> Result<Option<u32>, StorageError> {
        Ok(self.lock()?.water_target)
    }

    fn set_water_target(&self, target_ml: u32) -> Result<(), StorageError> {
        self.lock()?.water_target = Some(target_ml);
        Ok(())
    }
}

impl CompletionRepository for MemoryStorage {
    fn load(&self, item_id: &TrackableId) -> Result<CompletionRecord, StorageError> {
        let state = self.lock()?;
        let item = state.items.get(item_id).ok_or_else(|| not_found(item_id))?;

        let record = state.records.get(item_id).cloned().unwrap_or_default();
        Ok(record.reconciled(&item.scheduled_days))
    }

    fn save(&self, item_id: &TrackableId, record: &CompletionRecord) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if !state.items.contains_key(item_id) {
            return Err(not_found(item_id));
        }

        state.records.insert(item_id.clone(), record.clone());
        Ok(())
    }
}
