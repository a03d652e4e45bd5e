use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::dashboard::aggregates::Aggregates;
use crate::error::{DashboardError, Result};
use crate::models::{NewVilla, Villa, VillaId};
use crate::store::RecordStore;

/// The session's authoritative view of villa records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommittedCollection {
    /// Newest first
    villas: Vec<Villa>,
    /// Ticket of the latest load or mutation reflected in `villas`
    applied_load: u64,
}

impl CommittedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_villas(villas: Vec<Villa>) -> Self {
        Self {
            villas,
            applied_load: 0,
        }
    }

    pub fn villas(&self) -> &[Villa] {
        &self.villas
    }
}

/// Result of a `load()` that reached the store successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A load or mutation started later already committed its result
    Superseded,
}

/// Owns the committed collection and routes every mutation through the store
///
/// Each successful call changes the collection under a single write lock, so
/// readers see either the old state or the new one. A failed call leaves it
/// untouched.
pub struct VillaRepository {
    store: Arc<dyn RecordStore>,
    state: RwLock<CommittedCollection>,
    load_tickets: AtomicU64,
}

impl VillaRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_state(store, CommittedCollection::new())
    }

    pub fn with_state(store: Arc<dyn RecordStore>, state: CommittedCollection) -> Self {
        let issued = state.applied_load;
        Self {
            store,
            state: RwLock::new(state),
            load_tickets: AtomicU64::new(issued),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CommittedCollection> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CommittedCollection> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply a successful mutation and stamp it with a fresh ticket, so any
    /// load that started before it can no longer overwrite it
    fn commit<T>(&self, apply: impl FnOnce(&mut Vec<Villa>) -> T) -> T {
        let mut state = self.write();
        state.applied_load = self.load_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        apply(&mut state.villas)
    }

    /// Replace the collection with the store's full record set
    ///
    /// Loads may overlap: a result is only committed when no load or
    /// mutation that started after it has already committed (last started
    /// wins).
    pub async fn load(&self) -> Result<LoadOutcome> {
        let ticket = self.load_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Load #{} from {} store", ticket, self.store.store_name());

        let mut villas = self.store.select_all().await.map_err(|e| {
            warn!("Load #{} failed: {}", ticket, e);
            DashboardError::fetch(e)
        })?;
        villas.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut state = self.write();
        if ticket < state.applied_load {
            info!("Load #{} superseded by #{}", ticket, state.applied_load);
            return Ok(LoadOutcome::Superseded);
        }

        let count = villas.len();
        state.villas = villas;
        state.applied_load = ticket;
        info!("Loaded {} villas", count);
        Ok(LoadOutcome::Applied { count })
    }

    pub async fn create(&self, draft: NewVilla) -> Result<Villa> {
        let draft = validated(draft)?;
        let stored = self
            .store
            .insert(&draft)
            .await
            .map_err(DashboardError::write)?;

        self.commit(|villas| villas.insert(0, stored.clone()));
        info!("Created villa {} ({})", stored.id, stored.name);
        Ok(stored)
    }

    pub async fn update(&self, id: VillaId, draft: NewVilla) -> Result<Villa> {
        let draft = validated(draft)?;
        let stored = self
            .store
            .update_by_id(id, &draft)
            .await
            .map_err(DashboardError::write)?;

        self.commit(|villas| match villas.iter_mut().find(|v| v.id == id) {
            Some(entry) => *entry = stored.clone(),
            None => warn!("Updated villa {} is not in the loaded collection", id),
        });
        info!("Updated villa {}", id);
        Ok(stored)
    }

    pub async fn remove(&self, id: VillaId) -> Result<()> {
        self.store
            .delete_by_id(id)
            .await
            .map_err(DashboardError::write)?;

        self.commit(|villas| villas.retain(|v| v.id != id));
        info!("Removed villa {}", id);
        Ok(())
    }

    pub fn aggregates(&self) -> Aggregates {
        Aggregates::from_villas(&self.read().villas)
    }

    /// Snapshot of the committed collection
    pub fn villas(&self) -> Vec<Villa> {
        self.read().villas.clone()
    }

    pub fn get(&self, id: VillaId) -> Option<Villa> {
        self.read().villas.iter().find(|v| v.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().villas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().villas.is_empty()
    }
}

/// Enforce required fields and drop repeated facility tags
fn validated(mut draft: NewVilla) -> Result<NewVilla> {
    if draft.name.trim().is_empty() {
        return Err(DashboardError::ValidationFailed("name required".to_string()));
    }

    let mut seen = Vec::with_capacity(draft.facilities.len());
    draft.facilities.retain(|tag| {
        if seen.contains(tag) {
            false
        } else {
            seen.push(tag.clone());
            true
        }
    });
    Ok(draft)
}
