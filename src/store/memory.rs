use crate::models::{NewVilla, Villa, VillaId};
use crate::store::traits::RecordStore;
use crate::store::types::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

/// In-process record store for offline runs and tests
///
/// Ids are sequential and `created_at` strictly increases, so rows come
/// back in the same newest-first order the remote store uses.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Newest first
    rows: Vec<Villa>,
    next_id: VillaId,
    last_created_at: Option<DateTime<Utc>>,
    fail_next: Option<String>,
}

impl Inner {
    fn take_failure(&mut self) -> Result<(), StoreError> {
        match self.fail_next.take() {
            Some(message) => Err(StoreError::Rejected { status: 500, message }),
            None => Ok(()),
        }
    }

    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Make the next store call fail with `message`
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock().await.fail_next = Some(message.into());
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select_all(&self) -> Result<Vec<Villa>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;
        Ok(inner.rows.clone())
    }

    async fn insert(&self, villa: &NewVilla) -> Result<Villa, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;

        let id = inner.next_id;
        inner.next_id += 1;
        let created_at = inner.next_created_at();
        let stored = Villa::from_new(id, created_at, villa.clone());

        inner.rows.insert(0, stored.clone());
        debug!("Inserted villa {} into memory store", id);
        Ok(stored)
    }

    async fn update_by_id(&self, id: VillaId, villa: &NewVilla) -> Result<Villa, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;

        let row = inner
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *row = Villa::from_new(row.id, row.created_at, villa.clone());
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: VillaId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;

        let position = inner
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(StoreError::NotFound(id))?;
        inner.rows.remove(position);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "Memory"
    }
}
