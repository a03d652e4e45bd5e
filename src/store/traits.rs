use crate::models::{NewVilla, Villa, VillaId};
use crate::store::types::StoreError;
use async_trait::async_trait;

/// Common trait for the persistence backends holding villa records
/// The repository only ever talks to the store through this seam
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, newest `created_at` first
    async fn select_all(&self) -> Result<Vec<Villa>, StoreError>;

    /// Insert a record and return it with its server-assigned columns
    async fn insert(&self, villa: &NewVilla) -> Result<Villa, StoreError>;

    /// Overwrite every editable column of `id` and return the stored row
    async fn update_by_id(&self, id: VillaId, villa: &NewVilla) -> Result<Villa, StoreError>;

    async fn delete_by_id(&self, id: VillaId) -> Result<(), StoreError>;

    /// Get the name of the backend
    fn store_name(&self) -> &'static str;
}
