//! Record store abstraction
//!
//! Document-style persistence: records are key-value maps grouped by
//! collection and identified by a store-assigned string id.

use async_trait::async_trait;
use crate::models::{Collection, Record, RecordFields};
use crate::utils::errors::Result;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record, assigning id and both timestamps
    async fn create_record(&self, collection: Collection, fields: RecordFields) -> Result<Record>;

    /// Merge `fields` into an existing record and bump its update timestamp.
    /// Fails with `RecordNotFound` when `id` does not exist.
    async fn update_record(&self, collection: Collection, id: &str, fields: RecordFields) -> Result<Record>;

    async fn get_record(&self, collection: Collection, id: &str) -> Result<Option<Record>>;

    /// All records of a collection, most recently updated first
    async fn list_records(&self, collection: Collection) -> Result<Vec<Record>>;

    /// Returns whether a record was removed
    async fn delete_record(&self, collection: Collection, id: &str) -> Result<bool>;
}
