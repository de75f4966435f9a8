//! Catalog service
//!
//! Thin layer over the record store used by handlers and flows.

use std::sync::Arc;
use tracing::warn;
use crate::database::RecordStore;
use crate::models::{Collection, Record, RecordFields};
use crate::utils::errors::Result;
use crate::utils::logging::log_record_write;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// List a collection. A failed fetch yields an empty list, so callers
    /// cannot tell "empty" from "unavailable".
    pub async fn list(&self, collection: Collection) -> Vec<Record> {
        match self.store.list_records(collection).await {
            Ok(records) => records,
            Err(e) => {
                warn!(collection = %collection, error = %e, "Failed to list records, treating as empty");
                Vec::new()
            }
        }
    }

    /// Names of all categories in listing order
    pub async fn category_names(&self) -> Vec<String> {
        self.list(Collection::Categories)
            .await
            .iter()
            .filter_map(|r| r.get_str("nombre").map(str::to_string))
            .collect()
    }

    /// Products whose category matches `name` case-insensitively
    pub async fn products_in_category(&self, name: &str) -> Vec<Record> {
        let wanted = name.to_lowercase();
        self.list(Collection::Products)
            .await
            .into_iter()
            .filter(|p| p.get_str("categoria").map(|c| c.to_lowercase() == wanted).unwrap_or(false))
            .collect()
    }

    /// Whether the store answers at all
    pub async fn is_reachable(&self) -> bool {
        self.store.list_records(Collection::Categories).await.is_ok()
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        self.store.get_record(collection, id).await
    }

    pub async fn create(&self, collection: Collection, fields: RecordFields) -> Result<Record> {
        let result = self.store.create_record(collection, fields).await;
        log_record_write(
            collection.as_str(),
            "create",
            result.as_ref().ok().map(|r| r.id.as_str()),
            result.is_ok(),
        );
        result
    }

    pub async fn update(&self, collection: Collection, id: &str, fields: RecordFields) -> Result<Record> {
        let result = self.store.update_record(collection, id, fields).await;
        log_record_write(collection.as_str(), "update", Some(id), result.is_ok());
        result
    }

    pub async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let result = self.store.delete_record(collection, id).await;
        log_record_write(collection.as_str(), "delete", Some(id), result.is_ok());
        result
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}
