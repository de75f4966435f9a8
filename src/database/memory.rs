//! In-process record store

use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use crate::models::{Collection, Record, RecordFields};
use crate::utils::errors::{ShopAdminError, Result};
use crate::utils::helpers::generate_uuid;
use super::store::RecordStore;

/// Record store kept in memory; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_record(&self, collection: Collection, fields: RecordFields) -> Result<Record> {
        let now = Utc::now();
        let record = Record {
            id: generate_uuid(),
            collection,
            fields,
            created_at: now,
            updated_at: now,
        };

        self.records
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(record.clone());

        debug!(collection = %collection, record_id = %record.id, "Created record in memory");
        Ok(record)
    }

    async fn update_record(&self, collection: Collection, id: &str, fields: RecordFields) -> Result<Record> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&collection)
            .and_then(|list| list.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| ShopAdminError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        record.fields.extend(fields);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn get_record(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let records = self.records.read().await;
        Ok(records
            .get(&collection)
            .and_then(|list| list.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn list_records(&self, collection: Collection) -> Result<Vec<Record>> {
        let records = self.records.read().await;
        let mut list = records.get(&collection).cloned().unwrap_or_default();
        // Newest first; equal timestamps come out in reverse insertion order
        list.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        list.reverse();
        Ok(list)
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let Some(list) = records.get_mut(&collection) else {
            return Ok(false);
        };

        let before = list.len();
        list.retain(|r| r.id != id);
        Ok(list.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(name: &str) -> RecordFields {
        let mut fields = RecordFields::new();
        fields.insert("nombre".to_string(), json!(name));
        fields
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = MemoryRecordStore::new();
        let record = store.create_record(Collection::Categories, fields("Alimentos")).await.unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.get_str("nombre"), Some("Alimentos"));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryRecordStore::new();
        let record = store.create_record(Collection::Categories, fields("Aseo")).await.unwrap();

        let mut change = RecordFields::new();
        change.insert("descripcion".to_string(), json!("Hogar"));
        let updated = store.update_record(Collection::Categories, &record.id, change).await.unwrap();

        assert_eq!(updated.get_str("nombre"), Some("Aseo"));
        assert_eq!(updated.get_str("descripcion"), Some("Hogar"));
        assert!(updated.updated_at >= record.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let store = MemoryRecordStore::new();
        let result = store.update_record(Collection::Products, "nope", RecordFields::new()).await;
        assert!(matches!(result, Err(ShopAdminError::RecordNotFound { .. })));
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryRecordStore::new();
        store.create_record(Collection::Categories, fields("Bebidas")).await.unwrap();

        assert!(store.list_records(Collection::Products).await.unwrap().is_empty());
        assert_eq!(store.list_records(Collection::Categories).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_reported() {
        let store = MemoryRecordStore::new();
        let record = store.create_record(Collection::Posts, fields("x")).await.unwrap();

        assert!(store.delete_record(Collection::Posts, &record.id).await.unwrap());
        assert!(!store.delete_record(Collection::Posts, &record.id).await.unwrap());
        assert!(store.get_record(Collection::Posts, &record.id).await.unwrap().is_none());
    }
}
