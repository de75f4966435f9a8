//! Test helpers module
//!
//! Record stores that record or fail writes, and engine builders on top of them.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::Value;
use ShopAdmin::database::{MemoryRecordStore, RecordStore};
use ShopAdmin::models::{Collection, Record, RecordFields};
use ShopAdmin::services::CatalogService;
use ShopAdmin::state::{FlowEngine, InMemorySessionStore, SessionStore};
use ShopAdmin::{Result, ShopAdminError};

pub const PLACEHOLDER: &str = "https://via.placeholder.com/300x200?text=Sin+imagen";
pub const OWNER: i64 = 4242;

/// A write seen by the store
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Create { collection: Collection, fields: Value },
    Update { collection: Collection, id: String, fields: Value },
}

/// Memory store that keeps a log of writes and can be switched to failing
#[derive(Debug, Default)]
pub struct RecordingRecordStore {
    inner: MemoryRecordStore,
    writes: Mutex<Vec<Write>>,
    failing: AtomicBool,
}

impl RecordingRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    fn check(&self, collection: Collection) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ShopAdminError::WriteFailed {
                collection: collection.to_string(),
                reason: "store offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for RecordingRecordStore {
    async fn create_record(&self, collection: Collection, fields: RecordFields) -> Result<Record> {
        self.check(collection)?;
        self.writes.lock().unwrap().push(Write::Create {
            collection,
            fields: Value::Object(fields.clone()),
        });
        self.inner.create_record(collection, fields).await
    }

    async fn update_record(&self, collection: Collection, id: &str, fields: RecordFields) -> Result<Record> {
        self.check(collection)?;
        self.writes.lock().unwrap().push(Write::Update {
            collection,
            id: id.to_string(),
            fields: Value::Object(fields.clone()),
        });
        self.inner.update_record(collection, id, fields).await
    }

    async fn get_record(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        self.inner.get_record(collection, id).await
    }

    async fn list_records(&self, collection: Collection) -> Result<Vec<Record>> {
        self.inner.list_records(collection).await
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> Result<bool> {
        self.inner.delete_record(collection, id).await
    }
}

/// Engine wired to the given store with in-memory sessions
pub fn engine_with(store: Arc<RecordingRecordStore>) -> (FlowEngine, Arc<dyn SessionStore>) {
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(chrono::Duration::minutes(30)));
    let catalog = CatalogService::new(store);
    (FlowEngine::new(sessions.clone(), catalog, PLACEHOLDER), sessions)
}

pub fn fields(value: Value) -> RecordFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

/// Seed categories directly, bypassing the write log
pub async fn seed_categories(store: &RecordingRecordStore, names: &[&str]) {
    for name in names {
        store
            .inner
            .create_record(Collection::Categories, fields(serde_json::json!({ "nombre": name })))
            .await
            .unwrap();
    }
}

/// Feed several messages, returning the reply texts
pub async fn feed(engine: &FlowEngine, owner: i64, inputs: &[&str]) -> Vec<String> {
    let mut replies = Vec::new();
    for input in inputs {
        let reply = engine
            .handle_text(owner, input)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("no active flow for input {:?}", input));
        replies.push(reply.text);
    }
    replies
}
