//! Record finalizer
//!
//! Hands a confirmed draft to the store. The caller decides what happens to
//! the session; on failure it is kept at the confirmation step.

use crate::models::{Collection, Record};
use crate::services::CatalogService;
use crate::utils::errors::Result;
use super::context::ConversationState;
use super::prompts::Reply;

/// Result of persisting a confirmed flow
#[derive(Debug, Clone, PartialEq)]
pub enum Finalized {
    Created(Record),
    Updated(Record),
    /// Edit flow confirmed without any change
    Unchanged,
}

impl Finalized {
    pub fn reply(&self) -> Reply {
        match self {
            Finalized::Created(record) => saved(record, true),
            Finalized::Updated(record) => saved(record, false),
            Finalized::Unchanged => Reply::text("ℹ️ No se realizaron cambios."),
        }
    }
}

fn saved(record: &Record, created: bool) -> Reply {
    let (entity, verb) = match (record.collection, created) {
        (Collection::Products, true) => ("Producto", "creado"),
        (Collection::Products, false) => ("Producto", "actualizado"),
        (Collection::Categories, true) => ("Categoría", "creada"),
        (Collection::Categories, false) => ("Categoría", "actualizada"),
        (Collection::Posts, true) => ("Publicación", "creada"),
        (Collection::Posts, false) => ("Publicación", "actualizada"),
    };
    Reply::text(format!(
        "✅ {} \"{}\" {} correctamente.\nID: {}",
        entity,
        record.label(),
        verb,
        record.id
    ))
}

#[derive(Debug, Clone)]
pub struct RecordFinalizer {
    catalog: CatalogService,
}

impl RecordFinalizer {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    pub async fn finalize(&self, state: &ConversationState) -> Result<Finalized> {
        let collection = state.flow.collection();
        let fields = state.fields_to_write();

        match &state.target_record_id {
            None => self.catalog.create(collection, fields).await.map(Finalized::Created),
            Some(_) if fields.is_empty() => Ok(Finalized::Unchanged),
            Some(id) => self.catalog.update(collection, id, fields).await.map(Finalized::Updated),
        }
    }
}
