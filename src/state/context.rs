//! Conversation state
//!
//! One in-progress flow per owner. The flow is a tagged enum so every step
//! only exists for the entity that can reach it.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use crate::models::{
    CategoryDraft, CategoryField, Collection, PostDraft, PostField, ProductDraft, ProductField,
    Record, RecordFields,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductStep {
    Name,
    Description,
    Price,
    /// Category names listed to the user, for numeric selection
    Category { options: Vec<String> },
    Image,
    Confirm,
    ChooseField,
    EditField(ProductField),
    /// Editing the category; `options` is the list shown with the prompt
    EditCategory { options: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategoryStep {
    Name,
    /// A category named like `candidate` already exists
    DuplicateName { candidate: String },
    Description,
    Confirm,
    ChooseField,
    EditField(CategoryField),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostStep {
    Title,
    Content,
    Confirm,
    ChooseField,
    EditField(PostField),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Flow {
    Product { step: ProductStep, draft: ProductDraft },
    Category { step: CategoryStep, draft: CategoryDraft },
    Post { step: PostStep, draft: PostDraft },
}

impl Flow {
    /// Fresh creation flow for a collection
    pub fn new(collection: Collection) -> Self {
        match collection {
            Collection::Products => Flow::Product { step: ProductStep::Name, draft: ProductDraft::default() },
            Collection::Categories => Flow::Category { step: CategoryStep::Name, draft: CategoryDraft::default() },
            Collection::Posts => Flow::Post { step: PostStep::Title, draft: PostDraft::default() },
        }
    }

    /// Edit flow for an existing record, prefilled and waiting for a field choice
    pub fn for_record(record: &Record) -> Self {
        match record.collection {
            Collection::Products => Flow::Product {
                step: ProductStep::ChooseField,
                draft: ProductDraft::from_record(record),
            },
            Collection::Categories => Flow::Category {
                step: CategoryStep::ChooseField,
                draft: CategoryDraft::from_record(record),
            },
            Collection::Posts => Flow::Post {
                step: PostStep::ChooseField,
                draft: PostDraft::from_record(record),
            },
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Flow::Product { .. } => Collection::Products,
            Flow::Category { .. } => Collection::Categories,
            Flow::Post { .. } => Collection::Posts,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Flow::Product { .. } => "product",
            Flow::Category { .. } => "category",
            Flow::Post { .. } => "post",
        }
    }

    /// Step name for logs
    pub fn step_name(&self) -> &'static str {
        match self {
            Flow::Product { step, .. } => match step {
                ProductStep::Name => "name",
                ProductStep::Description => "description",
                ProductStep::Price => "price",
                ProductStep::Category { .. } => "category",
                ProductStep::Image => "image",
                ProductStep::Confirm => "confirm",
                ProductStep::ChooseField => "choose_field",
                ProductStep::EditField(_) => "edit_field",
                ProductStep::EditCategory { .. } => "edit_category",
            },
            Flow::Category { step, .. } => match step {
                CategoryStep::Name => "name",
                CategoryStep::DuplicateName { .. } => "duplicate_name",
                CategoryStep::Description => "description",
                CategoryStep::Confirm => "confirm",
                CategoryStep::ChooseField => "choose_field",
                CategoryStep::EditField(_) => "edit_field",
            },
            Flow::Post { step, .. } => match step {
                PostStep::Title => "title",
                PostStep::Content => "content",
                PostStep::Confirm => "confirm",
                PostStep::ChooseField => "choose_field",
                PostStep::EditField(_) => "edit_field",
            },
        }
    }

    pub fn is_confirming(&self) -> bool {
        matches!(
            self,
            Flow::Product { step: ProductStep::Confirm, .. }
                | Flow::Category { step: CategoryStep::Confirm, .. }
                | Flow::Post { step: PostStep::Confirm, .. }
        )
    }

    /// Every collected field of the draft
    pub fn fields(&self) -> RecordFields {
        match self {
            Flow::Product { draft, .. } => draft.to_fields(),
            Flow::Category { draft, .. } => draft.to_fields(),
            Flow::Post { draft, .. } => draft.to_fields(),
        }
    }
}

pub(crate) fn mark_changed(changed: &mut Vec<String>, key: &str) {
    if !changed.iter().any(|k| k == key) {
        changed.push(key.to_string());
    }
}

/// In-progress flow of a single owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub owner_id: i64,
    pub flow: Flow,
    /// Set when the flow edits an existing record
    pub target_record_id: Option<String>,
    /// Keys changed during an edit flow
    #[serde(default)]
    pub changed_fields: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(owner_id: i64, flow: Flow, idle_timeout: Duration) -> Self {
        let now = Utc::now();
        Self {
            owner_id,
            flow,
            target_record_id: None,
            changed_fields: Vec::new(),
            updated_at: now,
            expires_at: now + idle_timeout,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.target_record_id.is_some()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Push the expiry forward after activity
    pub fn touch(&mut self, idle_timeout: Duration) {
        self.updated_at = Utc::now();
        self.expires_at = self.updated_at + idle_timeout;
    }

    pub fn mark_changed(&mut self, key: &str) {
        mark_changed(&mut self.changed_fields, key);
    }

    /// Fields to hand to the store: everything on create, only changes on edit
    pub fn fields_to_write(&self) -> RecordFields {
        let fields = self.flow.fields();
        if !self.is_editing() {
            return fields;
        }
        fields
            .into_iter()
            .filter(|(key, _)| self.changed_fields.contains(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(flow: Flow) -> ConversationState {
        ConversationState::new(42, flow, Duration::minutes(30))
    }

    #[test]
    fn test_new_flows_start_at_first_step() {
        assert_eq!(Flow::new(Collection::Products).step_name(), "name");
        assert_eq!(Flow::new(Collection::Categories).step_name(), "name");
        assert_eq!(Flow::new(Collection::Posts).step_name(), "title");
    }

    #[test]
    fn test_edit_flow_starts_at_field_choice() {
        let mut fields = RecordFields::new();
        fields.insert("titulo".to_string(), json!("Oferta"));
        fields.insert("contenido".to_string(), json!("2x1"));
        let record = Record {
            id: "p1".to_string(),
            collection: Collection::Posts,
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let flow = Flow::for_record(&record);
        assert_eq!(flow.step_name(), "choose_field");
        assert_eq!(flow.fields().get("titulo"), Some(&json!("Oferta")));
    }

    #[test]
    fn test_fields_to_write_on_edit_only_includes_changes() {
        let flow = Flow::Category {
            step: CategoryStep::Confirm,
            draft: CategoryDraft {
                nombre: Some("Aseo".to_string()),
                descripcion: Some("Hogar".to_string()),
            },
        };
        let mut state = state(flow);
        assert_eq!(state.fields_to_write().len(), 2);

        state.target_record_id = Some("c1".to_string());
        state.mark_changed("descripcion");
        state.mark_changed("descripcion");

        let fields = state.fields_to_write();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("descripcion"), Some(&json!("Hogar")));
    }

    #[test]
    fn test_expiry() {
        let mut state = ConversationState::new(1, Flow::new(Collection::Posts), Duration::seconds(-1));
        assert!(state.is_expired());

        state.touch(Duration::minutes(5));
        assert!(!state.is_expired());
    }

    #[test]
    fn test_state_serializes_round_trip() {
        let flow = Flow::Product {
            step: ProductStep::Category { options: vec!["Alimentos".to_string()] },
            draft: ProductDraft { precio: Some(1200.0), ..Default::default() },
        };
        let state = state(flow);

        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
