//! Step dispatcher
//!
//! Interprets one incoming text against the current step, stores the value
//! in the draft and moves the flow forward.

use crate::models::{CategoryDraft, CategoryField, PostDraft, PostField, ProductDraft, ProductField};
use crate::services::CatalogService;
use crate::utils::helpers::format_price_clp;
use super::context::{mark_changed, CategoryStep, ConversationState, Flow, PostStep, ProductStep};
use super::prompts::{
    self, Reply, BUTTON_CANCEL, BUTTON_CONFIRM, BUTTON_EDIT, BUTTON_OTHER_NAME, BUTTON_USE_EXISTING,
};

const CANCEL_TOKENS: [&str; 3] = ["cancel", "cancelar", "/cancel"];
const CONFIRM_TOKENS: [&str; 5] = ["confirm", "confirmar", "si", "sí", "guardar"];
const EDIT_TOKENS: [&str; 2] = ["edit", "editar"];
const USE_EXISTING_TOKENS: [&str; 2] = ["usar_existente", "use existing"];
const DIFFERENT_NAME_TOKENS: [&str; 2] = ["otro_nombre", "different name"];
const SKIP_TOKEN: &str = "skip";

/// What the caller should do after a step
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Keep the (possibly updated) state and show the reply
    Continue(Reply),
    /// Drop the state without writing anything
    Finish(Reply),
    /// The draft was confirmed and should be persisted
    Finalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Confirm,
    Edit,
    Cancel,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DuplicateChoice {
    UseExisting,
    DifferentName,
    Other,
}

/// Typed text is only trimmed; button data never reaches this path unchecked
pub fn normalize_input(text: &str) -> &str {
    text.trim()
}

/// Whether a button token is one of the buttons the current step shows.
/// Buttons left over from earlier messages must not be read as field values.
pub fn accepts_button(flow: &Flow, token: &str) -> bool {
    let confirm_buttons = [BUTTON_CONFIRM, BUTTON_EDIT, BUTTON_CANCEL].contains(&token);
    let field_index = token.parse::<usize>().is_ok();

    match flow {
        Flow::Product { step: ProductStep::Confirm, .. }
        | Flow::Category { step: CategoryStep::Confirm, .. }
        | Flow::Post { step: PostStep::Confirm, .. } => confirm_buttons,
        Flow::Product { step: ProductStep::ChooseField, .. }
        | Flow::Category { step: CategoryStep::ChooseField, .. }
        | Flow::Post { step: PostStep::ChooseField, .. } => field_index,
        Flow::Category { step: CategoryStep::DuplicateName { .. }, .. } => {
            [BUTTON_USE_EXISTING, BUTTON_OTHER_NAME].contains(&token)
        }
        _ => false,
    }
}

fn matches_any(input: &str, tokens: &[&str]) -> bool {
    let lowered = input.to_lowercase();
    tokens.iter().any(|t| *t == lowered)
}

pub fn is_cancel(input: &str) -> bool {
    matches_any(input, &CANCEL_TOKENS)
}

pub fn confirm_choice(input: &str) -> ConfirmChoice {
    if matches_any(input, &CONFIRM_TOKENS) {
        ConfirmChoice::Confirm
    } else if matches_any(input, &EDIT_TOKENS) {
        ConfirmChoice::Edit
    } else if is_cancel(input) {
        ConfirmChoice::Cancel
    } else {
        ConfirmChoice::Other
    }
}

fn duplicate_choice(input: &str) -> DuplicateChoice {
    if matches_any(input, &USE_EXISTING_TOKENS) {
        DuplicateChoice::UseExisting
    } else if matches_any(input, &DIFFERENT_NAME_TOKENS) {
        DuplicateChoice::DifferentName
    } else {
        DuplicateChoice::Other
    }
}

/// Parse a price after dropping everything but ASCII digits and dots.
/// Only finite values above zero are accepted.
pub fn parse_price(input: &str) -> Option<f64> {
    let cleaned: String = input.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

/// A 1-based index into `options` picks that entry; anything else is a new name
pub fn resolve_category(input: &str, options: &[String]) -> String {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Pick a field by 1-based index, label or stored key
fn choose_field<F: Copy>(input: &str, fields: &[F], label: fn(&F) -> &'static str, key: fn(&F) -> &'static str) -> Option<F> {
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| fields.get(i)).copied();
    }
    let lowered = input.to_lowercase();
    fields
        .iter()
        .find(|f| label(f).to_lowercase() == lowered || key(f) == lowered)
        .copied()
}

fn labels<F>(fields: &[F], label: fn(&F) -> &'static str) -> Vec<&'static str> {
    fields.iter().map(label).collect()
}

#[derive(Debug, Clone)]
pub struct StepDispatcher {
    catalog: CatalogService,
    placeholder_image: String,
}

impl StepDispatcher {
    pub fn new(catalog: CatalogService, placeholder_image: impl Into<String>) -> Self {
        Self {
            catalog,
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Apply one message to the state
    pub async fn dispatch(&self, state: &mut ConversationState, text: &str) -> Transition {
        let input = normalize_input(text);
        if is_cancel(input) {
            return Transition::Finish(Reply::text(prompts::CANCELLED));
        }

        let editing = state.is_editing();
        let ConversationState { flow, changed_fields, .. } = state;
        match flow {
            Flow::Product { step, draft } => self.product_step(step, draft, changed_fields, input).await,
            Flow::Category { step, draft } => {
                self.category_step(step, draft, editing, changed_fields, input).await
            }
            Flow::Post { step, draft } => post_step(step, draft, changed_fields, input),
        }
    }

    fn image_value(&self, input: &str) -> String {
        if input.is_empty() || input.eq_ignore_ascii_case(SKIP_TOKEN) {
            self.placeholder_image.clone()
        } else {
            input.to_string()
        }
    }

    async fn product_step(
        &self,
        step: &mut ProductStep,
        draft: &mut ProductDraft,
        changed: &mut Vec<String>,
        input: &str,
    ) -> Transition {
        let field_labels = labels(&ProductField::ALL, ProductField::label);

        match step.clone() {
            ProductStep::Name => match non_empty(input) {
                None => Transition::Continue(prompts::empty_name()),
                Some(name) => {
                    draft.nombre = Some(name);
                    *step = ProductStep::Description;
                    Transition::Continue(prompts::product_description())
                }
            },
            ProductStep::Description => {
                draft.descripcion = Some(input.to_string());
                *step = ProductStep::Price;
                Transition::Continue(prompts::product_price())
            }
            ProductStep::Price => match parse_price(input) {
                None => Transition::Continue(prompts::invalid_price()),
                Some(price) => {
                    draft.precio = Some(price);
                    let options = self.catalog.category_names().await;
                    let reply = prompts::product_category(&options);
                    *step = ProductStep::Category { options };
                    Transition::Continue(reply)
                }
            },
            ProductStep::Category { options } => {
                if input.is_empty() {
                    return Transition::Continue(prompts::empty_category());
                }
                draft.categoria = Some(resolve_category(input, &options));
                *step = ProductStep::Image;
                Transition::Continue(prompts::product_image())
            }
            ProductStep::Image => {
                draft.imagen_url = Some(self.image_value(input));
                *step = ProductStep::Confirm;
                Transition::Continue(prompts::product_summary(draft))
            }
            ProductStep::Confirm => match confirm_choice(input) {
                ConfirmChoice::Confirm => Transition::Finalize,
                ConfirmChoice::Edit => {
                    *step = ProductStep::ChooseField;
                    Transition::Continue(prompts::field_menu(&field_labels))
                }
                ConfirmChoice::Cancel => Transition::Finish(Reply::text(prompts::CANCELLED)),
                ConfirmChoice::Other => Transition::Continue(prompts::product_summary(draft)),
            },
            ProductStep::ChooseField => {
                match choose_field(input, &ProductField::ALL, ProductField::label, ProductField::key) {
                    None => Transition::Continue(prompts::invalid_field_choice(&field_labels)),
                    Some(ProductField::Category) => {
                        let options = self.catalog.category_names().await;
                        let reply = prompts::product_category(&options);
                        *step = ProductStep::EditCategory { options };
                        Transition::Continue(reply)
                    }
                    Some(field) => {
                        *step = ProductStep::EditField(field);
                        Transition::Continue(prompts::edit_value(field.label(), product_value(draft, field)))
                    }
                }
            }
            ProductStep::EditField(field) => {
                let applied = match field {
                    ProductField::Name => non_empty(input).map(|name| draft.nombre = Some(name)).ok_or_else(prompts::empty_name),
                    ProductField::Description => {
                        draft.descripcion = Some(input.to_string());
                        Ok(())
                    }
                    ProductField::Price => parse_price(input).map(|price| draft.precio = Some(price)).ok_or_else(prompts::invalid_price),
                    // Field choice routes categories to EditCategory; only a typed name lands here
                    ProductField::Category if input.is_empty() => Err(prompts::empty_category()),
                    ProductField::Category => {
                        draft.categoria = Some(input.to_string());
                        Ok(())
                    }
                    ProductField::Image => {
                        draft.imagen_url = Some(self.image_value(input));
                        Ok(())
                    }
                };

                match applied {
                    Err(reprompt) => Transition::Continue(reprompt),
                    Ok(()) => {
                        mark_changed(changed, field.key());
                        *step = ProductStep::Confirm;
                        Transition::Continue(prompts::product_summary(draft))
                    }
                }
            }
            ProductStep::EditCategory { options } => {
                if input.is_empty() {
                    return Transition::Continue(prompts::empty_category());
                }
                draft.categoria = Some(resolve_category(input, &options));
                mark_changed(changed, ProductField::Category.key());
                *step = ProductStep::Confirm;
                Transition::Continue(prompts::product_summary(draft))
            }
        }
    }

    async fn category_step(
        &self,
        step: &mut CategoryStep,
        draft: &mut CategoryDraft,
        editing: bool,
        changed: &mut Vec<String>,
        input: &str,
    ) -> Transition {
        let field_labels = labels(&CategoryField::ALL, CategoryField::label);

        match step.clone() {
            CategoryStep::Name => self.submit_category_name(step, draft, editing, changed, input).await,
            CategoryStep::DuplicateName { candidate } => match duplicate_choice(input) {
                DuplicateChoice::UseExisting => Transition::Finish(prompts::using_existing_category(&candidate)),
                DuplicateChoice::DifferentName => {
                    *step = if returns_to_confirm(draft, editing) {
                        CategoryStep::EditField(CategoryField::Name)
                    } else {
                        CategoryStep::Name
                    };
                    Transition::Continue(prompts::different_category_name())
                }
                DuplicateChoice::Other => self.submit_category_name(step, draft, editing, changed, input).await,
            },
            CategoryStep::Description => {
                draft.descripcion = Some(input.to_string());
                *step = CategoryStep::Confirm;
                Transition::Continue(prompts::category_summary(draft))
            }
            CategoryStep::Confirm => match confirm_choice(input) {
                ConfirmChoice::Confirm => Transition::Finalize,
                ConfirmChoice::Edit => {
                    *step = CategoryStep::ChooseField;
                    Transition::Continue(prompts::field_menu(&field_labels))
                }
                ConfirmChoice::Cancel => Transition::Finish(Reply::text(prompts::CANCELLED)),
                ConfirmChoice::Other => Transition::Continue(prompts::category_summary(draft)),
            },
            CategoryStep::ChooseField => {
                match choose_field(input, &CategoryField::ALL, CategoryField::label, CategoryField::key) {
                    None => Transition::Continue(prompts::invalid_field_choice(&field_labels)),
                    Some(field) => {
                        let current = match field {
                            CategoryField::Name => draft.nombre.clone(),
                            CategoryField::Description => draft.descripcion.clone(),
                        };
                        *step = CategoryStep::EditField(field);
                        Transition::Continue(prompts::edit_value(field.label(), current))
                    }
                }
            }
            CategoryStep::EditField(CategoryField::Name) => {
                self.submit_category_name(step, draft, editing, changed, input).await
            }
            CategoryStep::EditField(CategoryField::Description) => {
                draft.descripcion = Some(input.to_string());
                mark_changed(changed, CategoryField::Description.key());
                *step = CategoryStep::Confirm;
                Transition::Continue(prompts::category_summary(draft))
            }
        }
    }

    /// Name submission with the case-insensitive duplicate check
    async fn submit_category_name(
        &self,
        step: &mut CategoryStep,
        draft: &mut CategoryDraft,
        editing: bool,
        changed: &mut Vec<String>,
        input: &str,
    ) -> Transition {
        let Some(name) = non_empty(input) else {
            return Transition::Continue(prompts::empty_name());
        };

        let wanted = name.to_lowercase();
        let current = draft.nombre.as_deref().map(str::to_lowercase);
        let existing = self
            .catalog
            .category_names()
            .await
            .into_iter()
            .find(|n| n.to_lowercase() == wanted && current.as_deref() != Some(wanted.as_str()));

        if let Some(existing) = existing {
            let reply = prompts::duplicate_category(&existing);
            *step = CategoryStep::DuplicateName { candidate: existing };
            return Transition::Continue(reply);
        }

        let back_to_confirm = returns_to_confirm(draft, editing);
        draft.nombre = Some(name);
        if back_to_confirm {
            mark_changed(changed, CategoryField::Name.key());
            *step = CategoryStep::Confirm;
            Transition::Continue(prompts::category_summary(draft))
        } else {
            *step = CategoryStep::Description;
            Transition::Continue(prompts::category_description())
        }
    }
}

/// A name change goes back to the summary once the description step is behind us
fn returns_to_confirm(draft: &CategoryDraft, editing: bool) -> bool {
    editing || draft.descripcion.is_some()
}

fn product_value(draft: &ProductDraft, field: ProductField) -> Option<String> {
    match field {
        ProductField::Name => draft.nombre.clone(),
        ProductField::Description => draft.descripcion.clone(),
        ProductField::Price => draft.precio.map(format_price_clp),
        ProductField::Category => draft.categoria.clone(),
        ProductField::Image => draft.imagen_url.clone(),
    }
}

fn post_step(step: &mut PostStep, draft: &mut PostDraft, changed: &mut Vec<String>, input: &str) -> Transition {
    let field_labels = labels(&PostField::ALL, PostField::label);

    match step.clone() {
        PostStep::Title => match non_empty(input) {
            None => Transition::Continue(prompts::empty_title()),
            Some(title) => {
                draft.titulo = Some(title);
                *step = PostStep::Content;
                Transition::Continue(prompts::post_content())
            }
        },
        PostStep::Content => {
            draft.contenido = Some(input.to_string());
            *step = PostStep::Confirm;
            Transition::Continue(prompts::post_summary(draft))
        }
        PostStep::Confirm => match confirm_choice(input) {
            ConfirmChoice::Confirm => Transition::Finalize,
            ConfirmChoice::Edit => {
                *step = PostStep::ChooseField;
                Transition::Continue(prompts::field_menu(&field_labels))
            }
            ConfirmChoice::Cancel => Transition::Finish(Reply::text(prompts::CANCELLED)),
            ConfirmChoice::Other => Transition::Continue(prompts::post_summary(draft)),
        },
        PostStep::ChooseField => match choose_field(input, &PostField::ALL, PostField::label, PostField::key) {
            None => Transition::Continue(prompts::invalid_field_choice(&field_labels)),
            Some(field) => {
                let current = match field {
                    PostField::Title => draft.titulo.clone(),
                    PostField::Content => draft.contenido.clone(),
                };
                *step = PostStep::EditField(field);
                Transition::Continue(prompts::edit_value(field.label(), current))
            }
        },
        PostStep::EditField(field) => {
            match field {
                PostField::Title => match non_empty(input) {
                    None => return Transition::Continue(prompts::empty_title()),
                    Some(title) => draft.titulo = Some(title),
                },
                PostField::Content => draft.contenido = Some(input.to_string()),
            }
            mark_changed(changed, field.key());
            *step = PostStep::Confirm;
            Transition::Continue(prompts::post_summary(draft))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::Duration;
    use serde_json::json;
    use crate::database::{MemoryRecordStore, RecordStore};
    use crate::models::{Collection, RecordFields};

    const PLACEHOLDER: &str = "https://via.placeholder.com/300x200?text=Sin+imagen";

    async fn dispatcher_with_categories(names: &[&str]) -> StepDispatcher {
        let store = Arc::new(MemoryRecordStore::new());
        for name in names {
            let mut fields = RecordFields::new();
            fields.insert("nombre".to_string(), json!(name));
            store.create_record(Collection::Categories, fields).await.unwrap();
        }
        StepDispatcher::new(CatalogService::new(store), PLACEHOLDER)
    }

    fn new_state(collection: Collection) -> ConversationState {
        ConversationState::new(1, Flow::new(collection), Duration::minutes(30))
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("1200"), Some(1200.0));
        assert_eq!(parse_price("$1,200"), Some(1200.0));
        assert_eq!(parse_price("2.5"), Some(2.5));
        assert_eq!(parse_price("0"), None);
        assert_eq!(parse_price("gratis"), None);
        assert_eq!(parse_price("-5"), Some(5.0));
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn test_resolve_category() {
        let options = vec!["Alimentos".to_string(), "Limpieza".to_string()];
        assert_eq!(resolve_category("2", &options), "Limpieza");
        assert_eq!(resolve_category("0", &options), "0");
        assert_eq!(resolve_category("3", &options), "3");
        assert_eq!(resolve_category("Bebidas", &options), "Bebidas");
    }

    #[test]
    fn test_tokens() {
        assert!(is_cancel("CANCELAR"));
        assert!(is_cancel("/cancel"));
        assert_eq!(confirm_choice("Sí"), ConfirmChoice::Confirm);
        assert_eq!(confirm_choice("guardar"), ConfirmChoice::Confirm);
        assert_eq!(confirm_choice("Editar"), ConfirmChoice::Edit);
        assert_eq!(confirm_choice("tal vez"), ConfirmChoice::Other);
        assert_eq!(normalize_input("  confirmar "), "confirmar");
        assert_eq!(normalize_input("flow:confirm"), "flow:confirm");
    }

    #[tokio::test]
    async fn test_product_name_rejects_blank() {
        let dispatcher = dispatcher_with_categories(&[]).await;
        let mut state = new_state(Collection::Products);

        let transition = dispatcher.dispatch(&mut state, "   ").await;
        assert_eq!(transition, Transition::Continue(prompts::empty_name()));
        assert_eq!(state.flow.step_name(), "name");
    }

    #[tokio::test]
    async fn test_invalid_price_keeps_step() {
        let dispatcher = dispatcher_with_categories(&[]).await;
        let mut state = new_state(Collection::Products);
        dispatcher.dispatch(&mut state, "Pan").await;
        dispatcher.dispatch(&mut state, "Amasado").await;

        for bad in ["abc", "0", "-0", ""] {
            dispatcher.dispatch(&mut state, bad).await;
            assert_eq!(state.flow.step_name(), "price");
            if let Flow::Product { draft, .. } = &state.flow {
                assert_eq!(draft.precio, None);
                assert_eq!(draft.nombre.as_deref(), Some("Pan"));
            }
        }
    }

    #[tokio::test]
    async fn test_category_index_resolves_listed_option() {
        let dispatcher = dispatcher_with_categories(&["Limpieza", "Alimentos"]).await;
        let mut state = new_state(Collection::Products);
        for input in ["Pan", "", "900"] {
            dispatcher.dispatch(&mut state, input).await;
        }

        let Flow::Product { step: ProductStep::Category { options }, .. } = &state.flow else {
            panic!("expected category step, got {:?}", state.flow);
        };
        let first = options[0].clone();

        dispatcher.dispatch(&mut state, "1").await;
        let Flow::Product { draft, step } = &state.flow else { unreachable!() };
        assert_eq!(draft.categoria.as_deref(), Some(first.as_str()));
        assert_eq!(*step, ProductStep::Image);
    }

    #[tokio::test]
    async fn test_skip_uses_placeholder() {
        let dispatcher = dispatcher_with_categories(&[]).await;
        let mut state = new_state(Collection::Products);
        for input in ["Pan", "", "900", "Panadería", "SkIp"] {
            dispatcher.dispatch(&mut state, input).await;
        }

        let Flow::Product { draft, step } = &state.flow else { unreachable!() };
        assert_eq!(draft.imagen_url.as_deref(), Some(PLACEHOLDER));
        assert_eq!(*step, ProductStep::Confirm);
    }

    #[tokio::test]
    async fn test_unrecognized_confirm_redisplays_summary() {
        let dispatcher = dispatcher_with_categories(&[]).await;
        let mut state = new_state(Collection::Posts);
        dispatcher.dispatch(&mut state, "Oferta").await;
        dispatcher.dispatch(&mut state, "2x1 en pan").await;

        let transition = dispatcher.dispatch(&mut state, "quizás").await;
        let Transition::Continue(reply) = transition else { panic!("expected summary") };
        assert!(reply.text.contains("Oferta"));
        assert!(state.flow.is_confirming());

        assert_eq!(dispatcher.dispatch(&mut state, "confirm").await, Transition::Finalize);
    }

    #[tokio::test]
    async fn test_duplicate_category_name_is_case_insensitive() {
        let dispatcher = dispatcher_with_categories(&["Alimentos", "Limpieza"]).await;
        let mut state = new_state(Collection::Categories);

        dispatcher.dispatch(&mut state, "alimentos").await;
        assert_eq!(
            state.flow,
            Flow::Category {
                step: CategoryStep::DuplicateName { candidate: "Alimentos".to_string() },
                draft: CategoryDraft::default(),
            }
        );

        dispatcher.dispatch(&mut state, "otro_nombre").await;
        assert_eq!(state.flow.step_name(), "name");

        dispatcher.dispatch(&mut state, "alimentos").await;
        let transition = dispatcher.dispatch(&mut state, "usar_existente").await;
        assert!(matches!(transition, Transition::Finish(_)));
    }

    #[tokio::test]
    async fn test_duplicate_step_accepts_fresh_name() {
        let dispatcher = dispatcher_with_categories(&["Alimentos"]).await;
        let mut state = new_state(Collection::Categories);
        dispatcher.dispatch(&mut state, "ALIMENTOS").await;
        dispatcher.dispatch(&mut state, "Bebidas").await;

        let Flow::Category { step, draft } = &state.flow else { unreachable!() };
        assert_eq!(*step, CategoryStep::Description);
        assert_eq!(draft.nombre.as_deref(), Some("Bebidas"));
    }

    #[tokio::test]
    async fn test_edit_from_confirm_returns_to_summary() {
        let dispatcher = dispatcher_with_categories(&[]).await;
        let mut state = new_state(Collection::Posts);
        for input in ["Oferta", "2x1", "editar", "2", "3x2"] {
            dispatcher.dispatch(&mut state, input).await;
        }

        let Flow::Post { step, draft } = &state.flow else { unreachable!() };
        assert_eq!(*step, PostStep::Confirm);
        assert_eq!(draft.contenido.as_deref(), Some("3x2"));
        assert_eq!(state.changed_fields, vec!["contenido".to_string()]);
    }

    #[tokio::test]
    async fn test_choose_field_by_label_and_bad_choice() {
        let dispatcher = dispatcher_with_categories(&[]).await;
        let mut state = new_state(Collection::Products);
        if let Flow::Product { step, .. } = &mut state.flow {
            *step = ProductStep::ChooseField;
        }

        dispatcher.dispatch(&mut state, "9").await;
        assert_eq!(state.flow.step_name(), "choose_field");

        dispatcher.dispatch(&mut state, "precio").await;
        let Flow::Product { step, .. } = &state.flow else { unreachable!() };
        assert_eq!(*step, ProductStep::EditField(ProductField::Price));

        dispatcher.dispatch(&mut state, "cero").await;
        assert_eq!(state.flow.step_name(), "edit_field");
    }

    #[tokio::test]
    async fn test_cancel_finishes_from_any_step() {
        let dispatcher = dispatcher_with_categories(&[]).await;
        let mut state = new_state(Collection::Products);
        dispatcher.dispatch(&mut state, "Pan").await;

        let transition = dispatcher.dispatch(&mut state, "Cancelar").await;
        assert_eq!(transition, Transition::Finish(Reply::text(prompts::CANCELLED)));
    }

    #[test]
    fn test_buttons_only_accepted_where_shown() {
        let mut flow = Flow::new(Collection::Products);
        assert!(!accepts_button(&flow, "confirm"));
        assert!(!accepts_button(&flow, "1"));

        if let Flow::Product { step, .. } = &mut flow {
            *step = ProductStep::Confirm;
        }
        assert!(accepts_button(&flow, "confirm"));
        assert!(accepts_button(&flow, "cancel"));
        assert!(!accepts_button(&flow, "2"));

        if let Flow::Product { step, .. } = &mut flow {
            *step = ProductStep::ChooseField;
        }
        assert!(accepts_button(&flow, "2"));
        assert!(!accepts_button(&flow, "edit"));

        let duplicate = Flow::Category {
            step: CategoryStep::DuplicateName { candidate: "Aseo".to_string() },
            draft: CategoryDraft::default(),
        };
        assert!(accepts_button(&duplicate, "usar_existente"));
        assert!(accepts_button(&duplicate, "otro_nombre"));
        assert!(!accepts_button(&duplicate, "confirm"));
    }

    #[tokio::test]
    async fn test_category_edit_resolves_against_shown_list() {
        let dispatcher = dispatcher_with_categories(&["Limpieza", "Alimentos"]).await;
        let mut state = new_state(Collection::Products);
        if let Flow::Product { step, .. } = &mut state.flow {
            *step = ProductStep::ChooseField;
        }

        dispatcher.dispatch(&mut state, "4").await;
        let Flow::Product { step: ProductStep::EditCategory { options }, .. } = &state.flow else {
            panic!("expected category edit step, got {:?}", state.flow);
        };
        let second = options[1].clone();

        dispatcher.dispatch(&mut state, "2").await;
        let Flow::Product { draft, step } = &state.flow else { unreachable!() };
        assert_eq!(draft.categoria.as_deref(), Some(second.as_str()));
        assert_eq!(*step, ProductStep::Confirm);
        assert_eq!(state.changed_fields, vec!["categoria".to_string()]);
    }
}
