//! Prompt texts shown while a flow is in progress

use crate::models::{CategoryDraft, CategoryField, PostDraft, PostField, ProductDraft, ProductField};
use crate::utils::helpers::format_price_clp;
use super::context::Flow;

/// Inline button attached to a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyButton {
    pub label: String,
    pub data: String,
}

impl ReplyButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self { label: label.into(), data: data.into() }
    }
}

/// Transport-agnostic reply: text plus optional rows of inline buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Vec<ReplyButton>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), buttons: Vec::new() }
    }

    pub fn with_buttons(mut self, buttons: Vec<Vec<ReplyButton>>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Prepend a line to the text
    pub fn prefixed(mut self, line: &str) -> Self {
        self.text = format!("{}\n\n{}", line, self.text);
        self
    }
}

/// Callback data prefix for in-flow buttons
pub const FLOW_CALLBACK_PREFIX: &str = "flow:";

/// Tokens carried by in-flow buttons after the prefix
pub const BUTTON_CONFIRM: &str = "confirm";
pub const BUTTON_EDIT: &str = "edit";
pub const BUTTON_CANCEL: &str = "cancel";
pub const BUTTON_USE_EXISTING: &str = "usar_existente";
pub const BUTTON_OTHER_NAME: &str = "otro_nombre";

fn flow_button(label: &str, token: &str) -> ReplyButton {
    ReplyButton::new(label, format!("{}{}", FLOW_CALLBACK_PREFIX, token))
}

pub const CANCELLED: &str = "❌ Operación cancelada.";
/// Sent for a button that does not belong to the current step
pub const INACTIVE: &str = "ℹ️ Esta operación ya no está activa.";

pub fn product_name() -> Reply {
    Reply::text("📝 Nuevo producto\n\nEscribe el nombre del producto:")
}

pub fn category_name() -> Reply {
    Reply::text("📝 Nueva categoría\n\nEscribe el nombre de la categoría:")
}

pub fn post_title() -> Reply {
    Reply::text("📝 Nueva publicación\n\nEscribe el título de la publicación:")
}

pub fn empty_name() -> Reply {
    Reply::text("⚠️ El nombre no puede estar vacío. Escríbelo nuevamente:")
}

pub fn empty_title() -> Reply {
    Reply::text("⚠️ El título no puede estar vacío. Escríbelo nuevamente:")
}

pub fn product_description() -> Reply {
    Reply::text("Escribe una descripción para el producto:")
}

pub fn category_description() -> Reply {
    Reply::text("Escribe una descripción para la categoría:")
}

pub fn post_content() -> Reply {
    Reply::text("Escribe el contenido de la publicación:")
}

pub fn product_price() -> Reply {
    Reply::text("💰 Escribe el precio del producto (solo números, ej: 1200):")
}

pub fn invalid_price() -> Reply {
    Reply::text("⚠️ Precio inválido. Debe ser un número mayor que cero. Intenta nuevamente:")
}

pub fn product_category(options: &[String]) -> Reply {
    if options.is_empty() {
        return Reply::text("🏷️ No hay categorías registradas. Escribe el nombre de la categoría:");
    }

    let list: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect();
    Reply::text(format!(
        "🏷️ Elige una categoría escribiendo su número o escribe una nueva:\n\n{}",
        list.join("\n")
    ))
}

pub fn empty_category() -> Reply {
    Reply::text("⚠️ La categoría no puede estar vacía. Escríbela nuevamente:")
}

pub fn product_image() -> Reply {
    Reply::text("🖼️ Envía la URL de la imagen o escribe \"skip\" para omitirla:")
}

pub fn duplicate_category(existing: &str) -> Reply {
    Reply::text(format!(
        "⚠️ Ya existe una categoría llamada \"{}\".\n\n¿Quieres usar la existente o escribir otro nombre?",
        existing
    ))
    .with_buttons(vec![vec![
        flow_button("Usar existente", BUTTON_USE_EXISTING),
        flow_button("Otro nombre", BUTTON_OTHER_NAME),
    ]])
}

pub fn using_existing_category(existing: &str) -> Reply {
    Reply::text(format!("👍 Se usará la categoría existente \"{}\". No se creó un registro nuevo.", existing))
}

pub fn different_category_name() -> Reply {
    Reply::text("Escribe otro nombre para la categoría:")
}

fn confirm_buttons() -> Vec<Vec<ReplyButton>> {
    vec![vec![
        flow_button("✅ Confirmar", BUTTON_CONFIRM),
        flow_button("✏️ Editar", BUTTON_EDIT),
        flow_button("❌ Cancelar", BUTTON_CANCEL),
    ]]
}

fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

fn product_lines(draft: &ProductDraft) -> Vec<String> {
    vec![
        format!("{}: {}", ProductField::Name.label(), or_placeholder(&draft.nombre, "-")),
        format!("{}: {}", ProductField::Description.label(), or_placeholder(&draft.descripcion, "(sin descripción)")),
        format!("{}: {}", ProductField::Price.label(), draft.precio.map(format_price_clp).unwrap_or_else(|| "-".to_string())),
        format!("{}: {}", ProductField::Category.label(), or_placeholder(&draft.categoria, "-")),
        format!("{}: {}", ProductField::Image.label(), or_placeholder(&draft.imagen_url, "-")),
    ]
}

fn category_lines(draft: &CategoryDraft) -> Vec<String> {
    vec![
        format!("{}: {}", CategoryField::Name.label(), or_placeholder(&draft.nombre, "-")),
        format!("{}: {}", CategoryField::Description.label(), or_placeholder(&draft.descripcion, "(sin descripción)")),
    ]
}

fn post_lines(draft: &PostDraft) -> Vec<String> {
    vec![
        format!("{}: {}", PostField::Title.label(), or_placeholder(&draft.titulo, "-")),
        format!("{}: {}", PostField::Content.label(), or_placeholder(&draft.contenido, "(sin contenido)")),
    ]
}

pub fn product_summary(draft: &ProductDraft) -> Reply {
    confirmation("📋 Resumen del producto", product_lines(draft))
}

pub fn category_summary(draft: &CategoryDraft) -> Reply {
    confirmation("📋 Resumen de la categoría", category_lines(draft))
}

pub fn post_summary(draft: &PostDraft) -> Reply {
    confirmation("📋 Resumen de la publicación", post_lines(draft))
}

/// Confirmation summary of the draft
pub fn summary(flow: &Flow) -> Reply {
    match flow {
        Flow::Product { draft, .. } => product_summary(draft),
        Flow::Category { draft, .. } => category_summary(draft),
        Flow::Post { draft, .. } => post_summary(draft),
    }
}

fn confirmation(title: &str, lines: Vec<String>) -> Reply {
    Reply::text(format!(
        "{}:\n\n{}\n\n¿Deseas guardar? Responde \"confirmar\", \"editar\" o \"cancelar\".",
        title,
        lines.join("\n")
    ))
    .with_buttons(confirm_buttons())
}

/// Numbered list of editable fields
pub fn field_menu(labels: &[&str]) -> Reply {
    let list: Vec<String> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {}", i + 1, label))
        .collect();
    let buttons = labels
        .iter()
        .enumerate()
        .map(|(i, label)| vec![flow_button(label, &(i + 1).to_string())])
        .collect();

    Reply::text(format!("✏️ ¿Qué campo quieres modificar?\n\n{}", list.join("\n"))).with_buttons(buttons)
}

pub fn invalid_field_choice(labels: &[&str]) -> Reply {
    field_menu(labels).prefixed("⚠️ Opción no válida.")
}

/// Prompt for a new value of a single field
pub fn edit_value(label: &str, current: Option<String>) -> Reply {
    match current {
        Some(value) if !value.is_empty() => Reply::text(format!(
            "Valor actual de {}: {}\n\nEscribe el nuevo valor:",
            label, value
        )),
        _ => Reply::text(format!("Escribe el nuevo valor para {}:", label)),
    }
}

pub fn save_failed() -> &'static str {
    "❌ Error al guardar. Tus datos se conservaron: confirma de nuevo para reintentar o cancela."
}
