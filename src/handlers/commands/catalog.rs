//! Catalog handlers: sections, listings, record pickers and deletion

use teloxide::{Bot, prelude::*, types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup}};
use tracing::info;
use crate::handlers::menu::{section_keyboard, section_title};
use crate::handlers::{send_chunked, send_reply};
use crate::models::{Collection, Record};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;
use crate::utils::helpers::{format_price_clp, format_timestamp, truncate_text};
use crate::utils::logging::log_admin_action;

/// Buttons per picker message
const PICKER_PAGE: usize = 50;
const PICKER_LABEL_CHARS: usize = 40;
const POST_PREVIEW_CHARS: usize = 100;

fn plural(collection: Collection) -> &'static str {
    match collection {
        Collection::Products => "productos",
        Collection::Categories => "categorías",
        Collection::Posts => "publicaciones",
    }
}

fn empty_message(collection: Collection) -> &'static str {
    match collection {
        Collection::Products => "📭 No hay productos registrados.",
        Collection::Categories => "📭 No hay categorías registradas.",
        Collection::Posts => "📭 No hay publicaciones registradas.",
    }
}

fn render_entry(index: usize, record: &Record) -> String {
    match record.collection {
        Collection::Products => {
            let price = record
                .get_f64("precio")
                .map(format_price_clp)
                .unwrap_or_else(|| "-".to_string());
            let mut entry = format!(
                "{}. {} - {} ({})\n",
                index,
                record.label(),
                price,
                record.get_str("categoria").unwrap_or("Sin categoría")
            );
            if let Some(description) = record.get_str("descripcion").filter(|d| !d.is_empty()) {
                entry.push_str(&format!("   {}\n", description));
            }
            entry
        }
        Collection::Categories => match record.get_str("descripcion").filter(|d| !d.is_empty()) {
            Some(description) => format!("{}. {} - {}\n", index, record.label(), description),
            None => format!("{}. {}\n", index, record.label()),
        },
        Collection::Posts => format!(
            "{}. {}\n   {}\n   📅 {}\n",
            index,
            record.label(),
            truncate_text(record.get_str("contenido").unwrap_or(""), POST_PREVIEW_CHARS),
            format_timestamp(record.created_at)
        ),
    }
}

/// Numbered listing of a collection
pub fn render_list(collection: Collection, records: &[Record]) -> String {
    if records.is_empty() {
        return empty_message(collection).to_string();
    }

    let mut text = format!("📋 {} ({}):\n\n", plural(collection).to_uppercase(), records.len());
    for (i, record) in records.iter().enumerate() {
        text.push_str(&render_entry(i + 1, record));
        text.push('\n');
    }
    text
}

/// Show a section submenu
pub async fn show_section(bot: &Bot, chat_id: ChatId, collection: Collection) -> Result<()> {
    bot.send_message(chat_id, format!("{}\n\nElige una opción:", section_title(collection)))
        .reply_markup(section_keyboard(collection))
        .await?;
    Ok(())
}

pub async fn start_flow(
    bot: &Bot,
    chat_id: ChatId,
    owner_id: i64,
    collection: Collection,
    services: &ServiceFactory,
) -> Result<()> {
    let reply = services.flows.start(owner_id, collection).await?;
    send_reply(bot, chat_id, reply).await
}

pub async fn list_records(bot: &Bot, chat_id: ChatId, collection: Collection, services: &ServiceFactory) -> Result<()> {
    let records = services.catalog.list(collection).await;
    send_chunked(bot, chat_id, &render_list(collection, &records), services.message_chunk_size).await
}

/// What a picker button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Edit,
    Delete,
}

impl PickerAction {
    fn prefix(&self) -> &'static str {
        match self {
            PickerAction::Edit => "edit",
            PickerAction::Delete => "del",
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            PickerAction::Edit => "✏️ Elige el registro a editar:",
            PickerAction::Delete => "🗑️ Elige el registro a eliminar:",
        }
    }
}

/// Inline keyboards with one button per record
pub fn picker_keyboards(action: PickerAction, records: &[Record]) -> Vec<InlineKeyboardMarkup> {
    records
        .chunks(PICKER_PAGE)
        .map(|page| {
            InlineKeyboardMarkup::new(page.iter().map(|record| {
                vec![InlineKeyboardButton::callback(
                    truncate_text(record.label(), PICKER_LABEL_CHARS),
                    format!("{}:{}:{}", action.prefix(), record.collection, record.id),
                )]
            }))
        })
        .collect()
}

pub async fn show_picker(
    bot: &Bot,
    chat_id: ChatId,
    collection: Collection,
    action: PickerAction,
    services: &ServiceFactory,
) -> Result<()> {
    let records = services.catalog.list(collection).await;
    if records.is_empty() {
        bot.send_message(chat_id, render_list(collection, &records)).await?;
        return Ok(());
    }

    for keyboard in picker_keyboards(action, &records) {
        bot.send_message(chat_id, action.prompt())
            .reply_markup(keyboard)
            .await?;
    }
    Ok(())
}

/// Delete a record, asking first when products still use a category
pub async fn delete_record(
    bot: &Bot,
    chat_id: ChatId,
    admin_id: i64,
    collection: Collection,
    id: &str,
    force: bool,
    services: &ServiceFactory,
) -> Result<()> {
    let Some(record) = services.catalog.get(collection, id).await? else {
        bot.send_message(chat_id, "⚠️ El registro ya no existe.").await?;
        return Ok(());
    };

    if collection == Collection::Categories && !force {
        let in_use = services.catalog.products_in_category(record.label()).await.len();
        if in_use > 0 {
            let keyboard = InlineKeyboardMarkup::new(vec![vec![
                InlineKeyboardButton::callback("🗑️ Eliminar igualmente", format!("delforce:{}:{}", collection, id)),
                InlineKeyboardButton::callback("❌ Cancelar", "delcancel"),
            ]]);
            bot.send_message(
                chat_id,
                format!(
                    "⚠️ La categoría \"{}\" tiene {} producto(s) asociados. ¿Eliminarla de todas formas?",
                    record.label(),
                    in_use
                ),
            )
            .reply_markup(keyboard)
            .await?;
            return Ok(());
        }
    }

    let text = match services.catalog.delete(collection, id).await {
        Ok(true) => {
            log_admin_action(admin_id, "delete", Some(&format!("{}/{}", collection, id)));
            info!(collection = %collection, record_id = %id, "Record deleted");
            format!("✅ \"{}\" eliminado correctamente.", record.label())
        }
        Ok(false) => "⚠️ El registro ya no existe.".to_string(),
        Err(_) => "❌ Error al eliminar. Intenta nuevamente.".to_string(),
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}

pub async fn start_edit(
    bot: &Bot,
    chat_id: ChatId,
    owner_id: i64,
    collection: Collection,
    id: &str,
    services: &ServiceFactory,
) -> Result<()> {
    match services.catalog.get(collection, id).await? {
        Some(record) => {
            let reply = services.flows.start_edit(owner_id, &record).await?;
            send_reply(bot, chat_id, reply).await
        }
        None => {
            bot.send_message(chat_id, "⚠️ El registro ya no existe.").await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use crate::models::RecordFields;

    fn record(collection: Collection, id: &str, fields: serde_json::Value) -> Record {
        let fields: RecordFields = serde_json::from_value(fields).unwrap();
        Record {
            id: id.to_string(),
            collection,
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_list(Collection::Posts, &[]), "📭 No hay publicaciones registradas.");
    }

    #[test]
    fn test_render_product_list() {
        let products = vec![record(
            Collection::Products,
            "p1",
            json!({"nombre": "Huevos Blancos", "precio": 1200, "categoria": "Alimentos", "descripcion": "Producto fresco"}),
        )];

        let text = render_list(Collection::Products, &products);
        assert!(text.contains("1. Huevos Blancos - $1.200 (Alimentos)"));
        assert!(text.contains("Producto fresco"));
    }

    #[test]
    fn test_picker_callback_data() {
        let categories = vec![record(Collection::Categories, "c1", json!({"nombre": "Aseo"}))];
        let keyboards = picker_keyboards(PickerAction::Delete, &categories);

        assert_eq!(keyboards.len(), 1);
        let button = &keyboards[0].inline_keyboard[0][0];
        assert_eq!(button.text, "Aseo");
        assert_eq!(
            button.kind,
            teloxide::types::InlineKeyboardButtonKind::CallbackData("del:categorias:c1".to_string())
        );
    }
}
