//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks

use teloxide::{Bot, prelude::*, types::{CallbackQuery, ChatId}};
use tracing::{debug, warn};
use crate::handlers::commands::catalog;
use crate::handlers::{ensure_admin, send_reply};
use crate::models::Collection;
use crate::services::ServiceFactory;
use crate::state::prompts::{FLOW_CALLBACK_PREFIX, INACTIVE};
use crate::utils::errors::Result;

/// Parsed inline button data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Button of the active flow; carries the token after the prefix
    Flow(String),
    Edit { collection: Collection, id: String },
    Delete { collection: Collection, id: String },
    ForceDelete { collection: Collection, id: String },
    CancelDelete,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(token) = data.strip_prefix(FLOW_CALLBACK_PREFIX) {
            return Some(CallbackAction::Flow(token.to_string()));
        }
        if data == "delcancel" {
            return Some(CallbackAction::CancelDelete);
        }

        let mut parts = data.splitn(3, ':');
        let action = parts.next()?;
        let collection: Collection = parts.next()?.parse().ok()?;
        let id = parts.next().filter(|id| !id.is_empty())?.to_string();

        match action {
            "edit" => Some(CallbackAction::Edit { collection, id }),
            "del" => Some(CallbackAction::Delete { collection, id }),
            "delforce" if collection == Collection::Categories => {
                Some(CallbackAction::ForceDelete { collection, id })
            }
            _ => None,
        }
    }
}

/// Main callback query dispatcher
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, services: &ServiceFactory) -> Result<()> {
    let user = &query.from;
    let user_id = user.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    // Answer first to remove the loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = ?query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    if !ensure_admin(&bot, chat_id, user, services).await? {
        return Ok(());
    }

    let Some(action) = CallbackAction::parse(data) else {
        warn!(user_id = user_id, data = %data, "Unknown callback data");
        return Ok(());
    };
    debug!(user_id = user_id, action = ?action, "Routing callback");

    match action {
        CallbackAction::Flow(token) => match services.flows.handle_button(user_id, &token).await? {
            Some(reply) => send_reply(&bot, chat_id, reply).await,
            None => {
                bot.send_message(chat_id, INACTIVE).await?;
                Ok(())
            }
        },
        CallbackAction::Edit { collection, id } => {
            catalog::start_edit(&bot, chat_id, user_id, collection, &id, services).await
        }
        CallbackAction::Delete { collection, id } => {
            catalog::delete_record(&bot, chat_id, user_id, collection, &id, false, services).await
        }
        CallbackAction::ForceDelete { collection, id } => {
            catalog::delete_record(&bot, chat_id, user_id, collection, &id, true, services).await
        }
        CallbackAction::CancelDelete => {
            bot.send_message(chat_id, "👍 Eliminación cancelada.").await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_actions() {
        assert_eq!(
            CallbackAction::parse("del:productos:abc"),
            Some(CallbackAction::Delete { collection: Collection::Products, id: "abc".to_string() })
        );
        assert_eq!(
            CallbackAction::parse("edit:publicaciones:p-1"),
            Some(CallbackAction::Edit { collection: Collection::Posts, id: "p-1".to_string() })
        );
        assert_eq!(
            CallbackAction::parse("delforce:categorias:c1"),
            Some(CallbackAction::ForceDelete { collection: Collection::Categories, id: "c1".to_string() })
        );
    }

    #[test]
    fn test_parse_rejects_bad_data() {
        assert_eq!(CallbackAction::parse("delforce:productos:x"), None);
        assert_eq!(CallbackAction::parse("del:usuarios:x"), None);
        assert_eq!(CallbackAction::parse("del:productos:"), None);
        assert_eq!(CallbackAction::parse("lang:es"), None);
    }

    #[test]
    fn test_flow_data_passes_through() {
        assert_eq!(
            CallbackAction::parse("flow:confirm"),
            Some(CallbackAction::Flow("confirm".to_string()))
        );
        assert_eq!(CallbackAction::parse("delcancel"), Some(CallbackAction::CancelDelete));
    }
}
