//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for menu labels and flow input

pub mod callbacks;
pub mod commands;
pub mod menu;
pub mod messages;

// Re-export commonly used handler functions
pub use callbacks::handle_callback_query;
pub use commands::{handle_command, Command};
pub use messages::handle_message;

use teloxide::{Bot, prelude::*, types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, User}};
use crate::services::ServiceFactory;
use crate::state::{Reply, ReplyButton};
use crate::utils::errors::Result;
use crate::utils::helpers::chunk_message;

pub(crate) fn inline_keyboard(rows: &[Vec<ReplyButton>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.data.clone()))
            .collect::<Vec<_>>()
    }))
}

/// Send a flow reply with its inline buttons
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<()> {
    let request = bot.send_message(chat_id, reply.text);
    if reply.buttons.is_empty() {
        request.await?;
    } else {
        request.reply_markup(inline_keyboard(&reply.buttons)).await?;
    }
    Ok(())
}

/// Send a possibly long text as several messages
pub async fn send_chunked(bot: &Bot, chat_id: ChatId, text: &str, max_chars: usize) -> Result<()> {
    for chunk in chunk_message(text, max_chars) {
        bot.send_message(chat_id, chunk).await?;
    }
    Ok(())
}

/// Reply with a denial and return false when the user is not an admin
pub async fn ensure_admin(bot: &Bot, chat_id: ChatId, user: &User, services: &ServiceFactory) -> Result<bool> {
    if services.auth.check_user(user).is_ok() {
        return Ok(true);
    }

    bot.send_message(
        chat_id,
        format!("⛔ No tienes permiso para usar este bot.\nTu ID: {}", user.id.0),
    )
    .await?;
    Ok(false)
}
