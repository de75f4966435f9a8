//! Message handlers module
//!
//! Routes text messages: menu labels first, then flow input.

use teloxide::{Bot, prelude::*, types::{ChatId, Message, User}};
use tracing::debug;
use crate::handlers::commands::{catalog, help, start, stats};
use crate::handlers::commands::catalog::PickerAction;
use crate::handlers::menu::{main_menu_keyboard, MenuAction};
use crate::handlers::{ensure_admin, send_reply};
use crate::services::ServiceFactory;
use crate::utils::errors::{ShopAdminError, Result};

/// Handle incoming text messages
pub async fn handle_message(bot: Bot, msg: Message, services: &ServiceFactory) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        ShopAdminError::InvalidInput("No user in message".to_string())
    })?;
    let owner_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    if !chat_id.is_user() {
        debug!(chat_id = ?chat_id, "Ignoring message outside a private chat");
        return Ok(());
    }
    if !ensure_admin(&bot, chat_id, user, services).await? {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        if services.flows.has_active_flow(owner_id).await? {
            bot.send_message(chat_id, "⚠️ Envía la respuesta como texto.").await?;
        }
        return Ok(());
    };

    if let Some(action) = MenuAction::from_text(text) {
        return handle_menu_action(&bot, chat_id, user, action, services).await;
    }

    match services.flows.handle_text(owner_id, text).await? {
        Some(reply) => send_reply(&bot, chat_id, reply).await,
        None => handle_regular_message(&bot, chat_id).await,
    }
}

/// Run a menu action; starting a flow replaces any flow in progress
pub async fn handle_menu_action(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    action: MenuAction,
    services: &ServiceFactory,
) -> Result<()> {
    let owner_id = user.id.0 as i64;
    debug!(owner_id = owner_id, action = ?action, "Menu action");

    match action {
        MenuAction::MainMenu => {
            bot.send_message(chat_id, "🏠 Menú principal")
                .reply_markup(main_menu_keyboard())
                .await?;
            Ok(())
        }
        MenuAction::Section(collection) => catalog::show_section(bot, chat_id, collection).await,
        MenuAction::New(collection) => catalog::start_flow(bot, chat_id, owner_id, collection, services).await,
        MenuAction::List(collection) => catalog::list_records(bot, chat_id, collection, services).await,
        MenuAction::Edit(collection) => {
            catalog::show_picker(bot, chat_id, collection, PickerAction::Edit, services).await
        }
        MenuAction::Delete(collection) => {
            catalog::show_picker(bot, chat_id, collection, PickerAction::Delete, services).await
        }
        MenuAction::SectionStats(collection) => {
            stats::handle_section_stats(bot, chat_id, collection, services).await
        }
        MenuAction::Stats => stats::handle_general(bot, chat_id, services).await,
        MenuAction::Settings => start::handle_settings(bot, chat_id).await,
        MenuAction::SystemInfo => start::handle_info(bot, chat_id, user, services).await,
        MenuAction::Verify => start::handle_verify(bot, chat_id, user, services).await,
        MenuAction::Report => stats::handle_report(bot, chat_id, services).await,
        MenuAction::Help => help::handle_help(bot, chat_id).await,
    }
}

/// Handle text outside any flow
async fn handle_regular_message(bot: &Bot, chat_id: ChatId) -> Result<()> {
    bot.send_message(chat_id, "🤔 No entendí el mensaje. Usa el menú o escribe /help.")
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}
