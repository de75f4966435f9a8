//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod catalog;
pub mod help;
pub mod start;
pub mod stats;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use tracing::debug;
use crate::models::Collection;
use crate::services::ServiceFactory;
use crate::utils::errors::{ShopAdminError, Result};
use super::ensure_admin;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Comandos disponibles:")]
pub enum Command {
    #[command(description = "Mostrar el menú principal")]
    Start,
    #[command(description = "Mostrar la ayuda")]
    Help,
    #[command(description = "Cancelar la operación en curso")]
    Cancel,
    #[command(description = "Gestionar productos")]
    Productos,
    #[command(description = "Gestionar categorías")]
    Categorias,
    #[command(description = "Gestionar publicaciones")]
    Publicaciones,
    #[command(description = "Ver estadísticas generales")]
    Estadisticas,
    #[command(description = "Ver reporte detallado de inventario")]
    Reporte,
    #[command(description = "Verificar tu acceso")]
    Verificar,
    #[command(description = "Información del sistema")]
    Info,
}

/// Main command dispatcher
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, services: &ServiceFactory) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        ShopAdminError::InvalidInput("No user in message".to_string())
    })?;
    let chat_id = msg.chat.id;
    debug!(user_id = user.id.0, command = ?cmd, "Processing command");

    if cmd == Command::Verificar {
        return start::handle_verify(&bot, chat_id, user, services).await;
    }
    if !ensure_admin(&bot, chat_id, user, services).await? {
        return Ok(());
    }

    let owner_id = user.id.0 as i64;
    match cmd {
        Command::Start => start::handle_start(&bot, chat_id, user).await,
        Command::Help => help::handle_help(&bot, chat_id).await,
        Command::Cancel => start::handle_cancel(&bot, chat_id, owner_id, services).await,
        Command::Productos => catalog::show_section(&bot, chat_id, Collection::Products).await,
        Command::Categorias => catalog::show_section(&bot, chat_id, Collection::Categories).await,
        Command::Publicaciones => catalog::show_section(&bot, chat_id, Collection::Posts).await,
        Command::Estadisticas => stats::handle_general(&bot, chat_id, services).await,
        Command::Reporte => stats::handle_report(&bot, chat_id, services).await,
        Command::Info => start::handle_info(&bot, chat_id, user, services).await,
        Command::Verificar => Ok(()),
    }
}
