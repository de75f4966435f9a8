//! Help command handler

use teloxide::{Bot, prelude::*, types::ChatId};
use crate::utils::errors::Result;

pub const HELP_TEXT: &str = "🤖 Ayuda del panel de administración\n\n\
    /start - Mostrar el menú principal\n\
    /productos - Gestionar productos\n\
    /categorias - Gestionar categorías\n\
    /publicaciones - Gestionar publicaciones\n\
    /estadisticas - Ver estadísticas generales\n\
    /reporte - Ver reporte de inventario\n\
    /verificar - Ver tu ID y estado de acceso\n\
    /info - Ver información del sistema\n\
    /cancel - Cancelar la operación en curso\n\n\
    Durante un formulario puedes escribir \"cancelar\" en cualquier momento.";

/// Handle /help command
pub async fn handle_help(bot: &Bot, chat_id: ChatId) -> Result<()> {
    bot.send_message(chat_id, HELP_TEXT).await?;
    Ok(())
}
