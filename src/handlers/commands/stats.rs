//! Statistics handlers

use teloxide::{Bot, prelude::*, types::ChatId};
use crate::handlers::send_chunked;
use crate::models::Collection;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Handle /estadisticas
pub async fn handle_general(bot: &Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    bot.send_message(chat_id, "📊 Calculando estadísticas...").await?;
    let text = services.stats.general().await;
    send_chunked(bot, chat_id, &text, services.message_chunk_size).await
}

/// Handle /reporte
pub async fn handle_report(bot: &Bot, chat_id: ChatId, services: &ServiceFactory) -> Result<()> {
    bot.send_message(chat_id, "📈 Generando reporte detallado...").await?;
    let text = services.stats.inventory().await;
    send_chunked(bot, chat_id, &text, services.message_chunk_size).await
}

/// Statistics button of a section menu
pub async fn handle_section_stats(
    bot: &Bot,
    chat_id: ChatId,
    collection: Collection,
    services: &ServiceFactory,
) -> Result<()> {
    let text = services.stats.section(collection).await;
    send_chunked(bot, chat_id, &text, services.message_chunk_size).await
}
