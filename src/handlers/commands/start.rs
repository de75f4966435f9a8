//! Start, cancel, access verification and system info handlers

use chrono::{DateTime, Duration, Utc};
use teloxide::{Bot, prelude::*, types::{ChatId, User}};
use tracing::info;
use crate::handlers::menu::{main_menu_keyboard, settings_keyboard};
use crate::services::{ServiceFactory, ServiceHealthStatus};
use crate::utils::helpers::format_timestamp;
use crate::state::prompts::CANCELLED;
use crate::utils::errors::Result;

/// Handle /start: greet and show the main menu
pub async fn handle_start(bot: &Bot, chat_id: ChatId, user: &User) -> Result<()> {
    info!(user_id = user.id.0, "User opened the main menu");

    let text = format!(
        "👋 ¡Hola, {}!\n\nBienvenido al panel de administración de la tienda. Elige una opción del menú:",
        user.first_name
    );
    bot.send_message(chat_id, text)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

/// Handle /cancel
pub async fn handle_cancel(bot: &Bot, chat_id: ChatId, owner_id: i64, services: &ServiceFactory) -> Result<()> {
    let text = if services.flows.cancel(owner_id).await? {
        CANCELLED
    } else {
        "ℹ️ No hay ninguna operación en curso."
    };
    bot.send_message(chat_id, text)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

/// Handle /verificar: report the caller's id, access and store status
pub async fn handle_verify(bot: &Bot, chat_id: ChatId, user: &User, services: &ServiceFactory) -> Result<()> {
    let user_id = user.id.0 as i64;
    let authorized = services.auth.is_authorized(user_id);
    let health = services.health_check().await;

    let mut text = format!(
        "🔍 Verificación\n\nTu ID: {}\nAcceso: {}\n",
        user_id,
        if authorized { "✅ autorizado" } else { "⛔ no autorizado" }
    );
    if services.auth.is_open() {
        text.push_str("⚠️ No hay lista de administradores configurada.\n");
    }

    if authorized {
        text.push_str(&format!(
            "\nBase de datos: {}\n",
            if health.store_reachable { "✅ conectada" } else { "❌ sin conexión" }
        ));
        match health.active_sessions {
            Some(count) => text.push_str(&format!("Formularios en curso: {}\n", count)),
            None => text.push_str("Sesiones: ❌ sin conexión\n"),
        }
    }

    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Handle the settings menu button
pub async fn handle_settings(bot: &Bot, chat_id: ChatId) -> Result<()> {
    bot.send_message(chat_id, "⚙️ PANEL DE CONFIGURACIÓN\n\nSelecciona una opción administrativa:")
        .reply_markup(settings_keyboard())
        .await?;
    Ok(())
}

/// Handle /info
pub async fn handle_info(bot: &Bot, chat_id: ChatId, user: &User, services: &ServiceFactory) -> Result<()> {
    let health = services.health_check().await;
    let now = Utc::now();
    let text = render_system_info(
        &crate::info(),
        now - services.started_at,
        &Caller::from(user),
        &health,
        now,
    );
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// The parts of the calling user shown by /info
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    pub id: u64,
    pub first_name: &'a str,
    pub username: Option<&'a str>,
}

impl<'a> From<&'a User> for Caller<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: user.id.0,
            first_name: &user.first_name,
            username: user.username.as_deref(),
        }
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ CONECTADO" } else { "❌ SIN CONEXIÓN" }
}

pub fn render_system_info(
    version: &str,
    uptime: Duration,
    caller: &Caller<'_>,
    health: &ServiceHealthStatus,
    now: DateTime<Utc>,
) -> String {
    let hours = uptime.num_seconds().max(0) as f64 / 3600.0;

    let mut text = String::from("ℹ️ INFORMACIÓN DEL SISTEMA\n\n");
    text.push_str("🤖 BOT:\n");
    text.push_str(&format!("• Versión: {}\n", version));
    text.push_str(&format!(
        "• Estado: {}\n",
        if health.is_healthy() { "✅ OPERATIVO" } else { "⚠️ DEGRADADO" }
    ));
    text.push_str("• Modo: Polling\n");
    text.push_str(&format!("• Tiempo activo: {:.2} horas\n\n", hours));

    text.push_str("👤 USUARIO:\n");
    text.push_str(&format!("• ID: {}\n", caller.id));
    text.push_str(&format!("• Nombre: {}\n", caller.first_name));
    text.push_str(&format!("• Username: @{}\n\n", caller.username.unwrap_or("No tiene")));

    text.push_str("📡 CONEXIONES:\n");
    text.push_str(&format!("• Base de datos: {}\n", status(health.store_reachable)));
    match health.active_sessions {
        Some(count) => text.push_str(&format!("• Sesiones: {} ({} en curso)\n\n", status(true), count)),
        None => text.push_str(&format!("• Sesiones: {}\n\n", status(false))),
    }

    text.push_str(&format!("🕐 Hora del servidor: {}", format_timestamp(now)));
    text
}
