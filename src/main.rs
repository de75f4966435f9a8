//! ShopAdmin Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error};

use ShopAdmin::{
    config::{SessionBackend, Settings, StoreBackend},
    utils::logging,
    database::{create_pool, run_migrations, MemoryRecordStore, PgRecordStore, RecordStore},
    services::ServiceFactory,
    state::{InMemorySessionStore, RedisSessionStore, SessionStore, SessionSweeper},
    middleware::logging::LoggingMiddleware,
    handlers::{handle_callback_query, handle_command, handle_message, Command},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ShopAdmin::info());

    let records: Arc<dyn RecordStore> = match settings.database.backend {
        StoreBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(&settings.database).await?;
            run_migrations(&pool).await?;
            Arc::new(PgRecordStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory record store; records are lost on restart");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let idle_timeout = chrono::Duration::seconds(settings.session.idle_timeout_seconds as i64);
    let sessions: Arc<dyn SessionStore> = match settings.session.backend {
        SessionBackend::Redis => {
            info!("Connecting to Redis...");
            Arc::new(RedisSessionStore::new(&settings.redis, idle_timeout).await?)
        }
        SessionBackend::Memory => Arc::new(InMemorySessionStore::new(idle_timeout)),
    };

    let mut sweeper = SessionSweeper::new(
        sessions.clone(),
        std::time::Duration::from_secs(settings.session.cleanup_interval_seconds),
    );
    sweeper.start();

    let bot = Bot::new(&settings.bot.token);

    info!("Initializing services...");
    let services = Arc::new(ServiceFactory::new(&settings, records, sessions));
    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            warn!(issue = %issue, "Startup health check");
        }
    }

    let log_text = matches!(settings.logging.level.to_lowercase().as_str(), "debug" | "trace");
    let logging_middleware = Arc::new(LoggingMiddleware::new(log_text));

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let mut dispatcher = Dispatcher::builder(bot.clone(), create_handler())
        .dependencies(dptree::deps![services, logging_middleware])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    sweeper.stop();
    info!("ShopAdmin bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle menu labels and flow input
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    logging: Arc<LoggingMiddleware>,
) -> HandlerResult {
    logging.log_message(&msg);
    let _timer = logging.start_timer("command");

    if let Err(e) = handle_command(bot, msg, cmd, &services).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    logging: Arc<LoggingMiddleware>,
) -> HandlerResult {
    logging.log_message(&msg);
    let _timer = logging.start_timer("message");

    if let Err(e) = handle_message(bot, msg, &services).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
    logging: Arc<LoggingMiddleware>,
) -> HandlerResult {
    logging.log_callback(&query);
    let _timer = logging.start_timer("callback");

    let user_id = query.from.id.0 as i64;
    if let Err(e) = handle_callback_query(bot, query, &services).await {
        error!(user_id = user_id, error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
