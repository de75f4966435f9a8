//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ShopAdmin application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must be kept alive for the lifetime of the process when
/// a log file is configured, otherwise buffered lines are lost on exit.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout_layer = if config.json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "shopadmin.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_ansi(false).with_writer(non_blocking).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a step of a conversational flow
pub fn log_flow_event(owner_id: i64, flow: &str, step: &str, event: &str) {
    debug!(
        owner_id = owner_id,
        flow = flow,
        step = step,
        event = event,
        "Flow event"
    );
}

/// Log record writes against the store
pub fn log_record_write(collection: &str, operation: &str, record_id: Option<&str>, success: bool) {
    if success {
        info!(
            collection = collection,
            operation = operation,
            record_id = record_id,
            "Record write completed"
        );
    } else {
        error!(
            collection = collection,
            operation = operation,
            record_id = record_id,
            "Record write failed"
        );
    }
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}

/// Log unauthorized access attempts
pub fn log_access_denied(user_id: i64, username: Option<&str>) {
    warn!(
        user_id = user_id,
        username = username,
        "Unauthorized access attempt"
    );
}
