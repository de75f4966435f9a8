//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ShopAdminError, Result};
use super::{Settings, SessionBackend, StoreBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    if settings.session.backend == SessionBackend::Redis {
        validate_redis_config(&settings.redis)?;
    }
    validate_session_config(&settings.session)?;
    validate_catalog_config(&settings.catalog)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(ShopAdminError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.backend == StoreBackend::Memory {
        return Ok(());
    }

    if config.url.is_empty() {
        return Err(ShopAdminError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ShopAdminError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ShopAdminError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ShopAdminError::Config(
            "Redis URL is required when sessions are stored in Redis".to_string()
        ));
    }

    Ok(())
}

fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.idle_timeout_seconds == 0 {
        return Err(ShopAdminError::Config(
            "Session idle timeout must be greater than 0".to_string()
        ));
    }

    if config.cleanup_interval_seconds == 0 {
        return Err(ShopAdminError::Config(
            "Session cleanup interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

fn validate_catalog_config(config: &super::CatalogConfig) -> Result<()> {
    if config.product_placeholder_image.is_empty() {
        return Err(ShopAdminError::Config(
            "Product placeholder image URL is required".to_string()
        ));
    }

    // Telegram rejects messages above 4096 characters
    if config.message_chunk_size == 0 || config.message_chunk_size > 4096 {
        return Err(ShopAdminError::Config(
            format!("Message chunk size must be between 1 and 4096, got {}", config.message_chunk_size)
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ShopAdminError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ShopAdminError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
