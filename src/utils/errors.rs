//! Error handling for ShopAdmin
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for ShopAdmin application
#[derive(Error, Debug)]
pub enum ShopAdminError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Record not found: {collection}/{id}")]
    RecordNotFound { collection: String, id: String },

    #[error("Write error in {collection}: {reason}")]
    WriteFailed { collection: String, reason: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for ShopAdmin operations
pub type Result<T> = std::result::Result<T, ShopAdminError>;

impl ShopAdminError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ShopAdminError::Database(_) => true,
            ShopAdminError::Migration(_) => false,
            ShopAdminError::Telegram(_) => true,
            ShopAdminError::Config(_) => false,
            ShopAdminError::ConfigLoad(_) => false,
            ShopAdminError::PermissionDenied(_) => false,
            ShopAdminError::RecordNotFound { .. } => false,
            ShopAdminError::WriteFailed { .. } => true,
            ShopAdminError::InvalidStateTransition { .. } => false,
            ShopAdminError::Redis(_) => true,
            ShopAdminError::Serialization(_) => false,
            ShopAdminError::Io(_) => true,
            ShopAdminError::InvalidInput(_) => false,
            ShopAdminError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ShopAdminError::Migration(_) => ErrorSeverity::Critical,
            ShopAdminError::Config(_) => ErrorSeverity::Critical,
            ShopAdminError::ConfigLoad(_) => ErrorSeverity::Critical,
            ShopAdminError::PermissionDenied(_) => ErrorSeverity::Warning,
            ShopAdminError::RecordNotFound { .. } => ErrorSeverity::Warning,
            ShopAdminError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_is_recoverable() {
        let err = ShopAdminError::WriteFailed {
            collection: "productos".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.to_string(), "Write error in productos: timeout");
    }

    #[test]
    fn test_missing_record_severity() {
        let err = ShopAdminError::RecordNotFound {
            collection: "categorias".to_string(),
            id: "abc".to_string(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }
}
