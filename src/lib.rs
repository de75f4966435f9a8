//! ShopAdmin Telegram Bot
//!
//! A Telegram bot for administering a small shop's catalog.
//! This library provides modular components for record storage, step-by-step
//! create and edit flows, catalog statistics and admin access control.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ShopAdminError, Result};

// Re-export main components for easy access
pub use database::RecordStore;
pub use services::ServiceFactory;
pub use state::{FlowEngine, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
