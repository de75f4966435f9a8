//! Database module
//!
//! This module handles record persistence: the store contract and its
//! Postgres and in-memory implementations.

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;
pub use store::RecordStore;
