//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod record;
pub mod product;
pub mod category;
pub mod post;

// Re-export commonly used models
pub use record::{Collection, Record, RecordFields, price_value};
pub use product::{ProductDraft, ProductField};
pub use category::{CategoryDraft, CategoryField};
pub use post::{PostDraft, PostField};
