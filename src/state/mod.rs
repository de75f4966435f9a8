//! State management module
//!
//! This module handles per-owner conversation flows: the state model, its
//! storage, step dispatching and persisting confirmed drafts.

pub mod context;
pub mod dispatcher;
pub mod engine;
pub mod finalizer;
pub mod prompts;
pub mod storage;

// Re-export commonly used state components
pub use context::{CategoryStep, ConversationState, Flow, PostStep, ProductStep};
pub use dispatcher::{StepDispatcher, Transition};
pub use engine::FlowEngine;
pub use finalizer::{Finalized, RecordFinalizer};
pub use prompts::{Reply, ReplyButton};
pub use storage::{InMemorySessionStore, RedisSessionStore, SessionStore, SessionSweeper};
