//! Flow engine
//!
//! Ties session storage, the step dispatcher and the finalizer together.
//! Text is only treated as flow input while the owner has a session.

use std::sync::Arc;
use tracing::{debug, warn};
use crate::models::{CategoryField, Collection, PostField, ProductField, Record};
use crate::services::CatalogService;
use crate::utils::errors::Result;
use crate::utils::logging::log_flow_event;
use super::context::{ConversationState, Flow};
use super::dispatcher::{accepts_button, StepDispatcher, Transition};
use super::finalizer::RecordFinalizer;
use super::prompts::{self, Reply};
use super::storage::SessionStore;

#[derive(Clone)]
pub struct FlowEngine {
    sessions: Arc<dyn SessionStore>,
    dispatcher: StepDispatcher,
    finalizer: RecordFinalizer,
}

impl FlowEngine {
    pub fn new(sessions: Arc<dyn SessionStore>, catalog: CatalogService, placeholder_image: impl Into<String>) -> Self {
        Self {
            sessions,
            dispatcher: StepDispatcher::new(catalog.clone(), placeholder_image),
            finalizer: RecordFinalizer::new(catalog),
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Start a creation flow, replacing any flow in progress
    pub async fn start(&self, owner_id: i64, collection: Collection) -> Result<Reply> {
        let state = self.sessions.start(owner_id, Flow::new(collection)).await?;
        log_flow_event(owner_id, state.flow.kind(), state.flow.step_name(), "started");

        Ok(match collection {
            Collection::Products => prompts::product_name(),
            Collection::Categories => prompts::category_name(),
            Collection::Posts => prompts::post_title(),
        })
    }

    /// Start editing an existing record at the field choice
    pub async fn start_edit(&self, owner_id: i64, record: &Record) -> Result<Reply> {
        let state = self
            .sessions
            .start_editing(owner_id, Flow::for_record(record), &record.id)
            .await?;
        log_flow_event(owner_id, state.flow.kind(), state.flow.step_name(), "edit_started");

        Ok(field_menu(&state.flow).prefixed(&format!("✏️ Editando \"{}\"", record.label())))
    }

    /// Feed one text message to the owner's flow. `None` when no flow is active.
    pub async fn handle_text(&self, owner_id: i64, text: &str) -> Result<Option<Reply>> {
        let Some(state) = self.sessions.get(owner_id).await? else {
            debug!(owner_id = owner_id, "No active flow, ignoring text");
            return Ok(None);
        };
        self.advance(state, text).await.map(Some)
    }

    /// Feed an inline button token. Tokens the current step does not offer
    /// leave the state untouched. `None` when no flow is active.
    pub async fn handle_button(&self, owner_id: i64, token: &str) -> Result<Option<Reply>> {
        let Some(state) = self.sessions.get(owner_id).await? else {
            debug!(owner_id = owner_id, "No active flow, ignoring button");
            return Ok(None);
        };

        if !accepts_button(&state.flow, token) {
            debug!(owner_id = owner_id, step = state.flow.step_name(), token = token, "Ignoring stale flow button");
            return Ok(Some(Reply::text(prompts::INACTIVE)));
        }
        self.advance(state, token).await.map(Some)
    }

    async fn advance(&self, mut state: ConversationState, input: &str) -> Result<Reply> {
        let owner_id = state.owner_id;
        let transition = self.dispatcher.dispatch(&mut state, input).await;
        let kind = state.flow.kind();

        match transition {
            Transition::Continue(reply) => {
                log_flow_event(owner_id, kind, state.flow.step_name(), "advanced");
                self.sessions.save(&mut state).await?;
                Ok(reply)
            }
            Transition::Finish(reply) => {
                log_flow_event(owner_id, kind, state.flow.step_name(), "finished");
                self.sessions.clear(owner_id).await?;
                Ok(reply)
            }
            Transition::Finalize => match self.finalizer.finalize(&state).await {
                Ok(done) => {
                    log_flow_event(owner_id, kind, "confirm", "persisted");
                    self.sessions.clear(owner_id).await?;
                    Ok(done.reply())
                }
                Err(e) => {
                    warn!(owner_id = owner_id, flow = kind, error = %e, "Failed to persist flow, keeping session");
                    self.sessions.save(&mut state).await?;
                    Ok(prompts::summary(&state.flow).prefixed(prompts::save_failed()))
                }
            },
        }
    }

    /// Drop the owner's flow. Returns whether one was active.
    pub async fn cancel(&self, owner_id: i64) -> Result<bool> {
        let active = self.sessions.get(owner_id).await?.is_some();
        self.sessions.clear(owner_id).await?;
        if active {
            log_flow_event(owner_id, "-", "-", "cancelled");
        }
        Ok(active)
    }

    pub async fn has_active_flow(&self, owner_id: i64) -> Result<bool> {
        Ok(self.sessions.get(owner_id).await?.is_some())
    }
}

fn field_menu(flow: &Flow) -> Reply {
    let labels: Vec<&str> = match flow {
        Flow::Product { .. } => ProductField::ALL.iter().map(ProductField::label).collect(),
        Flow::Category { .. } => CategoryField::ALL.iter().map(CategoryField::label).collect(),
        Flow::Post { .. } => PostField::ALL.iter().map(PostField::label).collect(),
    };
    prompts::field_menu(&labels)
}

impl std::fmt::Debug for FlowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowEngine")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
