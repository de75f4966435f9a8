//! Services module
//!
//! This module contains business logic services

pub mod catalog;
pub mod stats;

// Re-export commonly used services
pub use catalog::CatalogService;
pub use stats::StatsService;

use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::config::settings::Settings;
use crate::database::RecordStore;
use crate::middleware::AuthMiddleware;
use crate::state::{FlowEngine, SessionStore};

/// Service factory for creating and sharing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub catalog: CatalogService,
    pub stats: StatsService,
    pub flows: FlowEngine,
    pub auth: AuthMiddleware,
    pub message_chunk_size: usize,
    pub started_at: DateTime<Utc>,
}

impl ServiceFactory {
    /// Wire services over the chosen record and session stores
    pub fn new(settings: &Settings, records: Arc<dyn RecordStore>, sessions: Arc<dyn SessionStore>) -> Self {
        let catalog = CatalogService::new(records);
        let stats = StatsService::new(catalog.clone());
        let flows = FlowEngine::new(
            sessions,
            catalog.clone(),
            settings.catalog.product_placeholder_image.clone(),
        );
        let auth = AuthMiddleware::new(&settings.bot);

        Self {
            catalog,
            stats,
            flows,
            auth,
            message_chunk_size: settings.catalog.message_chunk_size,
            started_at: Utc::now(),
        }
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let store_reachable = self.catalog.is_reachable().await;
        let active_sessions = match self.flows.sessions().active_owners().await {
            Ok(owners) => Some(owners.len()),
            Err(e) => {
                tracing::warn!(error = %e, "Session store health check failed");
                None
            }
        };

        ServiceHealthStatus {
            store_reachable,
            active_sessions,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub store_reachable: bool,
    /// `None` when the session store could not be queried
    pub active_sessions: Option<usize>,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.store_reachable && self.active_sessions.is_some()
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.store_reachable {
            issues.push("Record store unreachable".to_string());
        }
        if self.active_sessions.is_none() {
            issues.push("Session store unreachable".to_string());
        }

        issues
    }
}
