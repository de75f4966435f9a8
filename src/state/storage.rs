//! Session storage
//!
//! Keeps at most one conversation state per owner, either in process memory
//! or in Redis, and sweeps idle sessions in the background.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use crate::config::RedisConfig;
use crate::utils::errors::Result;
use super::context::{ConversationState, Flow};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inactivity window after which a session is dropped
    fn idle_timeout(&self) -> chrono::Duration;

    async fn get(&self, owner_id: i64) -> Result<Option<ConversationState>>;

    /// Store the state, refreshing its expiry. Replaces whatever was there.
    async fn save(&self, state: &mut ConversationState) -> Result<()>;

    /// Remove the owner's state; no-op when absent
    async fn clear(&self, owner_id: i64) -> Result<()>;

    async fn active_owners(&self) -> Result<Vec<i64>>;

    /// Drop expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> Result<u32>;

    /// Start a new flow, discarding any previous one
    async fn start(&self, owner_id: i64, flow: Flow) -> Result<ConversationState> {
        let mut state = ConversationState::new(owner_id, flow, self.idle_timeout());
        self.save(&mut state).await?;
        Ok(state)
    }

    /// Start a flow that edits the record `record_id`
    async fn start_editing(&self, owner_id: i64, flow: Flow, record_id: &str) -> Result<ConversationState> {
        let mut state = ConversationState::new(owner_id, flow, self.idle_timeout());
        state.target_record_id = Some(record_id.to_string());
        self.save(&mut state).await?;
        Ok(state)
    }
}

/// Process-local session store; sessions are lost on restart
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<i64, ConversationState>>,
    idle_timeout: chrono::Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: chrono::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn idle_timeout(&self) -> chrono::Duration {
        self.idle_timeout
    }

    async fn get(&self, owner_id: i64) -> Result<Option<ConversationState>> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&owner_id) {
                None => return Ok(None),
                Some(state) if !state.is_expired() => return Ok(Some(state.clone())),
                Some(_) => {}
            }
        }

        debug!(owner_id = owner_id, "Session expired, removing");
        self.sessions.write().await.remove(&owner_id);
        Ok(None)
    }

    async fn save(&self, state: &mut ConversationState) -> Result<()> {
        state.touch(self.idle_timeout);
        self.sessions.write().await.insert(state.owner_id, state.clone());
        Ok(())
    }

    async fn clear(&self, owner_id: i64) -> Result<()> {
        self.sessions.write().await.remove(&owner_id);
        Ok(())
    }

    async fn active_owners(&self) -> Result<Vec<i64>> {
        Ok(self.sessions.read().await.keys().copied().collect())
    }

    async fn cleanup_expired(&self) -> Result<u32> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, state| !state.is_expired());
        Ok((before - sessions.len()) as u32)
    }
}

fn session_key_prefix(prefix: &str) -> String {
    format!("{}session:", prefix)
}

/// Redis key holding an owner's session
pub fn session_key(prefix: &str, owner_id: i64) -> String {
    format!("{}{}", session_key_prefix(prefix), owner_id)
}

/// Redis-backed session store. Keys carry a TTL equal to the idle timeout.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection_manager: redis::aio::ConnectionManager,
    prefix: String,
    idle_timeout: chrono::Duration,
}

impl RedisSessionStore {
    pub async fn new(config: &RedisConfig, idle_timeout: chrono::Duration) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            prefix: config.prefix.clone(),
            idle_timeout,
        })
    }

    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn ttl_seconds(&self) -> u64 {
        self.idle_timeout.num_seconds().max(1) as u64
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    fn idle_timeout(&self) -> chrono::Duration {
        self.idle_timeout
    }

    async fn get(&self, owner_id: i64) -> Result<Option<ConversationState>> {
        let key = session_key(&self.prefix, owner_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&key).await?;
        let Some(data) = serialized else {
            return Ok(None);
        };

        let state: ConversationState = match serde_json::from_str(&data) {
            Ok(state) => state,
            Err(e) => {
                error!(owner_id = owner_id, error = %e, "Failed to deserialize session, dropping it");
                self.clear(owner_id).await?;
                return Ok(None);
            }
        };

        if state.is_expired() {
            warn!(owner_id = owner_id, expires_at = %state.expires_at, "Session has expired, removing");
            self.clear(owner_id).await?;
            return Ok(None);
        }

        Ok(Some(state))
    }

    async fn save(&self, state: &mut ConversationState) -> Result<()> {
        state.touch(self.idle_timeout);
        let key = session_key(&self.prefix, state.owner_id);
        let serialized = serde_json::to_string(state)?;
        let mut conn = self.connection_manager.clone();

        conn.set_ex::<_, _, ()>(&key, serialized, self.ttl_seconds()).await?;
        debug!(owner_id = state.owner_id, flow = state.flow.kind(), step = state.flow.step_name(),
               "Session saved to Redis");
        Ok(())
    }

    async fn clear(&self, owner_id: i64) -> Result<()> {
        let key = session_key(&self.prefix, owner_id);
        let mut conn = self.connection_manager.clone();
        let _: u32 = conn.del(&key).await?;
        Ok(())
    }

    async fn active_owners(&self) -> Result<Vec<i64>> {
        let key_prefix = session_key_prefix(&self.prefix);
        let mut conn = self.connection_manager.clone();

        let keys: Vec<String> = conn.keys(format!("{}*", key_prefix)).await?;
        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(key_prefix.as_str()))
            .filter_map(|id| id.parse::<i64>().ok())
            .collect())
    }

    async fn cleanup_expired(&self) -> Result<u32> {
        let mut cleaned = 0;
        for owner_id in self.active_owners().await? {
            let key = session_key(&self.prefix, owner_id);
            let mut conn = self.connection_manager.clone();
            let serialized: Option<String> = conn.get(&key).await?;

            let expired = serialized
                .and_then(|data| serde_json::from_str::<ConversationState>(&data).ok())
                .map(|state| state.is_expired())
                .unwrap_or(false);

            if expired {
                self.clear(owner_id).await?;
                cleaned += 1;
            }
        }
        Ok(cleaned)
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("prefix", &self.prefix)
            .field("idle_timeout", &self.idle_timeout)
            .finish_non_exhaustive()
    }
}

/// Periodically removes idle sessions from a store
pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    interval: Duration,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl SessionSweeper {
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self { store, interval, handle: None }
    }

    pub fn start(&mut self) {
        if self.handle.is_some() {
            warn!("Session sweeper is already running");
            return;
        }

        let store = Arc::clone(&self.store);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match store.cleanup_expired().await {
                    Ok(0) => {}
                    Ok(count) => info!("Session sweeper removed {} idle sessions", count),
                    Err(e) => error!("Session sweep failed: {}", e),
                }
            }
        });

        self.handle = Some(handle);
        info!("Started session sweeper with interval {:?}", self.interval);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Stopped session sweeper");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for SessionSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}
