//! Logging middleware
//!
//! Structured logs for incoming messages and callback queries.

use std::time::Instant;
use teloxide::types::{CallbackQuery, ChatKind, Message};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    log_text: bool,
}

impl LoggingMiddleware {
    /// `log_text` includes message bodies at debug level
    pub fn new(log_text: bool) -> Self {
        Self { log_text }
    }

    pub fn log_message(&self, message: &Message) {
        let user_id = message.from.as_ref().map(|u| u.id.0);
        let chat_type = match message.chat.kind {
            ChatKind::Private(_) => "private",
            ChatKind::Public(_) => "public",
        };

        info!(
            user_id = user_id,
            chat_id = message.chat.id.0,
            chat_type = chat_type,
            message_id = message.id.0,
            "Message received"
        );

        if self.log_text {
            if let Some(text) = message.text() {
                debug!(user_id = user_id, text = %text, "Message text");
            }
        }
    }

    pub fn log_callback(&self, query: &CallbackQuery) {
        info!(
            user_id = query.from.id.0,
            callback_data = query.data.as_deref().unwrap_or("none"),
            "Callback query received"
        );
    }

    /// Start timing a handler
    pub fn start_timer(&self, operation: &str) -> HandlerTimer {
        HandlerTimer {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(false)
    }
}

const SLOW_HANDLER_MS: u128 = 2000;

/// Logs the elapsed time of a handler when dropped
#[derive(Debug)]
pub struct HandlerTimer {
    operation: String,
    start: Instant,
}

impl Drop for HandlerTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed().as_millis();
        if elapsed >= SLOW_HANDLER_MS {
            warn!(operation = %self.operation, duration_ms = elapsed as u64, "Slow handler");
        } else {
            debug!(operation = %self.operation, duration_ms = elapsed as u64, "Handler completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_drops_cleanly() {
        let middleware = LoggingMiddleware::default();
        let timer = middleware.start_timer("test");
        assert_eq!(timer.operation, "test");
        drop(timer);
    }
}
