//! Authentication middleware
//!
//! Restricts the bot to the configured admin allow-list.

use std::collections::HashSet;
use teloxide::types::User;
use tracing::{debug, warn};
use crate::config::BotConfig;
use crate::utils::errors::{ShopAdminError, Result};
use crate::utils::logging::log_access_denied;

/// Admin allow-list check. An empty list lets everyone in.
#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    admin_ids: HashSet<i64>,
}

impl AuthMiddleware {
    pub fn new(config: &BotConfig) -> Self {
        let admin_ids: HashSet<i64> = config.admin_ids.iter().copied().collect();
        if admin_ids.is_empty() {
            warn!("No admin ids configured, every user is allowed to manage the catalog");
        }

        Self { admin_ids }
    }

    /// True when no allow-list is configured
    pub fn is_open(&self) -> bool {
        self.admin_ids.is_empty()
    }

    pub fn is_authorized(&self, user_id: i64) -> bool {
        self.is_open() || self.admin_ids.contains(&user_id)
    }

    /// Check a Telegram user against the allow-list
    pub fn check_user(&self, user: &User) -> Result<()> {
        let user_id = user.id.0 as i64;

        if self.is_authorized(user_id) {
            debug!(user_id = user_id, "Admin authentication successful");
            Ok(())
        } else {
            log_access_denied(user_id, user.username.as_deref());
            Err(ShopAdminError::PermissionDenied(
                "User is not in the admin list".to_string()
            ))
        }
    }

    pub fn admin_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.admin_ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::{UserId, User as TgUser};

    fn create_test_user(id: u64) -> TgUser {
        TgUser {
            id: UserId(id),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    fn config(admin_ids: Vec<i64>) -> BotConfig {
        BotConfig {
            token: "token".to_string(),
            admin_ids,
        }
    }

    #[test]
    fn test_allow_list() {
        let auth = AuthMiddleware::new(&config(vec![123, 456]));

        assert!(auth.is_authorized(123));
        assert!(auth.is_authorized(456));
        assert!(!auth.is_authorized(789));
        assert_eq!(auth.admin_ids(), vec![123, 456]);
    }

    #[test]
    fn test_empty_list_allows_everyone() {
        let auth = AuthMiddleware::new(&config(vec![]));
        assert!(auth.is_open());
        assert!(auth.is_authorized(1));
    }

    #[test]
    fn test_check_user() {
        let auth = AuthMiddleware::new(&config(vec![123]));

        assert!(auth.check_user(&create_test_user(123)).is_ok());
        assert!(matches!(
            auth.check_user(&create_test_user(456)),
            Err(ShopAdminError::PermissionDenied(_))
        ));
    }
}
