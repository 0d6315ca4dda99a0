//! Session store: auth token and cached user profile.
//!
//! DESIGN
//! ======
//! One `SessionStore` is built per application instance and shared by `Arc`.
//! It persists the token to two places: the key-value store (read by the
//! client) and the auth cookie (read by the page server's route guard).
//!
//! ERROR HANDLING
//! ==============
//! Backend failures are logged and swallowed so callers degrade to
//! "not authenticated". A failed `save` rolls every location back, keeping
//! the key-value token and the cookie in agreement.

pub mod cookie;
pub mod storage;

use crate::types::UserProfile;

use cookie::{CookieStore, MemoryCookieJar, auth_cookie, expired_cookie};
use storage::{KeyValueStore, MemoryStorage, StorageError};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user_data";
pub const AUTH_COOKIE_NAME: &str = "auth_token";

pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    cookies: Box<dyn CookieStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: impl KeyValueStore + 'static, cookies: impl CookieStore + 'static) -> Self {
        Self { storage: Box::new(storage), cookies: Box::new(cookies) }
    }

    /// Store backed entirely by memory; nothing outlives the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), MemoryCookieJar::new())
    }

    /// Persist `token` and `user` to the key-value store and the auth cookie.
    pub fn save(&self, token: &str, user: &UserProfile) {
        match self.try_save(token, user) {
            Ok(()) => tracing::info!(user_id = user.id, "session saved"),
            Err(e) => {
                tracing::error!(error = %e, "failed to save auth data");
                if let Err(e) = self.try_clear() {
                    tracing::error!(error = %e, "failed to roll back partial session save");
                }
            }
        }
    }

    fn try_save(&self, token: &str, user: &UserProfile) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, &user_json)?;
        self.cookies.set(auth_cookie(AUTH_COOKIE_NAME, token))?;
        Ok(())
    }

    /// Stored token, or `None` when absent, empty, or unreadable.
    #[must_use]
    pub fn get_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::error!(error = %e, "failed to get token");
                None
            }
        }
    }

    /// Cached profile, or `None` when absent, malformed, or unreadable.
    #[must_use]
    pub fn get_user(&self) -> Option<UserProfile> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!(error = %e, "failed to get user data");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "stored user data is malformed");
                None
            }
        }
    }

    /// Token as carried by the auth cookie.
    #[must_use]
    pub fn cookie_token(&self) -> Option<String> {
        match self.cookies.get(AUTH_COOKIE_NAME) {
            Ok(cookie) => cookie
                .map(|c| c.value().to_owned())
                .filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::error!(error = %e, "failed to read auth cookie");
                None
            }
        }
    }

    /// Remove the token and profile and expire the auth cookie.
    pub fn clear(&self) {
        match self.try_clear() {
            Ok(()) => tracing::info!("session cleared"),
            Err(e) => tracing::error!(error = %e, "failed to clear auth data"),
        }
    }

    /// Attempts every removal even when an earlier one fails.
    fn try_clear(&self) -> Result<(), StorageError> {
        let results = [
            self.storage.remove(TOKEN_KEY),
            self.storage.remove(USER_KEY),
            self.cookies.set(expired_cookie(AUTH_COOKIE_NAME)),
        ];
        results.into_iter().collect()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
