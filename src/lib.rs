//! Session and API layer for the codechat code-generation client.
//!
//! ARCHITECTURE
//! ============
//! Front ends drive [`auth::AuthService`], which issues backend calls through
//! an [`api::ApiGateway`] and records credentials in a [`session::SessionStore`].
//! The store persists to two places (a key-value store and a cookie jar) so
//! page guards can read auth state without touching the key-value store.

pub mod api;
pub mod auth;
pub mod config;
pub mod session;
pub mod types;
