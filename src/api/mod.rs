//! API gateway: thin JSON-over-HTTP wrapper around the backend.
//!
//! DESIGN
//! ======
//! `ApiGateway` is the seam the auth orchestrator talks through; `ApiClient`
//! is the `reqwest` implementation. Every call is a single attempt with no
//! retries and no timeout beyond the transport default.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{ApiError, RequestOptions};

use serde_json::Value;

use crate::config::Endpoint;

/// Issues one backend request. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ApiGateway: Send + Sync {
    /// Send `options` to `endpoint` and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on non-success status, on network failure, or
    /// when a success body is not JSON.
    async fn request(&self, endpoint: Endpoint, options: RequestOptions) -> Result<Value, ApiError>;
}
