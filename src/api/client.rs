//! `reqwest`-backed gateway. Pure header merging and body interpretation
//! live in free functions for testability.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::ApiGateway;
use super::types::{ApiError, NETWORK_ERROR_MESSAGE, RequestOptions};
use crate::config::{ApiConfig, Endpoint};

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn send(&self, endpoint: Endpoint, options: RequestOptions) -> Result<Value, ApiError> {
        let url = self.config.url(&endpoint);
        let method = endpoint.method();
        let headers = merge_headers(&options.headers)?;

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            request = request.body(bytes);
        }

        tracing::debug!(%method, %url, "api request");
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, %url, "api request failed");
            ApiError::Network(NETWORK_ERROR_MESSAGE.to_owned())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(error = %e, %url, "api response body read failed");
            ApiError::Network(NETWORK_ERROR_MESSAGE.to_owned())
        })?;

        interpret_response(status, &text)
    }
}

#[async_trait::async_trait]
impl ApiGateway for ApiClient {
    async fn request(&self, endpoint: Endpoint, options: RequestOptions) -> Result<Value, ApiError> {
        self.send(endpoint, options).await
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Default `Content-Type: application/json`, overridden by caller headers.
pub(crate) fn merge_headers(extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// The body is parsed as JSON regardless of status; only success bodies
/// must actually be JSON.
pub(crate) fn interpret_response(status: StatusCode, text: &str) -> Result<Value, ApiError> {
    let parsed = serde_json::from_str::<Value>(text);
    if !status.is_success() {
        let err = ApiError::from_error_body(status.as_u16(), parsed.ok().as_ref());
        tracing::warn!(status = status.as_u16(), message = %err.message(), "api returned error status");
        return Err(err);
    }
    parsed.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
