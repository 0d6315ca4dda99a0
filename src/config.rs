//! Backend API configuration parsed from environment variables.

use reqwest::Method;

pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Build config from the environment.
    ///
    /// - `API_BASE_URL`: backend base URL, default `http://localhost:8080/api/v1`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_raw(std::env::var(API_BASE_URL_ENV).ok().as_deref())
    }

    fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_API_BASE_URL),
        }
    }

    /// Absolute URL for `endpoint`.
    #[must_use]
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// Backend endpoints reachable through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Signup,
    Login,
    Generate,
    ListChats,
    ChatDetail(i64),
}

impl Endpoint {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Signup => "/auth/signup".to_owned(),
            Self::Login => "/auth/login".to_owned(),
            Self::Generate => "/generate".to_owned(),
            Self::ListChats => "/chats".to_owned(),
            Self::ChatDetail(id) => format!("/chats/{id}"),
        }
    }

    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Signup | Self::Login | Self::Generate => Method::POST,
            Self::ListChats | Self::ChatDetail(_) => Method::GET,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
