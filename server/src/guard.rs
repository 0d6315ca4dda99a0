//! Route guard: cookie-based navigation gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs before any page is served. It reads only the auth cookie, never the
//! client's key-value store, since that store is not visible to the server.
//! The decision itself is the pure [`evaluate`]; the middleware just feeds
//! it the request path and cookie presence.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use codechat::session::AUTH_COOKIE_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    pub cookie_name: String,
    /// Login/entry page.
    pub entry_path: String,
    /// Default page for authenticated users.
    pub landing_path: String,
    /// Routes (and everything below them) that need the cookie.
    pub protected: Vec<String>,
    /// Static assets and backend-proxy prefixes skipped entirely.
    pub excluded: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cookie_name: AUTH_COOKIE_NAME.to_owned(),
            entry_path: "/".to_owned(),
            landing_path: "/chat".to_owned(),
            protected: vec!["/chat".to_owned()],
            excluded: ["/api", "/pkg", "/static", "/_next", "/favicon.ico"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// The entry page, or the `index.html` the static server maps it to.
fn is_entry(path: &str, entry: &str) -> bool {
    path == entry
        || path
            .strip_suffix("index.html")
            .filter(|dir| dir.ends_with('/'))
            .is_some_and(|dir| dir.trim_end_matches('/') == entry.trim_end_matches('/'))
}

/// Decide what to do with a navigation to `path`.
#[must_use]
pub fn evaluate(config: &GuardConfig, path: &str, has_cookie: bool) -> GuardDecision {
    if config.excluded.iter().any(|p| under(path, p)) {
        return GuardDecision::Allow;
    }
    if !has_cookie && config.protected.iter().any(|p| under(path, p)) {
        return GuardDecision::Redirect(config.entry_path.clone());
    }
    if has_cookie && is_entry(path, &config.entry_path) {
        return GuardDecision::Redirect(config.landing_path.clone());
    }
    GuardDecision::Allow
}

/// Axum middleware applying [`evaluate`] to every request.
pub async fn route_guard(
    State(config): State<Arc<GuardConfig>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let has_cookie = jar
        .get(&config.cookie_name)
        .map(Cookie::value)
        .is_some_and(|v| !v.is_empty());
    let path = request.uri().path().to_owned();

    match evaluate(&config, &path, has_cookie) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(target) => {
            tracing::debug!(%path, %target, has_cookie, "route guard redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
