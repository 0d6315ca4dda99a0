//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Serves the static front-end bundle with every request passing through the
//! route guard first. `/healthz` is unguarded in effect since it is neither
//! protected nor the entry page.

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::guard::{self, GuardConfig};

/// Page server: static site behind the route guard, plus a health check.
pub fn app(config: &ServerConfig, guard_config: GuardConfig) -> Router {
    let site = ServeDir::new(&config.website_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(site)
        .layer(middleware::from_fn_with_state(Arc::new(guard_config), guard::route_guard))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
