//! HTTP API server with observability for the student directory.
//!
//! Provides REST endpoints for browsing and searching the roster, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod provider;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use directory::{EmailDomainPolicy, Preferences};
use metrics_exporter_prometheus::PrometheusHandle;
use roster::{PeopleProvider, RosterStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub store: Arc<RosterStore>,
    pub email_policy: EmailDomainPolicy,
    pub preferences: Preferences,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/people", get(routes::people::list))
        .route("/people/{id}", get(routes::people::get))
        .route("/summary", get(routes::people::summary))
        .route("/directory", get(routes::browse::get))
        .route("/directory/query", put(routes::browse::set_query))
        .route("/roster/status", get(routes::roster::status))
        .route("/roster/reload", post(routes::roster::reload))
        .route("/signup/check", post(routes::account::check_signup))
        .route("/preferences", get(routes::account::preferences))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a fresh store for `provider`.
///
/// The store starts empty; callers decide when to run the first load.
pub fn create_state(provider: impl PeopleProvider + 'static, config: &Config) -> Arc<AppState> {
    Arc::new(AppState {
        store: Arc::new(RosterStore::new(provider)),
        email_policy: EmailDomainPolicy::new(config.email_domain.as_str()),
        preferences: config.preferences,
    })
}
