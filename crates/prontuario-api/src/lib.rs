//! # prontuario-api — Axum API for the Sanctions Catalog
//!
//! ## API Surface
//!
//! | Prefix              | Module                  | Domain |
//! |---------------------|-------------------------|--------|
//! | `/v1/sanzioni/*`    | [`routes::sanzioni`]    | Catalog browsing and CRUD |
//! | `/v1/categorie/*`   | [`routes::categorie`]   | Category table, classifier |
//! | `/health/*`         | this module             | Kubernetes probes |
//! | `/openapi.json`     | [`openapi`]             | Generated OpenAPI 3.1 doc  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsLayer → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - Top of the dependency DAG.
//! - No business logic in route handlers: filtering, sorting and
//!   classification live in `prontuario-core`, persistence in
//!   `prontuario-store`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::sanzioni::router())
        .merge(routes::categorie::router())
        .merge(openapi::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api).with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready" once a snapshot has loaded and the last
/// reload succeeded, otherwise 503 with the reason.
async fn readiness(State(state): State<AppState>) -> Response {
    if let Some(error) = state.catalog.last_error() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("catalog reload failed: {error}"),
        )
            .into_response();
    }
    if !state.catalog.is_loaded() {
        return (StatusCode::SERVICE_UNAVAILABLE, "catalog not loaded").into_response();
    }
    "ready".into_response()
}
