//! Axum router configuration with middleware.
//!
//! - `/<prefix>/{execution_id}[/{suffix}]`: waiting webhooks, every method
//! - `/api/v1/...`: JSON API with fallback-mode CORS
//! - `/health`
//!
//! Every request is traced with `TraceLayer`.

use axum::middleware;
use axum::routing::{any, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::{cors, handlers};
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let prefix = state.waiting_webhooks.prefix().to_string();

    let api_routes = Router::new()
        .route(
            "/workflows/{id}/activate",
            post(handlers::workflow::activate_workflow),
        )
        .route(
            "/workflows/{id}/deactivate",
            post(handlers::workflow::deactivate_workflow),
        )
        .route(
            "/workflows/{id}/test-run",
            post(handlers::workflow::test_run_workflow),
        )
        .layer(middleware::from_fn(cors::fallback_cors));

    Router::new()
        .route(
            &format!("/{prefix}/{{execution_id}}"),
            any(handlers::waiting::handle_waiting_webhook),
        )
        .route(
            &format!("/{prefix}/{{execution_id}}/{{suffix}}"),
            any(handlers::waiting::handle_waiting_webhook),
        )
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
