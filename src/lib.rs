use axum::Router;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod recaptcha;
pub mod sanitize;
pub mod sheets;
pub mod state;
pub mod telegram;
pub mod templates;

use state::AppState;

// Router shared by the binary and the integration tests. The CORS layer
// answers the landing page's OPTIONS preflight; other methods on the
// routes get a 405 from the router itself.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/register", post(handlers::register_handler))
        .route("/api/telegram-webhook", post(handlers::webhook_handler))
        .layer(cors)
        .with_state(state)
}
