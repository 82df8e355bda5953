//! Keyword Registry
//!
//! REST backend for channel keyword records with SQLite persistence, plus
//! the paging client that drives it.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;
use middleware::RateLimiter;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limiter = RateLimiter::new(
        state.config.rate_limit_max,
        state.config.rate_limit_window,
    )
    .trust_proxy(state.config.trust_proxy);

    // API routes
    let api_routes = Router::new()
        .route(
            "/keywords",
            get(api::list_keywords)
                .post(api::create_keywords)
                .delete(api::delete_keyword)
                .fallback(api::method_not_allowed),
        )
        .layer(from_fn(move |req, next| {
            middleware::rate_limit_layer(limiter.clone(), req, next)
        }));

    // Health check (not rate limited)
    let health_routes = Router::new().route("/health", get(health_check));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .with_state(state);

    for layer in middleware::security_header_layers() {
        router = router.layer(layer);
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
