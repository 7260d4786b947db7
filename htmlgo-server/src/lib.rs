//! HTTP front for the HTML to htmlgo converter.

pub mod config;
pub mod handlers;
pub mod logging;

use axum::Router;
use axum::middleware;
use axum::routing::{get, get_service, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;

pub use config::ServerConfig;

/// Build the application router: the API routes, with the static front-end
/// as fallback.
pub fn app(config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/convert",
            post(handlers::convert).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health))
        .fallback_service(get_service(ServeDir::new(&config.static_dir)))
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(logging::log_requests))
}
