use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

mod auth;
mod error;
mod handlers;
mod routes;

pub use auth::{AuthUser, BridgeToken};
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state);
    Router::new()
        .merge(routes::health())
        .merge(routes::push())
        .merge(routes::notifications())
        .merge(routes::windows())
        .merge(routes::lifecycle())
        .merge(routes::layout())
        .merge(routes::prompt())
        .layer(cors)
        .with_state(state)
}

/// Only the application shell's origin may call the bridge from a
/// browser context.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = state.app_origin.origin().ascii_serialization();
    match HeaderValue::from_str(&origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                CONTENT_TYPE,
                axum::http::HeaderName::from_static("x-user-id"),
                axum::http::HeaderName::from_static("x-user-role"),
                axum::http::HeaderName::from_static("x-bridge-token"),
            ]),
        Err(err) => {
            tracing::warn!(error = ?err, "app origin unusable for CORS, allowing none");
            CorsLayer::new()
        }
    }
}
