use axum::{routing::delete, routing::get, routing::post, routing::put, Router};
use tower_http::limit::RequestBodyLimitLayer;

use crate::http::handlers;
use crate::AppState;

/// Push payloads are small by contract; anything larger is a
/// misbehaving dispatcher.
const PUSH_BODY_LIMIT_BYTES: usize = 16 * 1024;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn push() -> Router<AppState> {
    Router::new()
        .route("/push", post(handlers::ingest_push))
        .layer(RequestBodyLimitLayer::new(PUSH_BODY_LIMIT_BYTES))
}

pub fn notifications() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/:id/click",
            post(handlers::click_notification),
        )
        .route(
            "/notifications/:id/close",
            post(handlers::close_notification),
        )
}

pub fn windows() -> Router<AppState> {
    Router::new()
        .route("/windows", get(handlers::list_windows))
        .route("/windows", post(handlers::register_window))
        .route("/windows/:id", delete(handlers::unregister_window))
        .route("/windows/:id/focus", post(handlers::focus_window))
}

pub fn lifecycle() -> Router<AppState> {
    Router::new()
        .route("/lifecycle/install", post(handlers::install_bridge))
        .route("/lifecycle/activate", post(handlers::activate_bridge))
}

pub fn layout() -> Router<AppState> {
    Router::new()
        .route("/layout", get(handlers::get_layout))
        .route("/layout/visible", get(handlers::get_visible_widgets))
        .route(
            "/layout/widgets/:id/toggle",
            post(handlers::toggle_widget),
        )
        .route("/layout/widgets/:id/move", post(handlers::move_widget))
        .route("/layout/reorder", post(handlers::reorder_widgets))
        .route("/layout/reset", post(handlers::reset_layout))
        .route("/layout/drag/start", post(handlers::drag_start))
        .route("/layout/drag/over", post(handlers::drag_over))
        .route("/layout/drag/end", post(handlers::drag_end))
}

pub fn prompt() -> Router<AppState> {
    Router::new()
        .route("/install-prompt", put(handlers::set_install_prompt))
        .route("/install-prompt", get(handlers::get_install_prompt))
        .route("/install-prompt", delete(handlers::clear_install_prompt))
        .route(
            "/install-prompt/consume",
            post(handlers::consume_install_prompt),
        )
}
