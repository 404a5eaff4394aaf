use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use crate::app::bridge::ClickOutcome;
use crate::app::layout::LayoutConflict;
use crate::app::prompt::DeferredInstallPrompt;
use crate::domain::notification::ActiveNotification;
use crate::domain::widget::{DashboardLayout, MoveDirection, WidgetConfig};
use crate::domain::window::AppWindow;
use crate::http::{AppError, AuthUser, BridgeToken};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.ping().await.is_ok();
    let status = if store { "ok" } else { "degraded" };

    Json(HealthResponse { status })
}

/// Push ingest: the raw message body is normalized and displayed; the
/// response is the rendered notification.
pub async fn ingest_push(
    State(state): State<AppState>,
    _token: BridgeToken,
    body: Bytes,
) -> Result<Json<ActiveNotification>, AppError> {
    let shown = state.bridge.deliver(&body).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to deliver push message");
        AppError::internal("failed to deliver push message")
    })?;
    Ok(Json(shown))
}

pub async fn list_notifications(
    State(state): State<AppState>,
) -> Json<ListResponse<ActiveNotification>> {
    Json(ListResponse {
        items: state.center.active().await,
    })
}

pub async fn click_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClickOutcome>, AppError> {
    let outcome = state.bridge.handle_click(id).await.map_err(|err| {
        tracing::error!(error = ?err, notification = %id, "failed to route notification click");
        AppError::internal("failed to route notification click")
    })?;

    outcome
        .map(Json)
        .ok_or_else(|| AppError::not_found("notification not found"))
}

pub async fn close_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActiveNotification>, AppError> {
    state
        .bridge
        .handle_close(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("notification not found"))
}

#[derive(Deserialize)]
pub struct RegisterWindowRequest {
    pub url: String,
    #[serde(default)]
    pub focused: bool,
}

pub async fn list_windows(State(state): State<AppState>) -> Json<ListResponse<AppWindow>> {
    Json(ListResponse {
        items: state.windows.list().await,
    })
}

pub async fn register_window(
    State(state): State<AppState>,
    Json(payload): Json<RegisterWindowRequest>,
) -> Result<Json<AppWindow>, AppError> {
    Url::parse(&payload.url).map_err(|_| AppError::bad_request("invalid window url"))?;
    let window = state.windows.register(payload.url, payload.focused).await;
    Ok(Json(window))
}

pub async fn unregister_window(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .windows
        .unregister(id)
        .await
        .ok_or_else(|| AppError::not_found("window not found"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn focus_window(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppWindow>, AppError> {
    state
        .windows
        .focus(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("window not found"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleResponse {
    pub generation: Uuid,
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_windows: Option<usize>,
}

pub async fn install_bridge(State(state): State<AppState>) -> Json<LifecycleResponse> {
    let generation = state.bridge.install().await;
    Json(LifecycleResponse {
        generation,
        phase: "installed",
        claimed_windows: None,
    })
}

pub async fn activate_bridge(
    State(state): State<AppState>,
) -> Result<Json<LifecycleResponse>, AppError> {
    let (generation, claimed) = state
        .bridge
        .activate()
        .await
        .ok_or_else(|| AppError::conflict("no bridge generation installed"))?;
    Ok(Json(LifecycleResponse {
        generation,
        phase: "activated",
        claimed_windows: Some(claimed),
    }))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LayoutWriteRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expected_last_modified: Option<OffsetDateTime>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveWidgetRequest {
    pub direction: MoveDirection,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expected_last_modified: Option<OffsetDateTime>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub from_index: usize,
    pub to_index: usize,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expected_last_modified: Option<OffsetDateTime>,
}

fn map_layout_error(err: anyhow::Error) -> AppError {
    if err.downcast_ref::<LayoutConflict>().is_some() {
        return AppError::conflict("dashboard layout was changed by another session");
    }
    tracing::error!(error = ?err, "layout mutation failed");
    AppError::internal("failed to update layout")
}

pub async fn get_layout(State(state): State<AppState>, user: AuthUser) -> Json<DashboardLayout> {
    Json(state.layouts.load(&user.identity).await)
}

pub async fn get_visible_widgets(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<ListResponse<WidgetConfig>> {
    Json(ListResponse {
        items: state.layouts.visible(&user.identity).await,
    })
}

/// Widget mutations answer with the full updated layout; an unknown
/// widget id leaves it unchanged.
pub async fn toggle_widget(
    State(state): State<AppState>,
    user: AuthUser,
    Path(widget_id): Path<String>,
    Json(payload): Json<LayoutWriteRequest>,
) -> Result<Json<DashboardLayout>, AppError> {
    state
        .layouts
        .toggle(&user.identity, &widget_id, payload.expected_last_modified)
        .await
        .map(Json)
        .map_err(map_layout_error)
}

pub async fn move_widget(
    State(state): State<AppState>,
    user: AuthUser,
    Path(widget_id): Path<String>,
    Json(payload): Json<MoveWidgetRequest>,
) -> Result<Json<DashboardLayout>, AppError> {
    state
        .layouts
        .move_widget(
            &user.identity,
            &widget_id,
            payload.direction,
            payload.expected_last_modified,
        )
        .await
        .map(Json)
        .map_err(map_layout_error)
}

pub async fn reorder_widgets(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<DashboardLayout>, AppError> {
    state
        .layouts
        .reorder(
            &user.identity,
            payload.from_index,
            payload.to_index,
            payload.expected_last_modified,
        )
        .await
        .map(Json)
        .map_err(map_layout_error)
}

pub async fn reset_layout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<LayoutWriteRequest>,
) -> Result<Json<DashboardLayout>, AppError> {
    state
        .layouts
        .reset(&user.identity, payload.expected_last_modified)
        .await
        .map(Json)
        .map_err(map_layout_error)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragStartRequest {
    pub widget_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragOverRequest {
    pub target_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragOverResponse {
    pub dragging: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<DashboardLayout>,
}

pub async fn drag_start(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DragStartRequest>,
) -> StatusCode {
    state
        .layouts
        .drag_start(&user.identity, payload.widget_id)
        .await;
    StatusCode::NO_CONTENT
}

/// Dragging over a widget reorders the dragged one into its slot. With
/// no drag in flight the call is ignored.
pub async fn drag_over(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DragOverRequest>,
) -> Result<Json<DragOverResponse>, AppError> {
    let layout = state
        .layouts
        .drag_over(&user.identity, &payload.target_id)
        .await
        .map_err(map_layout_error)?;
    Ok(Json(DragOverResponse {
        dragging: layout.is_some(),
        layout,
    }))
}

pub async fn drag_end(State(state): State<AppState>, user: AuthUser) -> StatusCode {
    state.layouts.drag_end(&user.identity).await;
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
pub struct SetPromptRequest {
    #[serde(default)]
    pub platforms: Vec<String>,
}

pub async fn set_install_prompt(
    State(state): State<AppState>,
    Json(payload): Json<SetPromptRequest>,
) -> Json<DeferredInstallPrompt> {
    let prompt = DeferredInstallPrompt {
        platforms: payload.platforms,
        captured_at: OffsetDateTime::now_utc(),
    };
    state.prompts.set(prompt.clone()).await;
    Json(prompt)
}

pub async fn get_install_prompt(
    State(state): State<AppState>,
) -> Result<Json<DeferredInstallPrompt>, AppError> {
    state
        .prompts
        .peek()
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("no deferred install prompt"))
}

pub async fn consume_install_prompt(
    State(state): State<AppState>,
) -> Result<Json<DeferredInstallPrompt>, AppError> {
    state
        .prompts
        .consume()
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("no deferred install prompt"))
}

pub async fn clear_install_prompt(State(state): State<AppState>) -> StatusCode {
    state.prompts.clear().await;
    StatusCode::NO_CONTENT
}
