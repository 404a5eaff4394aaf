use anyhow::{anyhow, Result};
use serde::Serialize;
use std::time::Duration;
use url::{Origin, Url};
use uuid::Uuid;

use crate::app::center::NotificationCenter;
use crate::app::windows::WindowRegistry;
use crate::domain::notification::{ActiveNotification, NotificationPayload};
use crate::domain::window::AppWindow;

/// What a click did: either an existing same-origin window was steered
/// to the target, or the shell must open a new one.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ClickOutcome {
    Focused { window: AppWindow },
    OpenWindow { url: String },
}

/// Push delivery and click routing between the platform push channel
/// and the application shell.
#[derive(Clone)]
pub struct BridgeService {
    center: NotificationCenter,
    windows: WindowRegistry,
    app_origin: Url,
    origin: Origin,
    delivery_timeout: Duration,
}

impl BridgeService {
    pub fn new(
        center: NotificationCenter,
        windows: WindowRegistry,
        app_origin: Url,
        delivery_timeout: Duration,
    ) -> Self {
        let origin = app_origin.origin();
        Self {
            center,
            windows,
            app_origin,
            origin,
            delivery_timeout,
        }
    }

    /// Normalize a raw push message and display it. Normalization never
    /// fails; the whole display step is bounded by the configured
    /// delivery timeout so a stalled display cannot pin the event
    /// source forever.
    pub async fn deliver(&self, message: &[u8]) -> Result<ActiveNotification> {
        let payload = NotificationPayload::from_push_message(message);
        let shown = tokio::time::timeout(self.delivery_timeout, self.center.show(payload))
            .await
            .map_err(|_| {
                anyhow!(
                    "notification display timed out after {}ms",
                    self.delivery_timeout.as_millis()
                )
            })?;
        tracing::debug!(id = %shown.id, tag = %shown.payload.tag, "displayed notification");
        Ok(shown)
    }

    /// Dismiss the clicked notification, then route: the first
    /// registered window on the application origin is navigated to the
    /// click target and focused; with no match the shell is told to
    /// open a new window there. Returns `None` for unknown ids.
    pub async fn handle_click(&self, id: Uuid) -> Result<Option<ClickOutcome>> {
        let Some(dismissed) = self.center.dismiss(id).await else {
            return Ok(None);
        };
        let target = self
            .app_origin
            .join(dismissed.payload.click_target())
            .map_err(|err| anyhow!("unroutable click target: {}", err))?;

        let outcome = match self.windows.first_same_origin(&self.origin).await {
            Some(window) => {
                let focused = self
                    .windows
                    .navigate_and_focus(window.id, target.to_string())
                    .await
                    .ok_or_else(|| anyhow!("window closed during click routing"))?;
                tracing::debug!(notification = %id, window = %focused.id, "focused existing window");
                ClickOutcome::Focused { window: focused }
            }
            None => {
                tracing::debug!(notification = %id, url = %target, "no window on origin, opening new");
                ClickOutcome::OpenWindow {
                    url: target.to_string(),
                }
            }
        };
        Ok(Some(outcome))
    }

    /// Dismissal is an observability hook only.
    pub async fn handle_close(&self, id: Uuid) -> Option<ActiveNotification> {
        let dismissed = self.center.dismiss(id).await?;
        tracing::info!(id = %dismissed.id, tag = %dismissed.payload.tag, "notification closed");
        Some(dismissed)
    }

    /// Install a new bridge generation, promoting it immediately.
    pub async fn install(&self) -> Uuid {
        let generation = self.windows.install_generation().await;
        tracing::info!(generation = %generation, "bridge generation installed");
        generation
    }

    /// Claim all registered windows for the installed generation.
    pub async fn activate(&self) -> Option<(Uuid, usize)> {
        let (generation, claimed) = self.windows.activate_generation().await?;
        tracing::info!(generation = %generation, claimed, "bridge generation activated");
        Some((generation, claimed))
    }
}
