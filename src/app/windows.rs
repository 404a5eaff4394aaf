use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use url::Origin;
use uuid::Uuid;

use crate::domain::window::AppWindow;

#[derive(Default)]
struct RegistryInner {
    windows: Vec<AppWindow>,
    /// Most recently installed bridge generation (forced promotion:
    /// installing replaces this immediately).
    active_generation: Option<Uuid>,
    /// Generation that has claimed the open windows; new registrations
    /// are claimed by it directly.
    controlling_generation: Option<Uuid>,
}

/// Every open application window/tab the shell has told the bridge
/// about, in registration order. Enumeration includes windows no
/// generation has claimed yet.
#[derive(Clone, Default)]
pub struct WindowRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, url: String, focused: bool) -> AppWindow {
        let mut inner = self.inner.write().await;
        if focused {
            for window in &mut inner.windows {
                window.focused = false;
            }
        }
        let window = AppWindow {
            id: Uuid::new_v4(),
            url,
            focused,
            controlled_by: inner.controlling_generation,
            registered_at: OffsetDateTime::now_utc(),
        };
        inner.windows.push(window.clone());
        window
    }

    pub async fn list(&self) -> Vec<AppWindow> {
        self.inner.read().await.windows.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<AppWindow> {
        self.inner
            .read()
            .await
            .windows
            .iter()
            .find(|window| window.id == id)
            .cloned()
    }

    pub async fn unregister(&self, id: Uuid) -> Option<AppWindow> {
        let mut inner = self.inner.write().await;
        let position = inner.windows.iter().position(|window| window.id == id)?;
        Some(inner.windows.remove(position))
    }

    /// Focus one window, unfocusing the rest.
    pub async fn focus(&self, id: Uuid) -> Option<AppWindow> {
        let mut inner = self.inner.write().await;
        inner.windows.iter().position(|window| window.id == id)?;
        let mut focused = None;
        for window in &mut inner.windows {
            window.focused = window.id == id;
            if window.focused {
                focused = Some(window.clone());
            }
        }
        focused
    }

    /// Point a window at a new URL and focus it, as click routing does.
    pub async fn navigate_and_focus(&self, id: Uuid, url: String) -> Option<AppWindow> {
        let mut inner = self.inner.write().await;
        inner.windows.iter().position(|window| window.id == id)?;
        let mut navigated = None;
        for window in &mut inner.windows {
            if window.id == id {
                window.url = url.clone();
                window.focused = true;
                navigated = Some(window.clone());
            } else {
                window.focused = false;
            }
        }
        navigated
    }

    /// First registered window on the given origin, if any.
    pub async fn first_same_origin(&self, origin: &Origin) -> Option<AppWindow> {
        self.inner
            .read()
            .await
            .windows
            .iter()
            .find(|window| window.same_origin(origin))
            .cloned()
    }

    /// Install a new bridge generation. The newcomer is promoted
    /// immediately instead of waiting for the old generation to drain.
    pub async fn install_generation(&self) -> Uuid {
        let generation = Uuid::new_v4();
        let mut inner = self.inner.write().await;
        inner.active_generation = Some(generation);
        generation
    }

    /// Claim every registered window for the active generation. Later
    /// registrations are claimed as they arrive. Returns the claiming
    /// generation and how many windows it took over, or `None` when no
    /// generation has been installed.
    pub async fn activate_generation(&self) -> Option<(Uuid, usize)> {
        let mut inner = self.inner.write().await;
        let generation = inner.active_generation?;
        inner.controlling_generation = Some(generation);
        for window in &mut inner.windows {
            window.controlled_by = Some(generation);
        }
        Some((generation, inner.windows.len()))
    }
}
