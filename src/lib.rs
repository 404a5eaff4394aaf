pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;
pub mod jobs;

use std::time::Duration;
use url::Url;

use crate::app::bridge::BridgeService;
use crate::app::center::NotificationCenter;
use crate::app::layout::LayoutService;
use crate::app::prompt::InstallPromptStore;
use crate::app::windows::WindowRegistry;
use crate::infra::store::LayoutStore;

#[derive(Clone)]
pub struct AppState {
    pub bridge: BridgeService,
    pub layouts: LayoutService,
    pub center: NotificationCenter,
    pub windows: WindowRegistry,
    pub prompts: InstallPromptStore,
    pub store: LayoutStore,
    pub app_origin: Url,
    pub bridge_token: Option<String>,
}

impl AppState {
    /// Wire the shared components: the bridge and the HTTP surface
    /// must see the same notification center and window registry.
    pub fn new(
        store: LayoutStore,
        app_origin: Url,
        delivery_timeout: Duration,
        bridge_token: Option<String>,
    ) -> Self {
        let center = NotificationCenter::new();
        let windows = WindowRegistry::new();
        let bridge = BridgeService::new(
            center.clone(),
            windows.clone(),
            app_origin.clone(),
            delivery_timeout,
        );
        let layouts = LayoutService::new(store.clone());
        Self {
            bridge,
            layouts,
            center,
            windows,
            prompts: InstallPromptStore::new(),
            store,
            app_origin,
            bridge_token,
        }
    }
}
