use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};

use crate::domain::identity::Identity;
use crate::domain::widget::{DashboardLayout, DragState, MoveDirection, WidgetConfig};
use crate::infra::store::LayoutStore;

/// Rejection raised when a mutation carries a `lastModified` value
/// that no longer matches the stored layout (another tab wrote first).
#[derive(Debug)]
pub struct LayoutConflict {
    pub stored: OffsetDateTime,
}

impl fmt::Display for LayoutConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout was modified at {}", self.stored)
    }
}

impl std::error::Error for LayoutConflict {}

#[derive(Clone, Default)]
struct IdentityLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl IdentityLocks {
    async fn acquire(&self, key: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Per-identity dashboard arrangement: load with lazy defaulting,
/// mutations that persist on change, and the drag gesture session.
///
/// Mutations for one identity are serialized through a per-key lock so
/// two tabs cannot interleave a read-modify-write.
#[derive(Clone)]
pub struct LayoutService {
    store: LayoutStore,
    locks: IdentityLocks,
    drags: Arc<RwLock<HashMap<Identity, DragState>>>,
}

impl LayoutService {
    pub fn new(store: LayoutStore) -> Self {
        Self {
            store,
            locks: IdentityLocks::default(),
            drags: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Current layout for this identity. Absent, unreadable, or
    /// corrupt storage falls back to the default set; loading never
    /// fails and never writes.
    pub async fn load(&self, identity: &Identity) -> DashboardLayout {
        self.read_current(identity).await.0
    }

    pub async fn visible(&self, identity: &Identity) -> Vec<WidgetConfig> {
        self.load(identity).await.visible_widgets()
    }

    pub async fn toggle(
        &self,
        identity: &Identity,
        widget_id: &str,
        expected: Option<OffsetDateTime>,
    ) -> Result<DashboardLayout> {
        self.mutate(identity, expected, |layout| layout.toggle(widget_id))
            .await
    }

    pub async fn move_widget(
        &self,
        identity: &Identity,
        widget_id: &str,
        direction: MoveDirection,
        expected: Option<OffsetDateTime>,
    ) -> Result<DashboardLayout> {
        self.mutate(identity, expected, |layout| {
            layout.move_widget(widget_id, direction)
        })
        .await
    }

    pub async fn reorder(
        &self,
        identity: &Identity,
        from: usize,
        to: usize,
        expected: Option<OffsetDateTime>,
    ) -> Result<DashboardLayout> {
        self.mutate(identity, expected, |layout| layout.reorder(from, to))
            .await
    }

    /// Replace the layout with the default set, discarding any
    /// customization, and persist immediately.
    pub async fn reset(
        &self,
        identity: &Identity,
        expected: Option<OffsetDateTime>,
    ) -> Result<DashboardLayout> {
        self.mutate(identity, expected, |layout| {
            *layout = DashboardLayout::default_set(layout.last_modified);
            true
        })
        .await
    }

    /// Begin a drag gesture. Any gesture already in flight for this
    /// identity is superseded.
    pub async fn drag_start(&self, identity: &Identity, widget_id: String) {
        self.drags.write().await.insert(
            identity.clone(),
            DragState::Dragging {
                source_id: widget_id,
            },
        );
    }

    /// Dragging over a widget reorders the dragged one to its slot and
    /// stays in the gesture. Returns `None` when no gesture is active;
    /// ids that do not resolve leave the layout unchanged.
    pub async fn drag_over(
        &self,
        identity: &Identity,
        target_id: &str,
    ) -> Result<Option<DashboardLayout>> {
        let source_id = match self.drags.read().await.get(identity) {
            Some(DragState::Dragging { source_id }) => source_id.clone(),
            _ => return Ok(None),
        };
        if source_id == target_id {
            return Ok(None);
        }
        let layout = self
            .mutate(identity, None, |layout| {
                let Some(from) = layout.position_of(&source_id) else {
                    return false;
                };
                let Some(to) = layout.position_of(target_id) else {
                    return false;
                };
                layout.reorder(from, to)
            })
            .await?;
        Ok(Some(layout))
    }

    /// End the gesture. Returns whether one was active.
    pub async fn drag_end(&self, identity: &Identity) -> bool {
        self.drags.write().await.remove(identity).is_some()
    }

    async fn mutate<F>(
        &self,
        identity: &Identity,
        expected: Option<OffsetDateTime>,
        apply: F,
    ) -> Result<DashboardLayout>
    where
        F: FnOnce(&mut DashboardLayout) -> bool,
    {
        let key = identity.storage_key();
        let _guard = self.locks.acquire(&key).await;

        let (mut layout, stored) = self.read_current(identity).await;
        if let Some(expected) = expected {
            // The guard only protects a persisted layout; with nothing
            // stored there is nothing to clobber.
            if stored && expected != layout.last_modified {
                return Err(anyhow::Error::new(LayoutConflict {
                    stored: layout.last_modified,
                }));
            }
        }

        if apply(&mut layout) {
            layout.last_modified = OffsetDateTime::now_utc();
            self.persist(identity, &key, &layout).await;
        }
        Ok(layout)
    }

    async fn read_current(&self, identity: &Identity) -> (DashboardLayout, bool) {
        let key = identity.storage_key();
        let raw = match self.store.read(&key).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %key, error = ?err, "layout read failed, using default set");
                return (DashboardLayout::default_set(OffsetDateTime::now_utc()), false);
            }
        };
        match raw {
            Some(raw) => match serde_json::from_str::<DashboardLayout>(&raw) {
                Ok(mut layout) => {
                    layout.sort_by_order();
                    (layout, true)
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = ?err, "stored layout unreadable, using default set");
                    (DashboardLayout::default_set(OffsetDateTime::now_utc()), false)
                }
            },
            None => (DashboardLayout::default_set(OffsetDateTime::now_utc()), false),
        }
    }

    async fn persist(&self, identity: &Identity, key: &str, layout: &DashboardLayout) {
        if identity.is_guest() {
            tracing::debug!("guest identity, skipping layout persistence");
            return;
        }
        let json = match serde_json::to_string(layout) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(key = %key, error = ?err, "failed to serialize layout");
                return;
            }
        };
        // Write failures are non-fatal: the caller still gets the
        // mutated layout.
        if let Err(err) = self.store.write(key, &json).await {
            tracing::warn!(key = %key, error = ?err, "failed to persist layout");
        }
    }
}
