use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::notification::{ActiveNotification, NotificationPayload};

/// The set of notifications currently on screen, in delivery order.
///
/// Showing a payload whose tag matches an active notification replaces
/// it; the tag is the platform's de-duplication contract.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<RwLock<Vec<ActiveNotification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn show(&self, payload: NotificationPayload) -> ActiveNotification {
        let mut active = self.inner.write().await;
        let replaced = active.iter().position(|entry| entry.payload.tag == payload.tag);
        if let Some(position) = replaced {
            let old = active.remove(position);
            tracing::debug!(tag = %old.payload.tag, replaced = %old.id, "replacing notification with same tag");
        }
        let shown = ActiveNotification {
            id: Uuid::new_v4(),
            payload,
            delivered_at: OffsetDateTime::now_utc(),
        };
        active.push(shown.clone());
        shown
    }

    pub async fn active(&self) -> Vec<ActiveNotification> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<ActiveNotification> {
        self.inner
            .read()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// Remove a notification from the screen. Returns the dismissed
    /// entry, or `None` if it was already gone.
    pub async fn dismiss(&self, id: Uuid) -> Option<ActiveNotification> {
        let mut active = self.inner.write().await;
        let position = active.iter().position(|entry| entry.id == id)?;
        Some(active.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(tag: &str, body: &str) -> NotificationPayload {
        NotificationPayload {
            tag: tag.to_string(),
            body: body.to_string(),
            ..NotificationPayload::default()
        }
    }

    #[tokio::test]
    async fn distinct_tags_stack() {
        let center = NotificationCenter::new();
        center.show(payload("visit-7", "first")).await;
        center.show(payload("leave-2", "second")).await;
        assert_eq!(center.active().await.len(), 2);
    }

    #[tokio::test]
    async fn same_tag_replaces_earlier_notification() {
        let center = NotificationCenter::new();
        let first = center.show(payload("visit-7", "first")).await;
        let second = center.show(payload("visit-7", "updated")).await;

        let active = center.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
        assert_eq!(active[0].payload.body, "updated");
        assert!(center.get(first.id).await.is_none());
    }

    #[tokio::test]
    async fn dismiss_removes_only_the_target() {
        let center = NotificationCenter::new();
        let first = center.show(payload("a", "one")).await;
        let second = center.show(payload("b", "two")).await;

        let dismissed = center.dismiss(first.id).await;
        assert_eq!(dismissed.map(|entry| entry.id), Some(first.id));
        assert!(center.dismiss(first.id).await.is_none());

        let active = center.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
    }
}
