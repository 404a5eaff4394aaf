use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;

/// A platform install offer the shell chose to defer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredInstallPrompt {
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
}

/// Holds at most the single most-recent deferred install prompt, so
/// whichever component first wants it gets it regardless of mount
/// order. Consuming takes the prompt out; once the install outcome is
/// known the slot is cleared.
#[derive(Clone, Default)]
pub struct InstallPromptStore {
    slot: Arc<RwLock<Option<DeferredInstallPrompt>>>,
}

impl InstallPromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stash a prompt, replacing any earlier one.
    pub async fn set(&self, prompt: DeferredInstallPrompt) {
        let mut slot = self.slot.write().await;
        if slot.is_some() {
            tracing::debug!("replacing deferred install prompt");
        }
        *slot = Some(prompt);
    }

    pub async fn peek(&self) -> Option<DeferredInstallPrompt> {
        self.slot.read().await.clone()
    }

    /// Take the prompt out, leaving the slot empty.
    pub async fn consume(&self) -> Option<DeferredInstallPrompt> {
        self.slot.write().await.take()
    }

    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(platform: &str) -> DeferredInstallPrompt {
        DeferredInstallPrompt {
            platforms: vec![platform.to_string()],
            captured_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn set_replaces_the_previous_prompt() {
        let store = InstallPromptStore::new();
        store.set(prompt("web")).await;
        store.set(prompt("android")).await;
        assert_eq!(store.peek().await.unwrap().platforms, ["android"]);
    }

    #[tokio::test]
    async fn peek_does_not_take() {
        let store = InstallPromptStore::new();
        store.set(prompt("web")).await;
        assert!(store.peek().await.is_some());
        assert!(store.peek().await.is_some());
    }

    #[tokio::test]
    async fn consume_takes_and_clears() {
        let store = InstallPromptStore::new();
        store.set(prompt("web")).await;
        assert!(store.consume().await.is_some());
        assert!(store.consume().await.is_none());
        assert!(store.peek().await.is_none());
    }

    #[tokio::test]
    async fn clear_empties_the_slot() {
        let store = InstallPromptStore::new();
        store.set(prompt("web")).await;
        store.clear().await;
        assert!(store.peek().await.is_none());
    }
}
