use anyhow::Result;

use crate::infra::cache::RedisCache;

/// Subscription end of the push list the dispatcher publishes to.
/// `receive` blocks server-side for up to `wait_seconds`, so the
/// consumer loop polls without busy-waiting.
#[derive(Clone)]
pub struct PushChannel {
    cache: RedisCache,
    list_key: String,
}

impl PushChannel {
    pub fn new(cache: RedisCache, list_key: impl Into<String>) -> Self {
        Self {
            cache,
            list_key: list_key.into(),
        }
    }

    pub fn list_key(&self) -> &str {
        &self.list_key
    }

    /// Pop the oldest pending push message, waiting up to
    /// `wait_seconds` for one to arrive. An empty message is still a
    /// message (it renders the all-defaults notification downstream).
    pub async fn receive(&self, wait_seconds: u64) -> Result<Option<Vec<u8>>> {
        let mut conn = self
            .cache
            .client()
            .get_multiplexed_async_connection()
            .await?;
        let entry: Option<(String, Vec<u8>)> = redis::cmd("BRPOP")
            .arg(&self.list_key)
            .arg(wait_seconds)
            .query_async(&mut conn)
            .await?;
        Ok(entry.map(|(_, message)| message))
    }
}
