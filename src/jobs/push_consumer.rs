use anyhow::Result;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::app::bridge::BridgeService;
use crate::infra::channel::PushChannel;

const ERROR_BACKOFF_MS: u64 = 1000;

/// Drain the push list into the notification center. Messages are
/// popped before delivery and there is no redelivery: a failed or
/// timed-out display is logged and the loop moves on.
pub async fn run(channel: PushChannel, bridge: BridgeService, poll_seconds: u64) -> Result<()> {
    info!(list = %channel.list_key(), "push consumer started");
    loop {
        match channel.receive(poll_seconds).await {
            Ok(Some(message)) => match bridge.deliver(&message).await {
                Ok(shown) => {
                    info!(id = %shown.id, tag = %shown.payload.tag, "delivered channel push");
                }
                Err(err) => {
                    error!(error = ?err, "failed to deliver channel push");
                }
            },
            Ok(None) => {
                // BRPOP already blocked for the poll window; go around.
            }
            Err(err) => {
                warn!(error = ?err, "push channel receive failed, backing off");
                tokio::time::sleep(Duration::from_millis(ERROR_BACKOFF_MS)).await;
            }
        }
    }
}
