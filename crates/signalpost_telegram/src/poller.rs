//! Long-polling update loop.

use crate::TelegramClient;
use crate::convert::to_inbound;
use signalpost_core::InboundEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Pause after a failed `getUpdates` call.
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Pulls updates and forwards them as [`InboundEvent`]s.
pub struct UpdatePoller {
    client: TelegramClient,
    timeout_secs: u64,
    offset: Option<i64>,
}

impl UpdatePoller {
    /// Creates a poller that long-polls for `timeout_secs` per request.
    pub fn new(client: TelegramClient, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
            offset: None,
        }
    }

    /// Polls until the receiving side of `tx` is dropped.
    ///
    /// Updates are acknowledged by advancing the offset once they have been
    /// handed to the channel.
    #[instrument(skip(self, tx), fields(timeout_secs = self.timeout_secs))]
    pub async fn run<T>(mut self, tx: mpsc::Sender<T>)
    where
        T: From<InboundEvent> + Send,
    {
        info!("Starting update poller");
        loop {
            let updates = tokio::select! {
                result = self.client.get_updates(self.offset, self.timeout_secs) => result,
                _ = tx.closed() => break,
            };

            match updates {
                Ok(updates) => {
                    for update in updates {
                        self.offset = Some(update.update_id + 1);
                        let Some(event) = to_inbound(update) else {
                            continue;
                        };
                        debug!(offset = ?self.offset, "Forwarding update");
                        if tx.send(T::from(event)).await.is_err() {
                            info!("Event receiver closed");
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "getUpdates failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
        info!("Update poller stopped");
    }
}
