//! Simulated transport for the demo.
//!
//! Emits progress the way a per-file transport does: a counter that climbs
//! through each item, wobbles a little, and restarts at zero for the next.

use crate::progress::{ItemKind, RawProgress};
use crate::send::SendSession;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Shape of the simulated transfer
#[derive(Clone, Debug)]
pub struct SimulatedTransfer {
    /// One entry per item; a single-file share has one
    pub item_sizes: Vec<u64>,
    pub chunk_size: u64,
    pub rate_bps: u64,
    /// Delay before the peer connects
    pub connect_after: Duration,
    /// Occasionally report a slightly lower counter than the last one
    pub jitter: bool,
}

impl SimulatedTransfer {
    pub fn total_bytes(&self) -> u64 {
        self.item_sizes.iter().sum()
    }

    pub fn kind(&self) -> ItemKind {
        if self.item_sizes.len() > 1 {
            ItemKind::Multi
        } else {
            ItemKind::Single
        }
    }

    fn chunk_delay(&self, bytes: u64) -> Duration {
        Duration::from_secs_f64(bytes as f64 / self.rate_bps.max(1) as f64)
    }
}

/// Drive `session` through a full transfer, sending raw progress on `events`.
///
/// Returns early, without completing the session, when the session is
/// stopped or the receiver goes away.
pub async fn run(
    transfer: SimulatedTransfer,
    session: Arc<SendSession>,
    events: mpsc::Sender<RawProgress>,
) {
    let shutdown = session.shutdown_token();
    let total_bytes = transfer.total_bytes();
    let chunk_size = transfer.chunk_size.max(1);

    tokio::select! {
        _ = shutdown.cancelled() => return,
        _ = tokio::time::sleep(transfer.connect_after) => {}
    }
    session.peer_connected();
    tracing::info!(
        items = transfer.item_sizes.len(),
        total_bytes,
        "Peer connected, transfer started"
    );

    for (index, &size) in transfer.item_sizes.iter().enumerate() {
        let mut sent = 0u64;
        while sent < size {
            let step = chunk_size.min(size - sent);
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(item = index, "Transfer stopped");
                    return;
                }
                _ = tokio::time::sleep(transfer.chunk_delay(step)) => {}
            }
            sent += step;

            let reported = if transfer.jitter && sent < size && rand::thread_rng().gen_bool(0.1) {
                // small dip, well above any rollover threshold
                sent - sent / 20
            } else {
                sent
            };

            let raw = RawProgress::new(reported, total_bytes, transfer.rate_bps as f64);
            if events.send(raw).await.is_err() {
                tracing::debug!("Progress receiver dropped");
                return;
            }
        }
        tracing::debug!(item = index, bytes = size, "Item sent");
    }

    session.mark_completed();
    tracing::info!(total_bytes, "Transfer completed");
}
