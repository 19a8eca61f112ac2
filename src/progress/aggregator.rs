//! Folds a per-item byte counter into whole-transfer progress.
//!
//! Everything here is a pure function over an owned [`AggregatorState`];
//! the tracker owns the state and decides when to call in.

use super::policy::BoundaryPolicy;
use super::types::{DisplayProgress, RawProgress, TransferStatus};
use tokio::time::Instant;

/// Rolling state for one multi-item transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregatorState {
    /// Last raw counter value accepted for the current item
    pub previous_bytes: u64,
    /// Peak counter seen for the current item, folded in at rollover
    pub max_bytes_for_item: u64,
    /// Sum of every finished item. Never decreases.
    pub accumulated_bytes: u64,
    pub started_at: Option<Instant>,
}

impl AggregatorState {
    pub fn started(at: Instant) -> Self {
        Self {
            started_at: Some(at),
            ..Self::default()
        }
    }

    /// Bytes for the whole transfer given the in-flight item's counter
    pub fn total_bytes(&self, current_item_bytes: u64) -> u64 {
        self.accumulated_bytes.saturating_add(current_item_bytes)
    }

    fn fold(&mut self) -> u64 {
        let finished = self.max_bytes_for_item;
        self.accumulated_bytes = self.accumulated_bytes.saturating_add(finished);
        finished
    }
}

/// Feed one raw counter sample into `state`.
///
/// Returns the size of the finished item when the sample was taken as an
/// item boundary. At most one rule applies per sample, checked in order:
/// rollover drop, hard zero, forward progress, jitter.
pub fn observe<P>(state: &mut AggregatorState, current: u64, policy: &P) -> Option<u64>
where
    P: BoundaryPolicy + ?Sized,
{
    let previous = state.previous_bytes;

    if current > state.max_bytes_for_item {
        state.max_bytes_for_item = current;
    }
    let peak = state.max_bytes_for_item;

    if previous > 0 && current < previous && policy.is_rollover(previous, current) && peak > 0 {
        let finished = state.fold();
        state.max_bytes_for_item = current;
        state.previous_bytes = current;
        Some(finished)
    } else if current == 0 && previous > 0 && peak > 0 {
        let finished = state.fold();
        state.max_bytes_for_item = 0;
        state.previous_bytes = 0;
        Some(finished)
    } else if current > previous {
        state.previous_bytes = current;
        None
    } else {
        // same item, counter wobbled back
        if current < previous {
            state.previous_bytes = current;
        }
        None
    }
}

/// Cumulative-average throughput since `started_at`.
///
/// Smoother than an instantaneous rate and free of the dips the per-item
/// transport speed shows at every item boundary.
pub fn cumulative_speed(total_bytes: u64, started_at: Instant, now: Instant) -> f64 {
    let elapsed = now.saturating_duration_since(started_at).as_secs_f64();
    if elapsed > 0.0 {
        total_bytes as f64 / elapsed
    } else {
        0.0
    }
}

/// Project tracker state into what the progress bar shows.
///
/// `None` whenever nothing is transporting, however stale the rest is.
pub fn project(
    status: &TransferStatus,
    latest: Option<&RawProgress>,
    aggregate: Option<&AggregatorState>,
    speed_bps: f64,
) -> Option<DisplayProgress> {
    if !status.transporting {
        return None;
    }

    let Some(raw) = latest else {
        return Some(DisplayProgress::default());
    };

    match aggregate {
        Some(state) if status.is_multi_active() => Some(DisplayProgress::new(
            state.total_bytes(raw.bytes_transferred),
            raw.total_bytes,
            speed_bps,
        )),
        _ => Some(DisplayProgress::new(
            raw.bytes_transferred,
            raw.total_bytes,
            raw.speed_bps,
        )),
    }
}
