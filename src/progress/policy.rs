//! Item-boundary policies.
//!
//! The transport never says "next file started"; it only reports bytes for
//! the current item. A policy decides whether a drop in that counter is a
//! rollover to a new item or just jitter within the same item.

/// Decides whether a counter drop marks a new item.
pub trait BoundaryPolicy: Send + Sync {
    /// Called only when the counter dropped (`current < previous`).
    /// Returning false makes the aggregator treat the drop as jitter.
    fn is_rollover(&self, previous: u64, current: u64) -> bool;
}

/// Rollover when the counter falls below a fraction of its previous value.
///
/// Real item boundaries drop close to 100% (the next file starts near zero),
/// retransmission wobble drops a little. 0.5 sits between the two; it is a
/// tuning constant, not a protocol guarantee. Meaningful in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropRatio {
    ratio: f64,
}

impl DropRatio {
    pub const DEFAULT_RATIO: f64 = 0.5;

    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

impl Default for DropRatio {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATIO)
    }
}

impl BoundaryPolicy for DropRatio {
    fn is_rollover(&self, previous: u64, current: u64) -> bool {
        (current as f64) < previous as f64 * self.ratio
    }
}

impl<F> BoundaryPolicy for F
where
    F: Fn(u64, u64) -> bool + Send + Sync,
{
    fn is_rollover(&self, previous: u64, current: u64) -> bool {
        self(previous, current)
    }
}
