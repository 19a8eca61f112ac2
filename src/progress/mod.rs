//! Transfer progress: per-item counter aggregation, throughput sampling
//! and the display tuple handed to renderers.

pub mod aggregator;
pub mod policy;
pub mod sampler;
mod tracker;
mod types;

pub use aggregator::AggregatorState;
pub use policy::{BoundaryPolicy, DropRatio};
pub use sampler::SamplerHandle;
pub use tracker::ProgressTracker;
pub use types::{DisplayProgress, ItemKind, RawProgress, TransferStatus};
