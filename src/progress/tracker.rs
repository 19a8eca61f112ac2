use super::aggregator::{self, AggregatorState};
use super::policy::{BoundaryPolicy, DropRatio};
use super::sampler::{spawn_sampler, SamplerHandle, MIN_PERIOD};
use super::types::{DisplayProgress, RawProgress, TransferStatus};
use crate::common::PanelConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;

/// Tracks transfer progress and publishes display updates.
///
/// Raw events and status flips come in through `record`/`update_status`;
/// while a multi-item transfer is active a sampler task recomputes the
/// throughput every `sample_interval`. Clones share the same state.
#[derive(Clone)]
pub struct ProgressTracker {
    state: Arc<Mutex<TrackerState>>,
    policy: Arc<dyn BoundaryPolicy>,
    sample_interval: Duration,
    progress_sender: watch::Sender<Option<DisplayProgress>>,
}

struct TrackerState {
    status: TransferStatus,
    latest: Option<RawProgress>,
    aggregate: Option<AggregatorState>,
    speed_bps: f64,
    // bumped per multi-item transfer, stale samplers compare against it
    transfer_id: u64,
    revision: u64,
    sampler: Option<SamplerHandle>,
}

impl TrackerState {
    fn display(&self) -> Option<DisplayProgress> {
        aggregator::project(
            &self.status,
            self.latest.as_ref(),
            self.aggregate.as_ref(),
            self.speed_bps,
        )
    }

    fn resample(&mut self, now: Instant) {
        let Some(aggregate) = self.aggregate.as_ref() else {
            return;
        };
        let Some(started_at) = aggregate.started_at else {
            return;
        };

        let current = self.latest.map_or(0, |raw| raw.bytes_transferred);
        self.speed_bps = aggregator::cumulative_speed(aggregate.total_bytes(current), started_at, now);
        self.revision += 1;
    }

    fn teardown(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            sampler.cancel();
        }
        if let Some(aggregate) = self.aggregate.take() {
            tracing::info!(
                transfer_id = self.transfer_id,
                accumulated_bytes = aggregate.accumulated_bytes,
                "Multi-item transfer ended"
            );
        }
        self.speed_bps = 0.0;
    }
}

impl ProgressTracker {
    /// `sample_interval` is raised to [`MIN_PERIOD`] if shorter.
    pub fn new(policy: Arc<dyn BoundaryPolicy>, sample_interval: Duration) -> Self {
        let (progress_sender, _) = watch::channel(None);
        let sample_interval = sample_interval.max(MIN_PERIOD);
        Self {
            state: Arc::new(Mutex::new(TrackerState {
                status: TransferStatus::default(),
                latest: None,
                aggregate: None,
                speed_bps: 0.0,
                transfer_id: 0,
                revision: 0,
                sampler: None,
            })),
            policy,
            sample_interval,
            progress_sender,
        }
    }

    pub fn from_config(config: &PanelConfig) -> Self {
        Self::new(
            Arc::new(DropRatio::new(config.rollover_ratio)),
            config.sample_interval(),
        )
    }

    /// Apply new transport flags.
    ///
    /// Entering a multi-item transfer resets aggregation and starts the
    /// sampler; leaving it (stop, completion, kind change) cancels the
    /// sampler and discards the aggregate. Outside a tokio runtime no
    /// sampler is started and throughput is only recomputed on events.
    pub fn update_status(&self, status: TransferStatus) {
        let mut state = self.lock();
        if state.status == status {
            return;
        }

        let was_active = state.status.is_multi_active();
        let now_active = status.is_multi_active();
        state.status = status;

        if !status.transporting {
            state.latest = None;
        }

        if was_active && !now_active {
            state.teardown();
        } else if !was_active && now_active {
            self.begin_multi(&mut state);
        }

        state.revision += 1;
        self.publish(&state);
    }

    /// Feed one raw progress event from the transport.
    pub fn record(&self, raw: RawProgress) {
        let mut state = self.lock();
        if !state.status.transporting {
            tracing::trace!(bytes = raw.bytes_transferred, "Ignoring progress while idle");
            return;
        }

        state.latest = Some(raw);

        if state.status.is_multi_active() {
            let transfer_id = state.transfer_id;
            if let Some(aggregate) = state.aggregate.as_mut() {
                if let Some(finished) =
                    aggregator::observe(aggregate, raw.bytes_transferred, self.policy.as_ref())
                {
                    tracing::debug!(
                        transfer_id,
                        finished_bytes = finished,
                        accumulated_bytes = aggregate.accumulated_bytes,
                        "Item boundary detected"
                    );
                }
            }
            state.resample(Instant::now());
        }

        state.revision += 1;
        self.publish(&state);
    }

    /// Tear down synchronously: the sampler is cancelled and the aggregate
    /// dropped before this returns.
    pub fn stop(&self) {
        let mut state = self.lock();
        state.teardown();
        state.status.transporting = false;
        state.latest = None;
        state.revision += 1;
        self.publish(&state);
    }

    /// Current display tuple, `None` when nothing is transporting
    pub fn display(&self) -> Option<DisplayProgress> {
        self.lock().display()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DisplayProgress>> {
        self.progress_sender.subscribe()
    }

    pub fn status(&self) -> TransferStatus {
        self.lock().status
    }

    /// Bytes folded in from finished items of the active transfer
    pub fn accumulated_bytes(&self) -> Option<u64> {
        self.lock().aggregate.map(|aggregate| aggregate.accumulated_bytes)
    }

    /// Counts every state mutation, for observing quiescence
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn is_sampling(&self) -> bool {
        self.lock()
            .sampler
            .as_ref()
            .is_some_and(|sampler| !sampler.is_cancelled())
    }

    fn begin_multi(&self, state: &mut TrackerState) {
        if let Some(stale) = state.sampler.take() {
            stale.cancel();
        }

        state.transfer_id += 1;
        state.aggregate = Some(AggregatorState::started(Instant::now()));
        state.speed_bps = 0.0;

        let transfer_id = state.transfer_id;
        tracing::info!(
            transfer_id,
            sample_interval_ms = self.sample_interval.as_millis() as u64,
            "Multi-item transfer started"
        );

        if Handle::try_current().is_err() {
            tracing::warn!(transfer_id, "No tokio runtime, throughput only updates on events");
            return;
        }

        let shared = Arc::downgrade(&self.state);
        let sender = self.progress_sender.clone();

        state.sampler = Some(spawn_sampler(self.sample_interval, move |now| {
            let Some(shared) = shared.upgrade() else {
                return false;
            };
            let mut state = lock_state(&shared);
            if state.transfer_id != transfer_id || state.aggregate.is_none() {
                return false;
            }
            state.resample(now);
            sender.send_replace(state.display());
            true
        }));
    }

    fn publish(&self, state: &TrackerState) {
        self.progress_sender.send_replace(state.display());
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<TrackerState>) -> MutexGuard<'_, TrackerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
