use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Shortest period a sampler runs at; `interval` rejects zero
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a running periodic sampler.
///
/// Dropping the handle cancels the task, so a sampler never outlives
/// whoever owns it.
#[derive(Debug)]
pub struct SamplerHandle {
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Stop the sampler. No tick runs after this returns, except one that
    /// was already inside `on_tick`.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Call `on_tick` every `period`, starting immediately.
///
/// The task ends when the handle is cancelled or `on_tick` returns false.
/// Periods below [`MIN_PERIOD`] are raised to it. Must be called from
/// within a tokio runtime.
pub fn spawn_sampler<F>(period: Duration, mut on_tick: F) -> SamplerHandle
where
    F: FnMut(Instant) -> bool + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::debug!(period_ms = period.as_millis() as u64, "Sampler started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!("Sampler cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if token.is_cancelled() || !on_tick(Instant::now()) {
                        break;
                    }
                }
            }
        }
    });

    SamplerHandle { cancel_token, task }
}
