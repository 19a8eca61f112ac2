//! Transient notices with optional undo.
//!
//! A notice is a small timed state machine:
//!
//! ```text
//! Hidden --show--> Shown --dismiss | undo | timeout--> Dismissed
//! ```
//!
//! Showing again restarts the cycle and replaces the pending timer, so a
//! notice never has more than one timer alive.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeState {
    Hidden,
    Shown,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// What the notice says
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeContent {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
    /// Whether an undo action is offered
    pub undoable: bool,
}

impl NoticeContent {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            description: description.into(),
            undoable: false,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: description.into(),
            undoable: false,
        }
    }

    pub fn with_undo(mut self) -> Self {
        self.undoable = true;
        self
    }
}

struct NoticeInner {
    state: NoticeState,
    content: Option<NoticeContent>,
    // timers only dismiss the showing they were armed for
    generation: u64,
}

struct DismissTimer {
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        self.task.abort();
    }
}

pub struct Notice {
    inner: Arc<Mutex<NoticeInner>>,
    timer: Option<DismissTimer>,
}

impl Notice {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(NoticeInner {
                state: NoticeState::Hidden,
                content: None,
                generation: 0,
            })),
            timer: None,
        }
    }

    /// Show `content` and dismiss it automatically after `auto_dismiss_after`.
    /// Outside a tokio runtime there is no timer and the notice stays up
    /// until dismissed.
    pub fn show(&mut self, content: NoticeContent, auto_dismiss_after: Duration) {
        self.timer = None;
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = NoticeState::Shown;
            inner.content = Some(content);
            inner.generation
        };

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(generation, "No tokio runtime, notice will not auto-dismiss");
            return;
        };

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let shared = Arc::downgrade(&self.inner);

        let task = runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(auto_dismiss_after) => {
                    let Some(shared) = shared.upgrade() else {
                        return;
                    };
                    let mut inner = lock_inner(&shared);
                    if inner.generation == generation && inner.state == NoticeState::Shown {
                        inner.state = NoticeState::Dismissed;
                        tracing::debug!(generation, "Notice timed out");
                    }
                }
            }
        });

        self.timer = Some(DismissTimer { cancel_token, task });
    }

    /// User closed the notice. Returns false if it was not showing.
    pub fn dismiss(&mut self) -> bool {
        self.timer = None;
        let mut inner = self.lock();
        if inner.state == NoticeState::Shown {
            inner.state = NoticeState::Dismissed;
            true
        } else {
            false
        }
    }

    /// Run the undo `action` and dismiss, if an undoable notice is showing.
    pub fn undo<F: FnOnce()>(&mut self, action: F) -> bool {
        let undoable = {
            let inner = self.lock();
            inner.state == NoticeState::Shown
                && inner.content.as_ref().is_some_and(|content| content.undoable)
        };
        if !undoable {
            return false;
        }

        action();
        self.dismiss();
        true
    }

    pub fn state(&self) -> NoticeState {
        self.lock().state
    }

    pub fn is_visible(&self) -> bool {
        self.state() == NoticeState::Shown
    }

    /// Content of the notice, only while it is showing
    pub fn content(&self) -> Option<NoticeContent> {
        let inner = self.lock();
        match inner.state {
            NoticeState::Shown => inner.content.clone(),
            _ => None,
        }
    }

    /// Whether a dismiss timer is still pending
    pub fn has_pending_timer(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| !timer.task.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, NoticeInner> {
        lock_inner(&self.inner)
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_inner(inner: &Mutex<NoticeInner>) -> MutexGuard<'_, NoticeInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
