use super::email::EmailDialog;
use super::notification::{Notice, NoticeContent};
use super::opener::{EmailDelivery, UriOpener};
use crate::common::{PanelConfig, PanelError, SharingSession};
use crate::progress::{DisplayProgress, ProgressTracker, RawProgress, TransferStatus};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Headline status, by priority completed > transporting > idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStatus {
    Completed,
    Sharing,
    Listening,
}

impl PanelStatus {
    pub fn from_status(status: &TransferStatus) -> Self {
        if status.completed {
            PanelStatus::Completed
        } else if status.transporting {
            PanelStatus::Sharing
        } else {
            PanelStatus::Listening
        }
    }
}

impl fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PanelStatus::Completed => "Transfer completed",
            PanelStatus::Sharing => "Sharing in progress",
            PanelStatus::Listening => "Listening for connection",
        };
        f.write_str(text)
    }
}

/// Data for the status indicator in the panel header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    /// Last component of the shared path
    pub file_label: Option<String>,
    pub status: PanelStatus,
    pub active_connections: usize,
    pub broadcast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    pub ticket: String,
    /// Ticket was copied to the clipboard during this session
    pub copied: bool,
    pub broadcast: bool,
}

/// The one body view the panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum SharingView {
    Ticket(TicketView),
    InProgress(DisplayProgress),
    Completed,
}

/// Sender-side sharing panel.
///
/// Wraps a [`SharingSession`] with progress aggregation, the broadcast
/// toggle and its undo notice, and ticket delivery by clipboard or email.
pub struct SharingPanel {
    session: Arc<dyn SharingSession>,
    tracker: ProgressTracker,
    opener: Option<Arc<dyn UriOpener>>,
    config: PanelConfig,
    broadcast_notice: Notice,
    error_notice: Notice,
    email: EmailDialog,
    copied: bool,
}

impl SharingPanel {
    pub fn new(session: Arc<dyn SharingSession>, config: PanelConfig) -> Self {
        Self {
            tracker: ProgressTracker::from_config(&config),
            session,
            opener: None,
            config,
            broadcast_notice: Notice::new(),
            error_notice: Notice::new(),
            email: EmailDialog::default(),
            copied: false,
        }
    }

    /// Use a native opener for email hand-off instead of host navigation
    pub fn with_opener(mut self, opener: Arc<dyn UriOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Swap the progress tracker, e.g. for one with a custom boundary policy
    pub fn with_tracker(mut self, tracker: ProgressTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Pull the session flags into the tracker.
    ///
    /// `on_progress`, `progress` and `view` do this themselves; call it
    /// directly to react to a flag change with no event to go with it.
    /// Inside a tokio runtime, entering a multi-item transfer starts the
    /// throughput sampler; without one, throughput follows events only.
    pub fn sync(&self) -> TransferStatus {
        let status = self.session.status();
        self.tracker.update_status(status);
        status
    }

    pub fn on_progress(&self, raw: RawProgress) {
        self.sync();
        self.tracker.record(raw);
    }

    pub fn progress(&self) -> Option<DisplayProgress> {
        self.sync();
        self.tracker.display()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DisplayProgress>> {
        self.tracker.subscribe()
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn status(&self) -> PanelStatus {
        PanelStatus::from_status(&self.session.status())
    }

    pub fn indicator(&self) -> StatusIndicator {
        let file_label = self.session.selected_path().and_then(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        });

        StatusIndicator {
            file_label,
            status: self.status(),
            active_connections: self.session.active_connections(),
            broadcast: self.session.is_broadcast(),
        }
    }

    /// Pick the body view; `None` while idle and no ticket exists yet
    pub fn view(&self) -> Option<SharingView> {
        let status = self.sync();

        if status.completed {
            return Some(SharingView::Completed);
        }
        if status.transporting {
            let progress = self.tracker.display().unwrap_or_default();
            return Some(SharingView::InProgress(progress));
        }

        self.session.ticket().map(|ticket| {
            SharingView::Ticket(TicketView {
                ticket,
                copied: self.copied,
                broadcast: self.session.is_broadcast(),
            })
        })
    }

    /// Flip broadcast mode. Turning it on shows an undo notice, which
    /// auto-dismisses only when called inside a tokio runtime.
    pub fn toggle_broadcast(&mut self) {
        let turning_on = !self.session.is_broadcast();
        self.session.toggle_broadcast();
        tracing::info!(broadcast = turning_on, "Broadcast mode toggled");

        if turning_on {
            let content = NoticeContent::info(
                "Broadcast mode on",
                "Anyone with the ticket can connect",
            )
            .with_undo();
            self.broadcast_notice.show(content, self.config.undo_window());
        }
    }

    /// Undo from the broadcast notice: toggles back and dismisses
    pub fn undo_broadcast(&mut self) -> bool {
        let session = Arc::clone(&self.session);
        self.broadcast_notice.undo(|| session.toggle_broadcast())
    }

    pub fn dismiss_broadcast_notice(&mut self) -> bool {
        self.broadcast_notice.dismiss()
    }

    pub fn broadcast_notice(&self) -> &Notice {
        &self.broadcast_notice
    }

    pub fn error_notice(&self) -> &Notice {
        &self.error_notice
    }

    pub fn copy_ticket(&mut self) -> Result<(), PanelError> {
        match self.session.copy_ticket() {
            Ok(()) => {
                self.copied = true;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to copy ticket");
                self.show_error("Failed to copy ticket", &err);
                Err(err)
            }
        }
    }

    /// Copies the ticket first, then opens the email dialog
    pub fn open_email_dialog(&mut self) {
        if let Err(err) = self.copy_ticket() {
            tracing::debug!(error = %err, "Opening email dialog without clipboard copy");
        }
        self.email.open();
    }

    pub fn email(&self) -> &EmailDialog {
        &self.email
    }

    pub fn set_email_recipient(&mut self, value: impl Into<String>) {
        self.email.set_recipient(value);
    }

    pub fn close_email_dialog(&mut self) {
        self.email.close();
    }

    /// Validate the recipient and hand the mailto URI off.
    ///
    /// An invalid recipient only sets the dialog's inline error. Once the
    /// recipient is valid the dialog closes whatever the opener does; an
    /// opener failure is logged and shown as an error notice.
    pub fn send_email(&mut self) -> Result<EmailDelivery, PanelError> {
        let ticket = self.session.ticket().ok_or(PanelError::NoTicket)?;
        let uri = self.email.submit(&ticket, &self.config.app_name)?;
        self.email.close();

        let Some(opener) = self.opener.clone() else {
            tracing::debug!("No native opener, handing mailto to host");
            return Ok(EmailDelivery::Navigate(uri));
        };

        match opener.open_uri(&uri) {
            Ok(()) => Ok(EmailDelivery::Opened),
            Err(err) => {
                tracing::error!(error = %err, "Failed to open mail client");
                self.show_error("Failed to open email client", &err);
                Err(err)
            }
        }
    }

    /// Stop sharing; progress state is torn down before this returns
    pub fn stop_sharing(&mut self) {
        self.session.stop_sharing();
        self.tracker.stop();
        self.broadcast_notice.dismiss();
        tracing::info!("Sharing stopped");
    }

    fn show_error(&mut self, title: &str, err: &PanelError) {
        self.error_notice
            .show(NoticeContent::error(title, err.to_string()), self.config.error_notice());
    }
}
