#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticketdrop::common::{PanelConfig, PanelError, SharingSession};
use ticketdrop::progress::{ItemKind, TransferStatus};
use ticketdrop::sharing::UriOpener;

pub const TICKET: &str = "drop-test-ticket-123";

pub fn default_config() -> PanelConfig {
    PanelConfig::default()
}

pub fn fast_config() -> PanelConfig {
    PanelConfig {
        sample_interval_ms: 100,
        ..PanelConfig::default()
    }
}

pub const UNDO_WINDOW: Duration = Duration::from_millis(1500);

/// Session whose flags the test flips by hand
pub struct FakeSession {
    pub ticket: Mutex<Option<String>>,
    pub status: Mutex<TransferStatus>,
    pub broadcast: AtomicBool,
    pub connections: AtomicUsize,
    pub copies: AtomicUsize,
    pub toggles: AtomicUsize,
    pub stops: AtomicUsize,
    pub fail_copy: AtomicBool,
}

impl FakeSession {
    pub fn new(kind: ItemKind) -> Arc<Self> {
        Arc::new(Self {
            ticket: Mutex::new(Some(TICKET.to_string())),
            status: Mutex::new(TransferStatus::idle(kind)),
            broadcast: AtomicBool::new(false),
            connections: AtomicUsize::new(0),
            copies: AtomicUsize::new(0),
            toggles: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            fail_copy: AtomicBool::new(false),
        })
    }

    pub fn set_status(&self, status: TransferStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_ticket(&self, ticket: Option<&str>) {
        *self.ticket.lock().unwrap() = ticket.map(str::to_string);
    }

    pub fn is_broadcast_on(&self) -> bool {
        self.broadcast.load(Ordering::SeqCst)
    }
}

impl SharingSession for FakeSession {
    fn ticket(&self) -> Option<String> {
        self.ticket.lock().unwrap().clone()
    }

    fn status(&self) -> TransferStatus {
        *self.status.lock().unwrap()
    }

    fn selected_path(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/home/user/holiday-photos"))
    }

    fn active_connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    fn is_broadcast(&self) -> bool {
        self.broadcast.load(Ordering::SeqCst)
    }

    fn copy_ticket(&self) -> Result<(), PanelError> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(PanelError::Clipboard("no display".to_string()));
        }
        self.copies.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop_sharing(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        let kind = self.status().kind;
        self.set_status(TransferStatus::idle(kind));
    }

    fn toggle_broadcast(&self) {
        self.toggles.fetch_add(1, Ordering::SeqCst);
        self.broadcast.fetch_xor(true, Ordering::SeqCst);
    }
}

/// Opener that records URIs, or fails every call
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingOpener {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            opened: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl UriOpener for RecordingOpener {
    fn open_uri(&self, uri: &str) -> Result<(), PanelError> {
        if self.fail {
            return Err(PanelError::Opener("no mail client".to_string()));
        }
        self.opened.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}
