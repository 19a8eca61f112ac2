use crate::common::{PanelError, SharingSession};
use crate::progress::{ItemKind, TransferStatus};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Local sharing session driven by the simulated transport.
///
/// Flags are atomics so the transport task can flip them while the panel
/// reads them.
pub struct SendSession {
    ticket: String,
    path: PathBuf,
    kind: ItemKind,
    transporting: AtomicBool,
    completed: AtomicBool,
    broadcast: AtomicBool,
    connections: AtomicUsize,
    shutdown: CancellationToken,
}

impl SendSession {
    pub fn new(path: PathBuf, kind: ItemKind) -> Self {
        Self {
            ticket: generate_ticket(),
            path,
            kind,
            transporting: AtomicBool::new(false),
            completed: AtomicBool::new(false),
            broadcast: AtomicBool::new(false),
            connections: AtomicUsize::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Token cancelled by `stop_sharing`, watched by the transport
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    // Transport-side updates

    pub fn peer_connected(&self) {
        self.connections.fetch_add(1, Ordering::SeqCst);
        self.transporting.store(true, Ordering::SeqCst);
    }

    pub fn mark_completed(&self) {
        self.transporting.store(false, Ordering::SeqCst);
        self.completed.store(true, Ordering::SeqCst);
        self.connections.store(0, Ordering::SeqCst);
    }
}

impl SharingSession for SendSession {
    fn ticket(&self) -> Option<String> {
        if self.shutdown.is_cancelled() {
            return None;
        }
        Some(self.ticket.clone())
    }

    fn status(&self) -> TransferStatus {
        TransferStatus {
            transporting: self.transporting.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
            kind: self.kind,
        }
    }

    fn selected_path(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }

    fn active_connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    fn is_broadcast(&self) -> bool {
        self.broadcast.load(Ordering::SeqCst)
    }

    fn copy_ticket(&self) -> Result<(), PanelError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| PanelError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(self.ticket.clone())
            .map_err(|e| PanelError::Clipboard(e.to_string()))
    }

    fn stop_sharing(&self) {
        self.shutdown.cancel();
        self.transporting.store(false, Ordering::SeqCst);
        self.connections.store(0, Ordering::SeqCst);
    }

    fn toggle_broadcast(&self) {
        self.broadcast.fetch_xor(true, Ordering::SeqCst);
    }
}

/// Opaque ticket handed to the receiving peer
fn generate_ticket() -> String {
    format!("drop{}", Uuid::new_v4().simple())
}
