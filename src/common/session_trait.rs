use crate::common::PanelError;
use crate::progress::TransferStatus;
use std::path::PathBuf;

/// Outbound sharing session, as seen by the panel.
///
/// Implemented by the transport layer. The panel only reads state and
/// triggers actions; it never drives the transfer itself.
pub trait SharingSession: Send + Sync {
    /// Returns the access ticket, once the session has one
    fn ticket(&self) -> Option<String>;

    /// Returns the current transport flags
    fn status(&self) -> TransferStatus;

    /// Path the user picked to share
    fn selected_path(&self) -> Option<PathBuf>;

    /// Number of peers currently connected
    fn active_connections(&self) -> usize;

    fn is_broadcast(&self) -> bool;

    /// Places the ticket on the clipboard
    fn copy_ticket(&self) -> Result<(), PanelError>;

    /// Ends the sharing session
    fn stop_sharing(&self);

    /// Flips between private and broadcast sharing
    fn toggle_broadcast(&self);
}
