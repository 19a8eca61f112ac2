use serde::{Deserialize, Serialize};

/// Progress as reported by the transport for the item currently in flight.
///
/// In a multi-item transfer `bytes_transferred` restarts near zero every
/// time the transport moves on to the next file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProgress {
    pub bytes_transferred: u64,
    pub total_bytes: u64,
    pub speed_bps: f64,
}

impl RawProgress {
    pub fn new(bytes_transferred: u64, total_bytes: u64, speed_bps: f64) -> Self {
        Self {
            bytes_transferred,
            total_bytes,
            speed_bps,
        }
    }
}

/// What the user picked to share
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    Single,
    /// A directory, sent as several items back to back
    Multi,
}

/// Transport flags the panel reacts to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferStatus {
    pub transporting: bool,
    pub completed: bool,
    pub kind: ItemKind,
}

impl TransferStatus {
    pub fn idle(kind: ItemKind) -> Self {
        Self {
            transporting: false,
            completed: false,
            kind,
        }
    }

    pub fn transporting(kind: ItemKind) -> Self {
        Self {
            transporting: true,
            completed: false,
            kind,
        }
    }

    pub fn completed(kind: ItemKind) -> Self {
        Self {
            transporting: false,
            completed: true,
            kind,
        }
    }

    /// Multi-item aggregation runs while this holds. A `completed` flag
    /// racing ahead of `transporting` does not end it.
    pub fn is_multi_active(&self) -> bool {
        self.transporting && self.kind == ItemKind::Multi
    }
}

/// Display-ready progress handed to the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayProgress {
    pub bytes_transferred: u64,
    pub total_bytes: u64,
    pub speed_bps: f64,
    /// 0.0 - 100.0
    pub percentage: f64,
}

impl DisplayProgress {
    pub fn new(bytes_transferred: u64, total_bytes: u64, speed_bps: f64) -> Self {
        let percentage = if total_bytes > 0 {
            (bytes_transferred as f64 / total_bytes as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            bytes_transferred,
            total_bytes,
            speed_bps,
            percentage,
        }
    }
}
