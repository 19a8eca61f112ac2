use thiserror::Error;

/// Errors surfaced by the sharing panel.
///
/// The progress aggregator itself never fails; everything here comes from
/// user input or an external delegate (clipboard, URI opener, config).
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Please enter a valid email address")]
    InvalidRecipient,

    #[error("No ticket available to share")]
    NoTicket,

    #[error("URI opener is not available")]
    OpenerUnavailable,

    #[error("Failed to open URI: {0}")]
    Opener(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Failed to render QR code: {0}")]
    Qr(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl PanelError {
    /// Whether the error came from user input rather than a delegate.
    ///
    /// Input errors are shown inline and never raised as notices.
    pub fn is_input(&self) -> bool {
        matches!(self, PanelError::InvalidRecipient)
    }
}

impl From<figment::Error> for PanelError {
    fn from(err: figment::Error) -> Self {
        PanelError::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_recipient_message_is_user_facing() {
        assert_eq!(
            PanelError::InvalidRecipient.to_string(),
            "Please enter a valid email address"
        );
        assert!(PanelError::InvalidRecipient.is_input());
    }

    #[test]
    fn test_delegate_errors_are_not_input() {
        assert!(!PanelError::Opener("boom".into()).is_input());
        assert!(!PanelError::Clipboard("busy".into()).is_input());
        assert!(!PanelError::OpenerUnavailable.is_input());
    }
}
