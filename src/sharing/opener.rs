use crate::common::PanelError;

/// Native capability to hand a URI to the OS (mail client, browser).
pub trait UriOpener: Send + Sync {
    fn open_uri(&self, uri: &str) -> Result<(), PanelError>;
}

/// Opens URIs with the desktop's default handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UriOpener for SystemOpener {
    fn open_uri(&self, uri: &str) -> Result<(), PanelError> {
        open::that(uri).map_err(|e| PanelError::Opener(e.to_string()))
    }
}

/// How an email hand-off ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailDelivery {
    /// Passed to the native opener
    Opened,
    /// No native opener; the host should navigate to this URI itself
    Navigate(String),
}
