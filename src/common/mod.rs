pub mod config;
pub mod errors;
pub mod session_trait;

pub use config::PanelConfig;
pub use errors::PanelError;
pub use session_trait::SharingSession;
