pub mod email;
pub mod notification;
mod opener;
mod panel;

pub use email::EmailDialog;
pub use notification::{Notice, NoticeContent, NoticeLevel, NoticeState};
pub use opener::{EmailDelivery, SystemOpener, UriOpener};
pub use panel::{PanelStatus, SharingPanel, SharingView, StatusIndicator, TicketView};
