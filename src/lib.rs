pub mod common;
pub mod progress;
pub mod qr;
pub mod send;
pub mod sharing;
pub mod transport;
pub mod ui;
