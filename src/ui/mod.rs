mod format;
mod render;

pub use format::{format_bytes, format_speed};
pub use render::{print_indicator, print_notice, print_ticket, progress_line, ProgressRenderer};
