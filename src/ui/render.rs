use super::format::{format_bytes, format_speed};
use crate::progress::DisplayProgress;
use crate::sharing::{NoticeContent, NoticeLevel, PanelStatus, StatusIndicator, TicketView};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar fed with display tuples.
///
/// The bar shows our own throughput estimate, not indicatif's.
pub struct ProgressRenderer {
    bar: ProgressBar,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let template = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}";
        if let Ok(bar_style) = ProgressStyle::default_bar().template(template) {
            bar.set_style(bar_style.progress_chars("█▓░"));
        }
        Self { bar }
    }

    pub fn update(&self, progress: &DisplayProgress) {
        self.bar.set_length(progress.total_bytes);
        self.bar.set_position(progress.bytes_transferred);
        self.bar.set_message(progress_line(progress));
    }

    pub fn finish(&self, status: PanelStatus) {
        self.bar.finish_with_message(status.to_string());
    }

    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// "1.00 MB / 4.00 MB (25.0%) at 512.00 KB/s"
pub fn progress_line(progress: &DisplayProgress) -> String {
    format!(
        "{} / {} ({:.1}%) at {}",
        format_bytes(progress.bytes_transferred),
        format_bytes(progress.total_bytes),
        progress.percentage,
        format_speed(progress.speed_bps)
    )
}

pub fn print_indicator(indicator: &StatusIndicator) {
    let status = match indicator.status {
        PanelStatus::Completed => style(indicator.status.to_string()).green(),
        PanelStatus::Sharing => style(indicator.status.to_string()).cyan(),
        PanelStatus::Listening => style(indicator.status.to_string()).yellow(),
    };

    if let Some(label) = &indicator.file_label {
        println!("{} {}", style("File:").bold(), label);
    }
    let mode = if indicator.broadcast { "broadcast" } else { "private" };
    println!(
        "{} ({} mode, {} connected)",
        status, mode, indicator.active_connections
    );
}

pub fn print_ticket(view: &TicketView, qr: Option<&str>) {
    println!("{}", style("Share this ticket").bold());
    if let Some(qr) = qr {
        println!("\n{}\n", qr);
    }
    println!("{}", view.ticket);
    if view.copied {
        println!("{}", style("Copied to clipboard").dim());
    }
}

pub fn print_notice(notice: &NoticeContent) {
    let title = match notice.level {
        NoticeLevel::Info => style(notice.title.as_str()).cyan(),
        NoticeLevel::Error => style(notice.title.as_str()).red(),
    };
    let undo = if notice.undoable { " [undo]" } else { "" };
    println!("{}: {}{}", title, notice.description, undo);
}
