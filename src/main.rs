use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use ticketdrop::common::PanelConfig;
use ticketdrop::progress::DisplayProgress;
use ticketdrop::qr;
use ticketdrop::send::SendSession;
use ticketdrop::sharing::{EmailDialog, SharingPanel, SharingView, SystemOpener, UriOpener};
use ticketdrop::transport::{self, SimulatedTransfer};
use ticketdrop::ui::{self, ProgressRenderer};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ticketdrop")] // name in --help
#[command(about = "Share a ticket, watch the transfer")]
struct Cli {
    /// Config file, defaults to the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sharing panel against a simulated transfer
    Demo {
        #[arg(default_value = "shared-folder", help = "Path shown as the shared item")]
        path: PathBuf,

        #[arg(long, default_value_t = 5, help = "Number of items; 1 simulates a single file")]
        files: usize,

        #[arg(long, default_value_t = 4 * 1024 * 1024)]
        file_size: u64,

        #[arg(long, default_value_t = 256 * 1024)]
        chunk_size: u64,

        #[arg(long, default_value_t = 8 * 1024 * 1024, help = "Bytes per second")]
        rate: u64,

        #[arg(long, help = "Turn broadcast mode on before the peer connects")]
        broadcast: bool,

        #[arg(long, help = "Let the counter wobble within an item")]
        jitter: bool,

        #[arg(long, help = "Copy the ticket to the clipboard")]
        copy: bool,

        #[arg(long, help = "Print progress as JSON lines instead of a bar")]
        json: bool,
    },

    /// Send a ticket by email through the default mail client
    Email {
        #[arg(long)]
        to: String,

        #[arg(long)]
        ticket: String,

        #[arg(long, help = "Print the mailto URI instead of opening it")]
        print: bool,
    },

    /// Print a ticket and its QR code
    Ticket { ticket: String },
}

struct DemoOptions {
    path: PathBuf,
    transfer: SimulatedTransfer,
    broadcast: bool,
    copy: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PanelConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Demo {
            path,
            files,
            file_size,
            chunk_size,
            rate,
            broadcast,
            jitter,
            copy,
            json,
        } => {
            let transfer = SimulatedTransfer {
                item_sizes: vec![file_size; files.max(1)],
                chunk_size,
                rate_bps: rate,
                connect_after: Duration::from_secs(2),
                jitter,
            };
            let options = DemoOptions {
                path,
                transfer,
                broadcast,
                copy,
                json,
            };
            run_demo(config, options).await
        }

        Commands::Email { to, ticket, print } => {
            let mut dialog = EmailDialog::default();
            dialog.set_recipient(to);
            let uri = dialog
                .submit(&ticket, &config.app_name)
                .context("Cannot send ticket")?;

            if print {
                println!("{}", uri);
            } else {
                SystemOpener
                    .open_uri(&uri)
                    .context("Failed to open email client")?;
            }
            Ok(())
        }

        Commands::Ticket { ticket } => {
            let qr = qr::generate_qr(&ticket).context("Ticket too long for a QR code")?;
            println!("\n{}\n", qr);
            println!("{}", ticket);
            Ok(())
        }
    }
}

// RUST_LOG wins over -v
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "ticketdrop=warn",
        1 => "ticketdrop=info",
        2 => "ticketdrop=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_demo(config: PanelConfig, options: DemoOptions) -> Result<()> {
    let session = Arc::new(SendSession::new(options.path, options.transfer.kind()));
    let mut panel =
        SharingPanel::new(session.clone(), config).with_opener(Arc::new(SystemOpener));

    ui::print_indicator(&panel.indicator());

    if options.copy && panel.copy_ticket().is_err() {
        if let Some(notice) = panel.error_notice().content() {
            ui::print_notice(&notice);
        }
    }

    if let Some(SharingView::Ticket(view)) = panel.view() {
        let qr = qr::generate_qr(&view.ticket).ok();
        ui::print_ticket(&view, qr.as_deref());
    }

    if options.broadcast {
        panel.toggle_broadcast();
        if let Some(notice) = panel.broadcast_notice().content() {
            ui::print_notice(&notice);
        }
    }

    let (events_tx, mut events_rx) = mpsc::channel(256);
    let transport_task = tokio::spawn(transport::run(options.transfer, session, events_tx));

    let renderer = (!options.json).then(ProgressRenderer::new);
    let mut redraw = tokio::time::interval(Duration::from_millis(100));
    let mut was_transporting = false;
    let mut stopped = false;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some(raw) => panel.on_progress(raw),
                // transport finished or was stopped
                None => break,
            },
            _ = redraw.tick() => {
                let status = panel.sync();
                if status.transporting && !was_transporting {
                    ui::print_indicator(&panel.indicator());
                }
                was_transporting = status.transporting;

                if let Some(progress) = panel.progress() {
                    render(renderer.as_ref(), &progress)?;
                }
            }
            _ = &mut ctrl_c => {
                panel.stop_sharing();
                stopped = true;
                break;
            }
        }
    }

    transport_task.await.context("Transport task failed")?;

    if stopped {
        if let Some(renderer) = &renderer {
            renderer.abandon("Sharing stopped");
        }
        return Ok(());
    }

    // last frame before completion suppresses the bar
    if let Some(progress) = panel.progress() {
        render(renderer.as_ref(), &progress)?;
    }
    panel.sync();

    if let Some(renderer) = &renderer {
        renderer.finish(panel.status());
    }
    ui::print_indicator(&panel.indicator());
    Ok(())
}

fn render(renderer: Option<&ProgressRenderer>, progress: &DisplayProgress) -> Result<()> {
    match renderer {
        Some(renderer) => renderer.update(progress),
        None => println!("{}", serde_json::to_string(progress)?),
    }
    Ok(())
}
