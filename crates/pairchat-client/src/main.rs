//! pairchat — point-to-point tagged messaging over one WebSocket.
//!
//! One side listens, the other dials; after the handshake both run the same
//! duplex session: typed lines go out tagged with this device's ID and the
//! send time, inbound frames are decoded and printed. Ctrl-C (or EOF on
//! stdin) closes the session gracefully. Single-shot by design: when the
//! connection ends, so does the program.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use pairchat_client::{config, display, input, ws};
use pairchat_core::{logging, DeviceId};
use pairchat_session::queue::DEFAULT_QUEUE_CAPACITY;
use pairchat_session::{CloseReason, OutboundQueue, PeerReceiver, PeerSender, Session};

#[derive(Parser)]
#[command(version, about = "Point-to-point chat with sender+time message tags")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the JSON config holding this device's ID.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Dial the peer at HOST:PORT.
    Connect {
        /// Peer address, e.g. 192.168.1.20:8080.
        addr: String,
    },
    /// Wait for the one peer to dial in.
    Listen {
        /// Port to listen on; 0 lets the system choose.
        #[arg(default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_subscriber(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let device = config::load_device_id(&cli.config)
        .context("device identity is required before connecting")?;
    info!(%device, "device id loaded");

    match cli.command {
        Command::Connect { addr } => {
            let (sender, receiver) = ws::connect(&addr).await?;
            run_session(sender, receiver, device).await
        }
        Command::Listen { port } => {
            let listener = ws::PeerListener::bind(port).await?;
            info!(addr = %listener.local_addr()?, "waiting for a peer");
            let (sender, receiver) = listener.accept_one().await?;
            run_session(sender, receiver, device).await
        }
    }
}

/// Wire up queue, input, signal handling, and drive the session to `Closed`.
async fn run_session(
    sender: impl PeerSender + 'static,
    receiver: impl PeerReceiver + 'static,
    device: DeviceId,
) -> anyhow::Result<()> {
    println!("connected — type your message and hit return to send (ctrl-c to quit)");

    let (producer, queue) = OutboundQueue::bounded(DEFAULT_QUEUE_CAPACITY);
    let session = Session::start(sender, receiver, queue, display::TerminalSink);

    let input_task = tokio::spawn(input::read_lines(producer, device));

    let interrupt_handle = session.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt");
            interrupt_handle.stop();
        }
    });

    let report = session.run().await;
    input_task.abort();

    for message in &report.undelivered {
        warn!(text = %message.text, "message was never delivered");
    }

    match report.reason {
        CloseReason::LocalStop => {
            info!("session closed");
            Ok(())
        }
        CloseReason::PeerClosed => {
            info!("peer ended the session");
            Ok(())
        }
        CloseReason::TransportError(detail) => {
            anyhow::bail!("connection failed: {detail}")
        }
    }
}
