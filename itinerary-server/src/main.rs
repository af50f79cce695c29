//! Server entry point.
//!
//! Loads the timetable snapshot, then serves the HTTP API. Exit codes:
//! 0 success, 1 argument error, 2 data load error, 3 internal error.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use itinerary_server::graph::TransferPolicy;
use itinerary_server::planner::SearchConfig;
use itinerary_server::snapshot::Snapshot;
use itinerary_server::web::{create_router, AppState};

#[derive(Parser, Debug)]
#[command(
    name = "itinerary-server",
    about = "Itinerary planner over a static railway timetable"
)]
struct Args {
    /// Path to the schedule JSON document.
    #[arg(long)]
    schedule: PathBuf,

    /// Optional prebuilt graph document; the graph is built from the
    /// schedule when absent.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Minimum connection time for generated transfer edges (minutes).
    #[arg(long, default_value_t = 15)]
    min_connect: u16,

    /// Maximum wait for generated transfer edges (minutes).
    #[arg(long, default_value_t = 90)]
    max_wait: u16,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// Per-request wall-clock timeout (seconds).
    #[arg(long, default_value_t = 30)]
    request_timeout: u64,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let wants_exit_zero =
                matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
            let _ = e.print();
            return if wants_exit_zero {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            };
        }
    };

    init_tracing();

    let policy = TransferPolicy {
        min_connect: args.min_connect,
        max_wait: args.max_wait,
    };
    let snapshot = match Snapshot::load(&args.schedule, args.graph.as_deref(), policy) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("failed to load data: {e}");
            return ExitCode::from(2);
        }
    };

    let config = SearchConfig {
        request_timeout_secs: args.request_timeout,
        ..SearchConfig::default()
    };

    match serve(args.addr, AppState::new(snapshot, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::from(3)
        }
    }
}

#[tokio::main]
async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
