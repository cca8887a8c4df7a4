//! Market feed service entrypoint
//!
//! Wires the venue adapters, ingestion pipeline, and HTTP/WS surface
//! together, then runs until SIGINT/SIGTERM. Shutdown is bounded: adapters
//! get a grace window to close their upstream connections, after which the
//! process exits regardless.

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use market_feed::config::{supported_pairs, Config};
use market_feed::pipeline;
use market_feed::router::{create_router, serve_until};
use market_feed::state::AppState;
use market_feed::venues::VenueSupervisor;
use market_feed::SERVICE_VERSION;

/// Buffered books between adapters and the pipeline consumer.
const PIPELINE_CHANNEL_CAPACITY: usize = 1_024;
/// Grace window for adapters to close their upstream connections.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let pairs = supported_pairs();
    info!(
        version = SERVICE_VERSION,
        port = config.port,
        pairs = pairs.len(),
        "starting market feed service"
    );

    let state = AppState::new(config.clone(), pairs.clone());

    let (tx, rx) = mpsc::channel(PIPELINE_CHANNEL_CAPACITY);
    tokio::spawn(pipeline::run(rx, state.clone()));

    let supervisor = VenueSupervisor::start(&pairs, &config, tx);

    let app = create_router(state);
    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!(addr = %listener.local_addr()?, "listening");

    let (close_tx, close_rx) = oneshot::channel();
    let server = tokio::spawn(async move {
        if let Err(err) = serve_until(listener, app, close_rx).await {
            error!(error = %err, "server exited");
        }
    });

    wait_for_signal().await;
    info!("shutdown requested, closing adapters and subscriber transport");

    // Adapters and the server wind down together inside the grace window.
    let _ = close_tx.send(());
    let graceful = async {
        supervisor.shutdown().await;
        let _ = server.await;
    };
    if tokio::time::timeout(SHUTDOWN_GRACE, graceful).await.is_err() {
        error!("shutdown did not complete within the grace window, exiting");
        std::process::exit(1);
    }

    info!("shutdown complete");
    Ok(())
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
