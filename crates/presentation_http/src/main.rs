//! FaceGen HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{io, time::Duration};

use anyhow::Context;
use infrastructure::{
    AppConfig, DEFAULT_LOG_FILTER, FsArtifactStore, LogFormat, ServerConfig, init_logging,
};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = AppConfig::load();

    // Initialize tracing
    let format = loaded
        .as_ref()
        .map_or(LogFormat::Text, |c| LogFormat::from_config(&c.server.log_format));
    init_logging(format, DEFAULT_LOG_FILTER).context("Failed to initialize logging")?;

    info!("FaceGen v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = loaded.context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        host = %config.server.host,
        port = %config.server.port,
        tts_command = %config.speech.command,
        wav2lip = %config.lip_sync.install_dir.display(),
        "Configuration loaded"
    );

    // Artifact directories must exist before the first request
    FsArtifactStore::new(config.storage.clone())
        .ensure_directories()
        .await
        .context("Failed to create artifact directories")?;
    info!("Artifact directories ready");

    let state = AppState::from_config(config.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize services: {e}"))?;

    // Build router
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Start server
    let listener = bind(&config.server).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal(shutdown_timeout).await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    if drain_with_deadline(server, signalled_rx, shutdown_timeout).await? {
        info!("Server shutdown complete");
    } else {
        warn!(
            timeout_secs = shutdown_timeout.as_secs(),
            "In-flight requests did not finish in time, aborting them"
        );
    }

    Ok(())
}

/// Bind the configured port, moving on to the next ones while they are taken
async fn bind(server: &ServerConfig) -> anyhow::Result<TcpListener> {
    for port in server.candidate_ports() {
        let addr = server.address(port);
        match TcpListener::bind(&addr).await {
            Ok(listener) => {
                if port != server.port {
                    warn!(requested = server.port, port, "Configured port busy, using fallback");
                }
                return Ok(listener);
            },
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                warn!(addr = %addr, "Port already in use");
            },
            Err(e) => return Err(e).with_context(|| format!("Failed to bind {addr}")),
        }
    }
    anyhow::bail!(
        "No free port among {} starting at {}",
        u32::from(server.port_fallback_attempts) + 1,
        server.port
    )
}

/// Run `server` to completion, giving it at most `timeout` once `signalled` fires
///
/// Returns `false` when the deadline cut the drain short.
async fn drain_with_deadline<F>(
    server: F,
    signalled: oneshot::Receiver<()>,
    timeout: Duration,
) -> io::Result<bool>
where
    F: Future<Output = io::Result<()>>,
{
    let deadline = async move {
        // A dropped sender means the server stopped without a signal
        if signalled.await.is_ok() {
            tokio::time::sleep(timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result.map(|()| true),
        () = deadline => Ok(false),
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for in-flight requests to finish...", timeout);
}
