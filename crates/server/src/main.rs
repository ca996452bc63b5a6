use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use codeheist_engine::{spawn_sweeper, Catalog, EngineConfig, SessionStore};
use codeheist_server::{bind_address, router, AppState, PORT_ENV};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "codeheist")]
#[command(about = "Terminal puzzle game served over WebSocket", long_about = None)]
#[command(version)]
struct Cli {
    /// Listen address (default: 0.0.0.0:$PORT, PORT defaults to 8080)
    #[arg(long)]
    bind: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = EngineConfig::from_env();
    config.validate().context("Invalid engine configuration")?;
    log::debug!(
        "Session ttl {:?}, sweep interval {:?}",
        config.session_ttl,
        config.sweep_interval
    );

    let store = Arc::new(SessionStore::new(Catalog::builtin(), config));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(Arc::clone(&store), shutdown_rx);

    let bind = bind_address(cli.bind, env::var(PORT_ENV).ok());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    log::info!("CodeHeist server listening on http://{bind}");
    log::info!("WebSocket endpoint: ws://{bind}/ws");

    let app = router(AppState { store });
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    let _ = shutdown_tx.send(true);
    sweeper.await.context("Session sweeper task failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
