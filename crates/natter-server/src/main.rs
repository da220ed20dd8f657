//! natter-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus any
//! `NATTER_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use natter_server::ServerConfig;
use natter_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Natter chat server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.database_path))?
    .with_credential_scheme(cfg.credential_scheme);

  info!(scheme = ?store.credential_scheme(), "credential scheme selected");

  let app     = natter_server::app(Arc::new(store), &cfg);
  let address = cfg.address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = tokio::signal::ctrl_c();
  #[cfg(unix)]
  {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        tokio::select! {
          _ = ctrl_c => info!("received Ctrl+C, shutting down"),
          _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        }
      }
      Err(e) => {
        tracing::warn!("cannot install SIGTERM handler: {e}");
        ctrl_c.await.ok();
        info!("received Ctrl+C, shutting down");
      }
    }
  }
  #[cfg(not(unix))]
  {
    ctrl_c.await.ok();
    info!("received Ctrl+C, shutting down");
  }
}
