//! media-gate - serves uploaded media behind per-asset visibility rules
//!
//! Loads the TOML config, regenerates the rewrite block once so it matches
//! the store, then serves the gated endpoint until ctrl-c.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use service::config::DEFAULT_CONFIG_FILE;
use service::{Config, ServiceState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file [default: ./media-gate.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on for HTTP requests
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Directory asset storage paths are relative to
    #[arg(short, long)]
    uploads: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Config::load(&default_path)?
            } else {
                Config::default()
            }
        }
    };

    if let Some(port) = args.port {
        config.listen_port = port;
    }
    if let Some(db_path) = &args.database {
        config.sqlite_path = Some(db_path.clone());
    }
    if let Some(uploads) = &args.uploads {
        config.uploads_dir = uploads.clone();
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.log_level().into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    tracing::info!(
        site = %config.site_url,
        uploads = %config.uploads_dir.display(),
        "Starting media gate"
    );

    let state = match ServiceState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create service state: {}", e);
            std::process::exit(1);
        }
    };

    // bring the rewrite block in line with the store before serving
    if let Some(rules) = state.gate().regenerate_rules().await {
        tracing::info!(rules = rules.len(), "rewrite rules regenerated at startup");
    }

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                // keep the sender alive so the server is not shut down
                tracing::error!("failed to listen for ctrl+c: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    service::http::run(state, shutdown_rx).await?;

    tracing::info!("media gate shutdown complete");
    Ok(())
}
