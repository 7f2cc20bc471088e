use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use teller::{backend::JsonStore, server::{router, ServerConfig}, Ledger};

#[derive(Parser, Debug)]
#[clap(version, about = "Teller gateway: serves the account ledger over HTTP")]
struct Args {
    /// Path to the TOML configuration file
    #[clap(short, long, value_parser, default_value = "resources/server.toml")]
    config: PathBuf,

    /// Address to listen on, overriding the configuration
    #[clap(short, long, value_parser)]
    listen: Option<SocketAddr>,
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = if args.config.exists() {
        ServerConfig::read(&args.config)?
    } else {
        warn!("no config at {}, using defaults", args.config.display());
        ServerConfig::default()
    };
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    let store = JsonStore::open(&config.storage.path)
        .with_context(|| format!("failed to open store {}", config.storage.path.display()))?;
    let ledger = Arc::new(Ledger::new(store));
    let app = router(ledger, config.request_timeout());

    let listener = tokio::net::TcpListener::bind(config.listen).await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("teller gateway listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
