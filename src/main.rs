mod api;
mod config;
mod error;
mod history;
mod models;
mod parser;
mod payment;
mod qr;
mod rpc;
mod session;
mod units;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use crate::rpc::HttpRpc;
use crate::session::Session;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Raaskoin wallet service starting...");

    // Load configuration
    let cfg = config::load()?;
    info!("Loaded config:");
    info!(
        "  Wallet RPC: {}",
        cfg.wallet_rpc_url.as_deref().unwrap_or("<none>")
    );
    info!("  Fallback RPC: {}", cfg.rpc_url);
    info!("  Contract: {}", cfg.contract_address);
    info!("  Explorer: {}", cfg.explorer_url);
    info!("  Port: {}", cfg.port);

    // The wallet endpoint doubles as the provider when present; otherwise
    // the plain RPC URL serves reads and connect() reports NoWalletDetected.
    let wallet_capable = cfg.wallet_rpc_url.is_some();
    let endpoint = cfg
        .wallet_rpc_url
        .clone()
        .unwrap_or_else(|| cfg.rpc_url.clone());
    let provider = Arc::new(HttpRpc::new(endpoint)?);

    let session = Arc::new(Session::new(provider, wallet_capable, &cfg));

    // Spawn API task
    let api_handle = tokio::spawn({
        let session = Arc::clone(&session);
        let port = cfg.port;
        async move { api::serve(port, session).await }
    });

    // Graceful shutdown
    tokio::select! {
        res = api_handle => match res {
            Ok(Ok(_)) => info!("API exited cleanly"),
            Ok(Err(e)) => error!("API error: {:?}", e),
            Err(e) => error!("API task panicked: {:?}", e),
        },
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    info!("Raaskoin wallet service stopped.");
    Ok(())
}
