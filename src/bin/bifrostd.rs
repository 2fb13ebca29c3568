//! bifrostd — bifrost daemon.
//!
//! Serves the greeting service over gRPC and, through the transcoding
//! gateway, over HTTP/JSON, in one process.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bifrost::server::config::Config;
use bifrost::{Daemon, HelloGreeter};

/// Bifrost daemon — dual-protocol greeting service.
#[derive(Parser)]
#[command(name = "bifrostd")]
#[command(version = bifrost::PKG_VERSION)]
#[command(about = "gRPC + HTTP/JSON greeting daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// gRPC listen address (overrides config).
    #[arg(long, env = "BIFROST_RPC_ADDR")]
    rpc_addr: Option<String>,

    /// HTTP listen address (overrides config).
    #[arg(long, env = "BIFROST_HTTP_ADDR")]
    http_addr: Option<String>,

    /// RPC dial target for the gateway (overrides config).
    #[arg(long, env = "BIFROST_RPC_TARGET")]
    rpc_target: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(addr) = args.rpc_addr {
        config.rpc.address = addr;
    }
    if let Some(addr) = args.http_addr {
        config.http.address = addr;
    }
    if let Some(target) = args.rpc_target {
        config.gateway.rpc_target = Some(target);
    }

    info!(version = bifrost::version_string(), "bifrostd starting");

    let daemon = Daemon::start(config, Arc::new(HelloGreeter)).await?;
    if let Err(err) = daemon.run().await {
        error!(error = %err, "bifrostd exiting on error");
        return Err(err.into());
    }
    Ok(())
}
