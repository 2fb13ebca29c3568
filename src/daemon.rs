//! Lifecycle coordination for the two endpoints.
//!
//! Startup order: bind the RPC endpoint (so its address is claimed and
//! the kernel queues connections), spawn its serve task, dial the
//! channel with retry, then bind and spawn the gateway. Either task
//! terminating tears the other down; a failed startup step stops
//! whatever was already running. There is no restart beyond that:
//! failures end the process and supervision is external.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::client;
use crate::error::{BifrostError, Result};
use crate::gateway::Gateway;
use crate::schema;
use crate::server::RpcEndpoint;
use crate::server::config::Config;
use crate::traits::Greeter;

/// Both endpoints, running.
#[derive(Debug)]
pub struct Daemon {
    rpc_addr: SocketAddr,
    http_addr: SocketAddr,
    stop: watch::Sender<bool>,
    rpc_task: JoinHandle<Result<()>>,
    gateway_task: JoinHandle<Result<()>>,
}

impl Daemon {
    /// Start both endpoints; returns once both are listening.
    pub async fn start<G: Greeter + 'static>(config: Config, greeter: Arc<G>) -> Result<Self> {
        let schema = schema::greeter()?;
        let (stop, stop_rx) = watch::channel(false);

        let endpoint = RpcEndpoint::bind(config.rpc_addr()?).await?;
        let rpc_addr = endpoint.local_addr();
        let rpc_task = tokio::spawn(endpoint.serve(greeter, stop_rx.clone()));

        // Dial the configured target, or loop back to the address we just
        // bound. Refused connections are retried with backoff so an
        // external target that is still starting does not kill us.
        let target = config
            .gateway
            .rpc_target
            .clone()
            .unwrap_or_else(|| format!("http://{rpc_addr}"));
        let startup = async {
            let channel = client::connect_with_retry(&target, &config.gateway.retry).await?;
            Gateway::bind(config.http_addr()?, &schema, channel, config.limits.clone()).await
        };
        let gateway = match startup.await {
            Ok(gateway) => gateway,
            Err(err) => {
                let _ = stop.send(true);
                let _ = rpc_task.await;
                return Err(err);
            }
        };
        let http_addr = gateway.local_addr();
        let gateway_task = tokio::spawn(gateway.serve(stop_rx));

        info!(rpc = %rpc_addr, http = %http_addr, "both endpoints up");
        Ok(Self {
            rpc_addr,
            http_addr,
            stop,
            rpc_task,
            gateway_task,
        })
    }

    /// Address the gRPC endpoint is listening on.
    pub fn rpc_addr(&self) -> SocketAddr {
        self.rpc_addr
    }

    /// Address the transcoding gateway is listening on.
    pub fn http_addr(&self) -> SocketAddr {
        self.http_addr
    }

    /// Signal both endpoints to shut down gracefully.
    pub fn shutdown(&self) {
        let _ = self.stop.send(true);
    }

    /// Run until Ctrl-C or either endpoint terminates.
    ///
    /// The first termination wins: the other endpoint is shut down and
    /// awaited, and the first error (if any) is returned.
    pub async fn run(mut self) -> Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                self.shutdown();
                self.wait().await
            }
            result = &mut self.rpc_task => {
                let _ = self.stop.send(true);
                let first = join_result("rpc endpoint", result);
                let second = join_result("gateway", self.gateway_task.await);
                first.and(second)
            }
            result = &mut self.gateway_task => {
                let _ = self.stop.send(true);
                let first = join_result("gateway", result);
                let second = join_result("rpc endpoint", self.rpc_task.await);
                first.and(second)
            }
        }
    }

    /// Wait for both endpoint tasks to finish (after [`shutdown`](Self::shutdown)).
    pub async fn wait(self) -> Result<()> {
        let (rpc, gateway) = tokio::join!(self.rpc_task, self.gateway_task);
        join_result("rpc endpoint", rpc).and(join_result("gateway", gateway))
    }
}

fn join_result(
    name: &str,
    result: std::result::Result<Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(BifrostError::Task(format!("{name} task aborted: {e}"))),
    }
}
