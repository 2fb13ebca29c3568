//! RPC listener lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use super::proto::greeter_server::GreeterServer;
use super::service::GreeterService;
use crate::error::{BifrostError, Result};
use crate::traits::Greeter;

/// The gRPC endpoint: a bound listener plus the service it will serve.
///
/// Binding is eager so address conflicts surface as
/// [`BifrostError::Bind`] before any task is spawned, and so the bound
/// address (meaningful with `:0` listeners) is known before the gateway
/// dials it. Once `bind` returns, the kernel is already queueing
/// connections; serving can start later without refusing dials.
pub struct RpcEndpoint {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl RpcEndpoint {
    /// Bind the listener.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| BifrostError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        Ok(Self { listener, local_addr })
    }

    /// The actually-bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve `greeter` until `shutdown` flips to true.
    ///
    /// Each inbound call is handled concurrently by the tonic server;
    /// handlers share nothing but the `greeter` itself.
    pub async fn serve<G: Greeter + 'static>(
        self,
        greeter: Arc<G>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        info!(addr = %self.local_addr, "rpc endpoint listening");
        let service = GreeterServer::new(GreeterService::new(greeter));
        Server::builder()
            .add_service(service)
            .serve_with_incoming_shutdown(TcpListenerStream::new(self.listener), async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await?;
        Ok(())
    }
}
