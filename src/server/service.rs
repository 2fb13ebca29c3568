//! gRPC service adapter.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::info;

use super::proto;
use super::proto::greeter_server;
use crate::telemetry;
use crate::traits::Greeter;

/// gRPC service that adapts a [`Greeter`] implementation to the wire.
///
/// Method lookup and payload decoding happen in the generated dispatch
/// before this type is reached; unknown methods surface as
/// `Unimplemented` and malformed payloads as decode errors without any
/// handler running.
pub struct GreeterService<G> {
    greeter: Arc<G>,
}

impl<G: Greeter> GreeterService<G> {
    /// Create a new service wrapping the given greeter.
    pub fn new(greeter: Arc<G>) -> Self {
        Self { greeter }
    }

    async fn handle_greet(&self, req: proto::GreetRequest) -> Result<proto::GreetReply, Status> {
        if req.name.is_empty() {
            return Err(Status::invalid_argument("name is required"));
        }
        let message = self.greeter.greet(&req.name).await?;
        Ok(proto::GreetReply { message })
    }
}

#[tonic::async_trait]
impl<G: Greeter + 'static> greeter_server::Greeter for GreeterService<G> {
    async fn greet(
        &self,
        request: Request<proto::GreetRequest>,
    ) -> Result<Response<proto::GreetReply>, Status> {
        let req = request.into_inner();
        info!(method = "Greet", name = %req.name, "rpc call");

        let result = self.handle_greet(req).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::RPC_CALLS_TOTAL, "method" => "Greet", "status" => status)
            .increment(1);
        result.map(Response::new)
    }
}

#[cfg(test)]
mod tests {
    use super::greeter_server::Greeter as _;
    use super::*;
    use crate::HelloGreeter;

    #[tokio::test]
    async fn empty_name_is_invalid_argument() {
        let service = GreeterService::new(Arc::new(HelloGreeter));
        let status = service
            .greet(Request::new(proto::GreetRequest { name: String::new() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn greet_returns_reply() {
        let service = GreeterService::new(Arc::new(HelloGreeter));
        let reply = service
            .greet(Request::new(proto::GreetRequest {
                name: "Ada".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(reply.message, "Ada world");
    }
}
