//! Generic unary invocation over a shared channel.
//!
//! [`UnaryInvoker`] erases a method's request/response types behind a
//! JSON boundary so the gateway can drive any unary method from its
//! binding table alone. Internally it performs the same ready/unary
//! sequence tonic's generated clients perform, with the concrete
//! message types supplied once, at schema declaration time.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use http::uri::PathAndQuery;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tonic::Status;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::Channel;

/// Per-call state that travels with one RPC invocation.
///
/// Cancellation needs no explicit carrier: dropping the invocation
/// future resets the underlying HTTP/2 stream, which the server observes.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Deadline for the call, sent to the server as `grpc-timeout`.
    pub timeout: Option<Duration>,
}

type InvokeFuture = Pin<Box<dyn Future<Output = Result<Value, Status>> + Send>>;
type InvokeFn = dyn Fn(Channel, CallContext, Value) -> InvokeFuture + Send + Sync;

/// Type-erased unary call: JSON request value in, JSON response value out.
pub struct UnaryInvoker {
    f: Box<InvokeFn>,
}

impl UnaryInvoker {
    /// Build an invoker for the unary method at the given gRPC path.
    pub fn new<Req, Resp>(path: &'static str) -> Self
    where
        Req: prost::Message + DeserializeOwned + Default + Send + 'static,
        Resp: prost::Message + Serialize + Default + Send + 'static,
    {
        Self {
            f: Box::new(move |channel, ctx, json| {
                Box::pin(async move {
                    let message: Req = serde_json::from_value(json)
                        .map_err(|e| Status::invalid_argument(format!("invalid request: {e}")))?;

                    let mut grpc = Grpc::new(channel);
                    grpc.ready()
                        .await
                        .map_err(|e| Status::unavailable(format!("service not ready: {e}")))?;

                    let mut request = tonic::Request::new(message);
                    if let Some(timeout) = ctx.timeout {
                        request.set_timeout(timeout);
                    }

                    let codec: ProstCodec<Req, Resp> = ProstCodec::default();
                    let response = grpc
                        .unary(request, PathAndQuery::from_static(path), codec)
                        .await?;
                    serde_json::to_value(response.into_inner())
                        .map_err(|e| Status::internal(format!("encode response: {e}")))
                })
            }),
        }
    }

    /// Invoke the method over `channel`.
    pub async fn invoke(
        &self,
        channel: Channel,
        ctx: CallContext,
        request: Value,
    ) -> Result<Value, Status> {
        (self.f)(channel, ctx, request).await
    }
}

impl std::fmt::Debug for UnaryInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UnaryInvoker")
    }
}
