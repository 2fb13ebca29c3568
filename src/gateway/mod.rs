//! HTTP/JSON transcoding gateway.
//!
//! The gateway is purely mechanical: an axum server whose single
//! fallback handler drives the [`BindingTable`]. Per request it matches
//! verb + path against the table, merges path captures and JSON body
//! fields into the RPC request message, invokes the bound method over
//! the shared channel, and renders the response (or the mapped error)
//! as JSON. No method-specific logic lives here; adding a method only
//! touches the schema.

pub mod routing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tonic::{Code, Status};
use tonic::transport::Channel;
use tracing::{info, warn};

use crate::error::{BifrostError, Result};
use crate::schema::{CallContext, ServiceSchema};
use crate::server::config::LimitsConfig;
use crate::telemetry;
use routing::BindingTable;

/// Fixed mapping from gRPC status codes onto HTTP statuses.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            StatusCode::BAD_REQUEST
        }
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Request-scoped transcoding failure, rendered as an HTTP response.
///
/// These never escape the request that caused them.
#[derive(Debug)]
enum TranscodeError {
    RouteNotFound,
    Malformed(String),
    MissingField(&'static str),
    Rpc(Status),
}

impl TranscodeError {
    /// HTTP status plus the JSON error body `{code, message}`, where
    /// `code` is the numeric gRPC status code.
    fn into_parts(self) -> (StatusCode, Value) {
        let (status, code, message) = match self {
            TranscodeError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                Code::NotFound,
                "no route matched".to_string(),
            ),
            TranscodeError::Malformed(message) => {
                (StatusCode::BAD_REQUEST, Code::InvalidArgument, message)
            }
            TranscodeError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                Code::InvalidArgument,
                format!("missing required field {field:?}"),
            ),
            TranscodeError::Rpc(status) => (
                http_status(status.code()),
                status.code(),
                status.message().to_string(),
            ),
        };
        (status, json!({ "code": code as i32, "message": message }))
    }
}

/// Shared per-process gateway state.
struct GatewayState {
    table: BindingTable,
    channel: Channel,
    limits: LimitsConfig,
}

/// The transcoding gateway endpoint.
///
/// Owns the HTTP listener and a client handle to the RPC endpoint's
/// address, never an in-process reference, so the two endpoints can
/// run on separate hosts without code change.
pub struct Gateway {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<GatewayState>,
}

impl Gateway {
    /// Bind the HTTP listener and build the routing table.
    pub async fn bind(
        addr: SocketAddr,
        schema: &ServiceSchema,
        channel: Channel,
        limits: LimitsConfig,
    ) -> Result<Self> {
        let table = BindingTable::build(schema)?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| BifrostError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
            state: Arc::new(GatewayState { table, channel, limits }),
        })
    }

    /// The actually-bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `shutdown` flips to true.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(addr = %self.local_addr, routes = self.state.table.len(), "gateway listening");
        let app = Router::new().fallback(transcode).with_state(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await
            .map_err(BifrostError::Io)?;
        Ok(())
    }
}

/// Fallback handler: every request goes through the binding table.
async fn transcode(State(state): State<Arc<GatewayState>>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let result = transcode_inner(&state, request).await;
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS)
        .record(started.elapsed().as_secs_f64());

    match result {
        Ok(value) => {
            metrics::counter!(telemetry::HTTP_REQUESTS_TOTAL, "status" => "ok").increment(1);
            info!(method = %method, path = %path, "transcoded request");
            (StatusCode::OK, Json(value)).into_response()
        }
        Err(err) => {
            let (status, body) = err.into_parts();
            metrics::counter!(telemetry::HTTP_REQUESTS_TOTAL, "status" => "error").increment(1);
            warn!(method = %method, path = %path, status = status.as_u16(), "request failed");
            (status, Json(body)).into_response()
        }
    }
}

/// The mechanical pipeline: match, parse, merge, validate, invoke.
///
/// Strictly sequential within one request; concurrency across requests
/// comes from the server, with the multiplexed channel cloned per call.
async fn transcode_inner(
    state: &GatewayState,
    request: Request<Body>,
) -> std::result::Result<Value, TranscodeError> {
    let (parts, body) = request.into_parts();
    let (binding, captures) = state
        .table
        .lookup(&parts.method, parts.uri.path())
        .ok_or(TranscodeError::RouteNotFound)?;

    // Body first, then captures, so path placeholders win on conflict.
    let mut fields = Map::new();
    if binding.body.is_some() {
        let bytes = axum::body::to_bytes(body, state.limits.max_body_bytes)
            .await
            .map_err(|e| TranscodeError::Malformed(format!("read body: {e}")))?;
        if !bytes.is_empty() {
            let parsed: Value = serde_json::from_slice(&bytes)
                .map_err(|e| TranscodeError::Malformed(format!("invalid JSON body: {e}")))?;
            match parsed {
                Value::Object(map) => fields = map,
                _ => {
                    return Err(TranscodeError::Malformed(
                        "JSON body must be an object".to_string(),
                    ));
                }
            }
        }
    }
    for (name, value) in captures {
        fields.insert(name, Value::String(value));
    }

    // A required field must be present and, for strings, non-empty;
    // an empty path placeholder counts as absent.
    for &required in binding.descriptor.required {
        let missing = match fields.get(required) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            return Err(TranscodeError::MissingField(required));
        }
    }

    let timeout = Duration::from_secs(state.limits.request_timeout_secs);
    let ctx = CallContext {
        timeout: Some(timeout),
    };
    let call = binding
        .descriptor
        .invoker
        .invoke(state.channel.clone(), ctx, Value::Object(fields));
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(TranscodeError::Rpc),
        Err(_) => Err(TranscodeError::Rpc(Status::deadline_exceeded(
            "request timed out",
        ))),
    }
}
