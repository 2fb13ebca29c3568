//! Telemetry metric name constants.
//!
//! Centralised metric names for bifrost operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `bifrost_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method` — RPC method name (e.g. "Greet")
//! - `status` — outcome: "ok" or "error"

/// Total HTTP requests handled by the transcoding gateway.
///
/// Labels: `status` ("ok" | "error").
pub const HTTP_REQUESTS_TOTAL: &str = "bifrost_http_requests_total";

/// Gateway request duration in seconds, transcoding included.
pub const REQUEST_DURATION_SECONDS: &str = "bifrost_request_duration_seconds";

/// Total calls served by the gRPC endpoint.
///
/// Labels: `method`, `status` ("ok" | "error").
pub const RPC_CALLS_TOTAL: &str = "bifrost_rpc_calls_total";

/// Total failed dial attempts against the RPC endpoint.
pub const DIAL_RETRIES_TOTAL: &str = "bifrost_dial_retries_total";
