//! Bifrost error types

use std::net::SocketAddr;

/// Bifrost error types.
///
/// Only process-scoped failures live here. Request-scoped failures are
/// converted to a response at the boundary where they are detected: the
/// gateway renders them as HTTP responses, the RPC endpoint as
/// [`tonic::Status`]. Neither path terminates other in-flight requests.
#[derive(Debug, thiserror::Error)]
pub enum BifrostError {
    /// A listener could not claim its address. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The gateway could not reach the RPC endpoint after bounded retries.
    #[error("failed to dial {target}: {message}")]
    Dial { target: String, message: String },

    /// Invalid or ambiguous service schema / binding table.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure while serving the RPC endpoint.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An endpoint task ended unexpectedly (panic or abort).
    #[error("endpoint task failed: {0}")]
    Task(String),
}

/// Result type alias for bifrost operations
pub type Result<T> = std::result::Result<T, BifrostError>;
