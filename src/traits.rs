//! Core Greeter trait and application error type

use async_trait::async_trait;

/// Application-level failure reported by a [`Greeter`] implementation.
///
/// Each variant chooses the gRPC status code it surfaces as; the gateway
/// maps that code onto an HTTP status in turn, so an implementation
/// controls its error presentation on both protocol surfaces from here.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for tonic::Status {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::NotFound(_) => tonic::Status::not_found(message),
            ServiceError::InvalidArgument(_) => tonic::Status::invalid_argument(message),
            ServiceError::PermissionDenied(_) => tonic::Status::permission_denied(message),
            ServiceError::Internal(_) => tonic::Status::internal(message),
        }
    }
}

/// The application service both endpoints expose.
///
/// Implementations are called concurrently from many in-flight requests;
/// any mutable state is theirs to synchronize.
#[async_trait]
pub trait Greeter: Send + Sync {
    /// Produce the greeting for `name`.
    async fn greet(&self, name: &str) -> std::result::Result<String, ServiceError>;
}
