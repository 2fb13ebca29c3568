//! gRPC endpoint: generated proto types, service adapter, listener.
//!
//! This module provides:
//! - Generated protobuf types (`proto`) used by both endpoints
//! - The gRPC service adapter over a [`Greeter`](crate::traits::Greeter)
//!   implementation (`service`)
//! - The endpoint listener lifecycle (`endpoint`)
//! - Daemon configuration (`config`)

pub mod config;
pub mod endpoint;
pub mod service;

/// Re-exported generated proto types.
pub mod proto {
    tonic::include_proto!("greeter.v1");
}

pub use endpoint::RpcEndpoint;
pub use service::GreeterService;
