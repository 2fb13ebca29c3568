//! Bifrost — one greeting service, two protocol front doors.
//!
//! A single process serves:
//! - a binary gRPC endpoint (`server`), and
//! - an HTTP/JSON gateway (`gateway`) that transcodes every request into
//!   a call against the gRPC endpoint over a real client channel.
//!
//! The gateway is driven entirely by the static service schema
//! (`schema`): verb + path-template bindings map HTTP requests onto RPC
//! methods, so the two surfaces cannot drift apart. The gateway talks to
//! the endpoint through a network address, never an in-process
//! reference, so the pair can be split across hosts without code change.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bifrost::server::config::Config;
//! use bifrost::{Daemon, HelloGreeter};
//!
//! #[tokio::main]
//! async fn main() -> bifrost::Result<()> {
//!     let daemon = Daemon::start(Config::default(), Arc::new(HelloGreeter)).await?;
//!     daemon.run().await
//! }
//! ```

pub mod client;
pub mod daemon;
pub mod error;
pub mod gateway;
mod greeter;
pub mod schema;
pub mod server;
pub mod telemetry;
pub mod traits;
mod version;

// Re-export main types at crate root
pub use daemon::Daemon;
pub use error::{BifrostError, Result};
pub use greeter::HelloGreeter;
pub use traits::{Greeter, ServiceError};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, version_string};
