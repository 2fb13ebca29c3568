//! Static service schema: method descriptors and their HTTP bindings.
//!
//! The schema plays the role generated gateway code would otherwise
//! play: a declarative description of each method (name, gRPC path,
//! required request fields, HTTP bindings, typed invoker) built once at
//! startup, never mutated, and shared read-only by both endpoints.
//! Adding a method means adding a descriptor here; the transcoding
//! gateway itself never changes.

pub mod binding;
pub mod invoker;

pub use binding::{HttpRule, PathTemplate};
pub use invoker::{CallContext, UnaryInvoker};

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{BifrostError, Result};
use crate::server::proto;

/// Descriptor for one unary RPC method.
#[derive(Debug)]
pub struct MethodDescriptor {
    /// Short method name, unique within the schema.
    pub name: &'static str,
    /// Full gRPC request path, e.g. `/greeter.v1.Greeter/Greet`.
    pub path: &'static str,
    /// Request fields that must be present and non-empty after the
    /// gateway merges path and body sources.
    pub required: &'static [&'static str],
    /// HTTP bindings onto this method.
    pub rules: Vec<HttpRule>,
    /// Type-erased unary call used by the gateway.
    pub invoker: UnaryInvoker,
}

impl MethodDescriptor {
    /// Describe a unary method with request type `Req` and response `Resp`.
    pub fn unary<Req, Resp>(name: &'static str, path: &'static str) -> Self
    where
        Req: prost::Message + serde::de::DeserializeOwned + Default + Send + 'static,
        Resp: prost::Message + serde::Serialize + Default + Send + 'static,
    {
        Self {
            name,
            path,
            required: &[],
            rules: Vec::new(),
            invoker: UnaryInvoker::new::<Req, Resp>(path),
        }
    }

    /// Mark request fields as required.
    pub fn required(mut self, fields: &'static [&'static str]) -> Self {
        self.required = fields;
        self
    }

    /// Attach an HTTP binding.
    pub fn http(mut self, rule: HttpRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Immutable set of method descriptors, shared by both endpoints.
#[derive(Debug)]
pub struct ServiceSchema {
    methods: Vec<Arc<MethodDescriptor>>,
}

impl ServiceSchema {
    /// Build a schema from descriptors, rejecting duplicate method names.
    pub fn new(methods: Vec<MethodDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for method in &methods {
            if !seen.insert(method.name) {
                return Err(BifrostError::Schema(format!(
                    "duplicate method name: {}",
                    method.name
                )));
            }
        }
        Ok(Self {
            methods: methods.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }
}

/// Schema for the `greeter.v1.Greeter` service.
///
/// `Greet` is reachable two ways: `GET /v1/greet/{name}`, where the
/// placeholder populates `name`, and `POST /v1/greet`, where the JSON
/// body maps onto the whole request message.
pub fn greeter() -> Result<ServiceSchema> {
    ServiceSchema::new(vec![
        MethodDescriptor::unary::<proto::GreetRequest, proto::GreetReply>(
            "Greet",
            "/greeter.v1.Greeter/Greet",
        )
        .required(&["name"])
        .http(HttpRule::get("/v1/greet/{name}"))
        .http(HttpRule::post("/v1/greet").body("*")),
    ])
}
