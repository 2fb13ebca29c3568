//! Binding table: verb + path template onto a method descriptor.
//!
//! Intentionally a flat table scanned in registration order; schemas
//! are small and the tie-break stays obvious. This makes it easy to
//! replace with a trie later.

use std::sync::Arc;

use http::Method;

use crate::error::{BifrostError, Result};
use crate::schema::binding::PathTemplate;
use crate::schema::{MethodDescriptor, ServiceSchema};

/// One entry in the table: a parsed rule bound to its method.
#[derive(Debug)]
pub struct Binding {
    pub method: Method,
    pub template: PathTemplate,
    /// Raw template string, kept for logs and error messages.
    pub route: &'static str,
    pub body: Option<&'static str>,
    pub descriptor: Arc<MethodDescriptor>,
}

/// Flat routing table built once from the service schema.
///
/// Lookup scans bindings in registration order and the first match wins.
/// Overlapping templates (a literal where another rule has a
/// placeholder) are legal under that tie-break; two bindings with the
/// same verb and the same template *shape* would be distinguishable only
/// by registration order, so that collision is rejected at build time.
#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    /// Build the table from a schema.
    pub fn build(schema: &ServiceSchema) -> Result<Self> {
        let mut bindings: Vec<Binding> = Vec::new();
        for descriptor in schema.methods() {
            for rule in &descriptor.rules {
                let template = PathTemplate::parse(rule.template).map_err(BifrostError::Schema)?;
                if let Some(existing) = bindings
                    .iter()
                    .find(|b| b.method == rule.method && b.template.same_shape(&template))
                {
                    return Err(BifrostError::Schema(format!(
                        "ambiguous binding: {} {} collides with {} {}",
                        rule.method, rule.template, existing.method, existing.route
                    )));
                }
                bindings.push(Binding {
                    method: rule.method.clone(),
                    template,
                    route: rule.template,
                    body: rule.body,
                    descriptor: Arc::clone(descriptor),
                });
            }
        }
        Ok(Self { bindings })
    }

    /// Find the first binding matching `method` + `path`, with the
    /// captured placeholder values.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(&Binding, Vec<(String, String)>)> {
        self.bindings.iter().find_map(|binding| {
            if binding.method != *method {
                return None;
            }
            binding
                .template
                .matches(path)
                .map(|captures| (binding, captures))
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
