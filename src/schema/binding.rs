//! HTTP binding rules and path templates.

use std::collections::HashSet;

use http::Method;

/// One HTTP binding for an RPC method: verb + path template + body spec.
///
/// Templates are plain strings here; they are parsed (and validated)
/// when the gateway builds its [`BindingTable`](crate::gateway::routing::BindingTable).
#[derive(Debug, Clone)]
pub struct HttpRule {
    pub method: Method,
    pub template: &'static str,
    /// JSON body mapping: `None` for no body, `Some("*")` to map the
    /// whole request message. Per-field body mapping is not needed yet.
    pub body: Option<&'static str>,
}

impl HttpRule {
    pub fn get(template: &'static str) -> Self {
        Self {
            method: Method::GET,
            template,
            body: None,
        }
    }

    pub fn post(template: &'static str) -> Self {
        Self {
            method: Method::POST,
            template,
            body: None,
        }
    }

    pub fn put(template: &'static str) -> Self {
        Self {
            method: Method::PUT,
            template,
            body: None,
        }
    }

    pub fn delete(template: &'static str) -> Self {
        Self {
            method: Method::DELETE,
            template,
            body: None,
        }
    }

    /// Declare a JSON body mapping (`"*"` maps onto the whole message).
    pub fn body(mut self, spec: &'static str) -> Self {
        self.body = Some(spec);
        self
    }
}

/// Parsed path template: literal segments and `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

impl PathTemplate {
    /// Parse a template like `/v1/greet/{name}`.
    ///
    /// Rejects templates without a leading slash, malformed braces,
    /// empty placeholder names, and duplicate placeholder names.
    pub fn parse(template: &str) -> Result<Self, String> {
        let Some(rest) = template.strip_prefix('/') else {
            return Err(format!("template {template:?} must start with '/'"));
        };

        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        for part in rest.split('/') {
            if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                if name.is_empty() {
                    return Err(format!("empty placeholder in template {template:?}"));
                }
                if !seen.insert(name.to_string()) {
                    return Err(format!(
                        "duplicate placeholder {name:?} in template {template:?}"
                    ));
                }
                segments.push(Segment::Placeholder(name.to_string()));
            } else if part.contains('{') || part.contains('}') {
                return Err(format!("malformed segment {part:?} in template {template:?}"));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }
        Ok(Self { segments })
    }

    /// Match a concrete request path, returning captured placeholder values.
    ///
    /// A placeholder matches exactly one segment, including the empty
    /// one: `/v1/greet/` captures `name = ""` against `/v1/greet/{name}`,
    /// leaving it to required-field validation to reject the request.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captures = Vec::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Placeholder(name) => {
                    captures.push((name.clone(), (*part).to_string()));
                }
            }
        }
        Some(captures)
    }

    /// Whether two templates are indistinguishable for routing: same
    /// length, positionally literal-equal or both placeholders. Two
    /// same-shape templates under one verb would make registration order
    /// the only thing separating them, so the table rejects that.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Placeholder(_), Segment::Placeholder(_)) => true,
                    _ => false,
                })
    }
}
