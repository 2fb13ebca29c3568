//! Stock [`Greeter`] implementation.

use async_trait::async_trait;

use crate::traits::{Greeter, ServiceError};

/// The default greeter: appends `" world"` to the caller-supplied name.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelloGreeter;

#[async_trait]
impl Greeter for HelloGreeter {
    async fn greet(&self, name: &str) -> Result<String, ServiceError> {
        Ok(format!("{name} world"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greets_with_world_suffix() {
        let message = HelloGreeter.greet("Ada").await.unwrap();
        assert_eq!(message, "Ada world");
    }
}
