//! Channel establishment for the gateway's RPC connection.
//!
//! The gateway owns one multiplexed [`Channel`] to the RPC endpoint,
//! created at startup and cloned per in-flight request. Startup dialing
//! retries with exponential backoff, so a gateway racing its endpoint's
//! bind (or pointed at an external endpoint that is still starting)
//! does not crash the process.

use std::time::Duration;

use serde::Deserialize;
use tonic::transport::{Channel, Endpoint};
use tracing::warn;

use crate::error::{BifrostError, Result};
use crate::telemetry;

/// Configuration for dial retry behaviour.
///
/// Uses exponential backoff: `initial_delay * 2^attempt`, capped at
/// `max_delay`.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial dial).
    /// 1 = no retry. Default: 5.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay before the first retry, in milliseconds. Default: 200.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between retries, in milliseconds. Default: 5000.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5000
}

impl RetryConfig {
    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = Duration::from_millis(self.initial_delay_ms)
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(Duration::from_millis(self.max_delay_ms))
    }
}

/// Dial `target` with bounded retry.
///
/// Every dial error during startup is treated as transient ("connection
/// refused" while the RPC endpoint races its own bind is expected); only
/// exhaustion of `max_attempts` is fatal.
pub async fn connect_with_retry(target: &str, retry: &RetryConfig) -> Result<Channel> {
    let endpoint = Endpoint::from_shared(target.to_string()).map_err(|e| BifrostError::Dial {
        target: target.to_string(),
        message: e.to_string(),
    })?;

    let mut last_err = None;
    for attempt in 0..retry.max_attempts {
        match endpoint.connect().await {
            Ok(channel) => return Ok(channel),
            Err(e) => {
                metrics::counter!(telemetry::DIAL_RETRIES_TOTAL).increment(1);
                if attempt + 1 < retry.max_attempts {
                    let delay = retry.delay_for_attempt(attempt);
                    warn!(
                        rpc_target = target,
                        attempt = attempt + 1,
                        max_attempts = retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "dial failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
        }
    }

    Err(BifrostError::Dial {
        target: target.to_string(),
        message: last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no dial attempts configured".to_string()),
    })
}
