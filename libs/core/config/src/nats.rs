use crate::{ConfigError, FromEnv, env_or_default};
use std::time::Duration;

/// NATS broker configuration.
///
/// `request_timeout` bounds every request/reply round trip issued by the
/// gateway; a broker call must never hang an HTTP request indefinitely.
#[derive(Clone, Debug)]
pub struct NatsConfig {
    pub url: String,
    pub request_timeout: Duration,
}

impl NatsConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl FromEnv for NatsConfig {
    /// Reads from environment variables:
    /// - NATS_URL: defaults to nats://localhost:4222
    /// - NATS_REQUEST_TIMEOUT_MS: defaults to 5000
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("NATS_URL", "nats://localhost:4222");
        let timeout_ms: u64 = env_or_default("NATS_REQUEST_TIMEOUT_MS", "5000")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "NATS_REQUEST_TIMEOUT_MS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            url,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
