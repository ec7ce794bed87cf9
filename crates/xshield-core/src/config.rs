//! Configuration types for the Xshield provider
//!
//! This module defines the client configuration shared by every API call:
//! the server URL template, user agent, global timeout and global retry
//! policy. A `ClientConfig` is built once and then only read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default API server
pub const DEFAULT_SERVER_URL: &str = "https://ng.colortokens.com";

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("xshield-sdk/", env!("CARGO_PKG_VERSION"));

/// Process-wide fallback retry policy
///
/// Used when neither the call nor the client configuration carries a
/// retry policy. Operation methods borrow it; they never rebuild it.
pub static DEFAULT_RETRY_CONFIG: RetryConfig = RetryConfig {
    strategy: RetryStrategy::Backoff(BackoffStrategy {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_millis(60_000),
        exponent: 1.5,
        max_elapsed_time: Duration::from_millis(3_600_000),
    }),
    retry_connection_errors: true,
};

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server URL template and its parameters
    #[serde(default)]
    pub server: ServerDetails,

    /// User agent identifying this client
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Global timeout applied to every call (milliseconds when serialized)
    #[serde(default, with = "duration_ms::option")]
    pub timeout: Option<Duration>,

    /// Global retry policy
    #[serde(default)]
    pub retry_config: Option<RetryConfig>,
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            server: ServerDetails::default(),
            user_agent: default_user_agent(),
            timeout: None,
            retry_config: None,
        }
    }

    /// Set the server URL (a template; see [`ServerDetails`])
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server = ServerDetails::new(url);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the global timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the global retry policy
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        let url = self.server.resolve()?;
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Server URL must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }

        if self.user_agent.is_empty() {
            return Err(crate::Error::config("User agent cannot be empty"));
        }

        if self.timeout == Some(Duration::ZERO) {
            return Err(crate::Error::config("Timeout must be > 0"));
        }

        if let Some(ref retry) = self.retry_config {
            retry.validate()?;
        }

        Ok(())
    }

    /// The retry policy for a call, given an optional per-call override
    pub fn effective_retry_config<'a>(&'a self, per_call: Option<&'a RetryConfig>) -> &'a RetryConfig {
        per_call
            .or(self.retry_config.as_ref())
            .unwrap_or(&DEFAULT_RETRY_CONFIG)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Server URL template with substitutable parameters
///
/// `{name}` placeholders in `url` are replaced from `variables`:
///
/// ```
/// use xshield_core::config::ServerDetails;
///
/// let server = ServerDetails::new("https://{hostname}/v1").with_variable("hostname", "api.example.com");
/// assert_eq!(server.resolve().unwrap(), "https://api.example.com/v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDetails {
    /// URL template
    pub url: String,

    /// Values for the template's placeholders
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl ServerDetails {
    /// Create server details without parameters
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            variables: BTreeMap::new(),
        }
    }

    /// Add a template parameter
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Substitute every placeholder and return the concrete base URL
    pub fn resolve(&self) -> Result<String, crate::Error> {
        let mut out = String::with_capacity(self.url.len());
        let mut rest = self.url.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                crate::Error::config(format!("Unclosed placeholder in server URL: {}", self.url))
            })?;
            let name = &after[..end];
            let value = self.variables.get(name).ok_or_else(|| {
                crate::Error::config(format!(
                    "No value for server URL parameter '{}' in {}",
                    name, self.url
                ))
            })?;
            out.push_str(value);
            rest = &after[end + 1..];
        }

        if rest.contains('}') {
            return Err(crate::Error::config(format!(
                "Unbalanced '}}' in server URL: {}",
                self.url
            )));
        }
        out.push_str(rest);

        Ok(out.trim_end_matches('/').to_string())
    }
}

impl Default for ServerDetails {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

/// Retry policy for a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retry timing strategy
    #[serde(flatten)]
    pub strategy: RetryStrategy,

    /// Whether connection-level errors (no status received) are retried
    #[serde(default)]
    pub retry_connection_errors: bool,
}

impl RetryConfig {
    /// Exponential backoff policy
    pub fn backoff(backoff: BackoffStrategy, retry_connection_errors: bool) -> Self {
        Self {
            strategy: RetryStrategy::Backoff(backoff),
            retry_connection_errors,
        }
    }

    /// Single attempt, never retry
    pub fn disabled() -> Self {
        Self {
            strategy: RetryStrategy::None,
            retry_connection_errors: false,
        }
    }

    /// Validate the retry policy
    pub fn validate(&self) -> Result<(), crate::Error> {
        match &self.strategy {
            RetryStrategy::Backoff(b) => b.validate(),
            RetryStrategy::None => Ok(()),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        DEFAULT_RETRY_CONFIG.clone()
    }
}

/// Retry timing strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RetryStrategy {
    /// Exponential backoff
    Backoff(BackoffStrategy),

    /// No retries
    None,
}

/// Exponential backoff parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffStrategy {
    /// Wait before the first retry (milliseconds when serialized)
    #[serde(with = "duration_ms")]
    pub initial_interval: Duration,

    /// Upper bound for a single wait (milliseconds when serialized)
    #[serde(with = "duration_ms")]
    pub max_interval: Duration,

    /// Growth factor applied after each attempt
    pub exponent: f64,

    /// Total time budget measured from the first attempt (milliseconds when serialized)
    #[serde(with = "duration_ms")]
    pub max_elapsed_time: Duration,
}

impl BackoffStrategy {
    /// Create a backoff strategy
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        exponent: f64,
        max_elapsed_time: Duration,
    ) -> Self {
        Self {
            initial_interval,
            max_interval,
            exponent,
            max_elapsed_time,
        }
    }

    /// Validate the strategy
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.exponent.is_finite() || self.exponent < 1.0 {
            return Err(crate::Error::config(format!(
                "Backoff exponent must be a finite number >= 1.0. Got: {}",
                self.exponent
            )));
        }
        if self.max_interval < self.initial_interval {
            return Err(crate::Error::config(
                "Backoff max_interval must be >= initial_interval",
            ));
        }
        Ok(())
    }

    /// Wait before retry number `attempt` (0-based)
    ///
    /// `min(initial_interval * exponent^attempt, max_interval)`, no jitter.
    pub fn interval(&self, attempt: u32) -> Duration {
        let base = self.initial_interval.as_secs_f64() * self.exponent.powi(attempt as i32);
        let cap = self.max_interval.as_secs_f64();
        if !base.is_finite() || base >= cap {
            return self.max_interval;
        }
        Duration::try_from_secs_f64(base.max(0.0)).unwrap_or(self.max_interval)
    }
}

/// Serde helpers: `Duration` as integer milliseconds
pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => s.serialize_some(&(d.as_millis() as u64)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
            Option::<u64>::deserialize(d).map(|ms| ms.map(Duration::from_millis))
        }
    }
}
