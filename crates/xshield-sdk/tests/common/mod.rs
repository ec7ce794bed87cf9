//! Shared fixtures for the SDK contract tests
//!
//! Every test talks to a local `wiremock` server; nothing leaves the machine.

#![allow(dead_code)]

use std::time::Duration;
use xshield_core::config::{BackoffStrategy, RetryConfig};
use xshield_core::{ClientConfig, Credentials, Security, StaticSecurity};
use xshield_sdk::{SdkConfiguration, XshieldSdk};

pub const API_KEY: &str = "test-api-key";
pub const POLICY_ID: &str = "policy-123";

pub const NAMED_NETWORKS_PATH: &str = "/api/tagbasedpolicies/policy-123/namednetworks";
pub const TEMPLATES_PATH: &str = "/api/tagbasedpolicies/policy-123/templates";

/// Address nothing listens on
pub const DEAD_SERVER: &str = "http://127.0.0.1:1";

/// Backoff policy with millisecond intervals for fast tests
pub fn fast_retry_config(max_elapsed: Duration) -> RetryConfig {
    RetryConfig::backoff(
        BackoffStrategy::new(
            Duration::from_millis(5),
            Duration::from_millis(20),
            1.5,
            max_elapsed,
        ),
        true,
    )
}

/// Client configuration pointing at `server_url` with fast retries
pub fn client_config(server_url: &str) -> ClientConfig {
    ClientConfig::new()
        .with_server_url(server_url)
        .with_retry_config(fast_retry_config(Duration::from_millis(200)))
}

/// SDK with a static API key
pub fn sdk(server_url: &str) -> XshieldSdk {
    sdk_with_security(server_url, Security::ConfigProvider(Credentials::new(API_KEY)))
}

/// SDK with the given static security object
pub fn sdk_with_security(server_url: &str, security: Security) -> XshieldSdk {
    let configuration = SdkConfiguration::new(client_config(server_url))
        .expect("valid configuration")
        .with_security(StaticSecurity(security));
    XshieldSdk::new(configuration)
}
