// # Security Source Trait
//
// Credentials are resolved once per API call, right before the request is
// sent, through a caller-supplied resolver that sees the call's context.
// Nothing is cached between calls.
//
// ## Usage
//
// ```rust,ignore
// use xshield_core::traits::{Credentials, Security};
//
// let source = |_ctx: Context| async move {
//     let api_key = std::env::var("XSHIELD_API_KEY").map_err(|e| Error::security(e.to_string()))?;
//     Ok(Security::ConfigProvider(Credentials::new(api_key)))
// };
// ```

use crate::context::Context;
use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// A resolved security object
///
/// Only [`Security::ConfigProvider`] carries credentials that the
/// authentication hook knows how to apply; anything else is sent as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Security {
    /// Credentials usable for request-level authentication
    ConfigProvider(Credentials),

    /// A security object without the configuration-provider capability
    Opaque,
}

impl Security {
    /// The credentials, if this object has the configuration-provider capability
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Security::ConfigProvider(creds) => Some(creds),
            Security::Opaque => None,
        }
    }
}

/// API credentials
///
/// The Debug implementation intentionally does NOT expose the API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// Optional server URL that replaces the configured one
    server_url: Option<String>,
}

impl Credentials {
    /// Create credentials from an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            server_url: None,
        }
    }

    /// Route requests made with these credentials to `server_url`
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = Some(server_url.into());
        self
    }

    /// The API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The server URL override, if any
    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .field("server_url", &self.server_url)
            .finish()
    }
}

/// Resolver for the security object of a call
///
/// Invoked once per outgoing request with the call's context. A failure aborts
/// the call before anything is sent.
#[async_trait]
pub trait SecuritySource: Send + Sync {
    /// Resolve the security object for this call
    async fn resolve(&self, ctx: &Context) -> Result<Security>;
}

/// A security source that always yields the same object
#[derive(Debug, Clone)]
pub struct StaticSecurity(pub Security);

#[async_trait]
impl SecuritySource for StaticSecurity {
    async fn resolve(&self, _ctx: &Context) -> Result<Security> {
        Ok(self.0.clone())
    }
}

#[async_trait]
impl<F, Fut> SecuritySource for F
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Security>> + Send + 'static,
{
    async fn resolve(&self, ctx: &Context) -> Result<Security> {
        (self)(ctx.clone()).await
    }
}
