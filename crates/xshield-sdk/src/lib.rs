// # Xshield SDK
//
// HTTP client for the ColorTokens Xshield tag-based policy API.
//
// ## What a call does
//
// - ✅ Builds the URL from the operation's path template (ids percent-encoded)
// - ✅ Serializes the body as JSON when the request carries one
// - ✅ Resolves credentials once per call and sends `Authorization: Bearer <key>`
// - ✅ Retries 5XX responses and connection errors with exponential backoff
// - ✅ Honors cancellation and deadlines at every await point
// - ✅ Returns status, content type and the unread response for statuses < 400
// - ❌ NO credential caching (the security source is asked on every call)
// - ❌ NO response body decoding (the bulk endpoints answer 202 with no body)
// - ❌ NO background tasks
//
// ## Security Requirements
//
// - The API key NEVER appears in logs or `Debug` output
// - A failing security source aborts the call before anything is sent
//
// ## Usage
//
// ```rust,ignore
// let sdk = XshieldSdk::new(
//     SdkConfiguration::new(ClientConfig::new())?
//         .with_security(StaticSecurity(Security::ConfigProvider(Credentials::new(key)))),
// );
// let res = sdk
//     .tag_based_policies()
//     .tag_based_policy_bulk_template_apply(&ctx, TemplateBulkRequest::new(id, templates), Options::new())
//     .await?;
// assert_eq!(res.status_code, 202);
// ```

pub mod hooks;
pub mod models;
pub mod request;
pub mod tagbasedpolicies;

pub use hooks::{AuthenticationHook, HookContext};
pub use models::Options;
pub use tagbasedpolicies::TagBasedPolicies;

use std::sync::Arc;
use xshield_core::{ClientConfig, Error, Result, SecuritySource};

/// Everything an operation needs besides its own request
///
/// Built once, then shared read-only by every call.
#[derive(Clone)]
pub struct SdkConfiguration {
    /// HTTP transport
    pub client: reqwest::Client,

    /// Server, user agent, timeout and retry defaults
    pub config: ClientConfig,

    /// Credential resolver; `None` sends requests unauthenticated
    pub security: Option<Arc<dyn SecuritySource>>,
}

// Custom Debug implementation that hides the security source
impl std::fmt::Debug for SdkConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfiguration")
            .field("config", &self.config)
            .field("security", &self.security.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl SdkConfiguration {
    /// Validate `config` and build a default HTTP client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config,
            security: None,
        })
    }

    /// Use a caller-built HTTP client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Resolve credentials through `source` on every call
    pub fn with_security(self, source: impl SecuritySource + 'static) -> Self {
        self.with_security_source(Arc::new(source))
    }

    /// Shared-source variant of [`with_security`](Self::with_security)
    pub fn with_security_source(mut self, source: Arc<dyn SecuritySource>) -> Self {
        self.security = Some(source);
        self
    }
}

/// Entry point of the SDK
#[derive(Debug, Clone)]
pub struct XshieldSdk {
    sdk_configuration: Arc<SdkConfiguration>,
}

impl XshieldSdk {
    pub fn new(sdk_configuration: SdkConfiguration) -> Self {
        Self {
            sdk_configuration: Arc::new(sdk_configuration),
        }
    }

    /// Tag-based policy operations
    pub fn tag_based_policies(&self) -> TagBasedPolicies {
        TagBasedPolicies::new(Arc::clone(&self.sdk_configuration))
    }

    pub fn configuration(&self) -> &SdkConfiguration {
        &self.sdk_configuration
    }
}
