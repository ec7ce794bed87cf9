// # Request Hooks
//
// The authentication hook runs once per call, after the request envelope is
// built and before the retry loop starts. It resolves the security object
// through the configured source and, when that object carries credentials,
// applies them to the request.
//
// ## Security Requirements
//
// - The API key NEVER appears in logs
// - The `Authorization` header is marked sensitive
// - A resolution failure aborts the call before anything is sent

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::Url;
use std::sync::Arc;
use tracing::debug;
use xshield_core::{Context, Credentials, Error, Result, Security, SecuritySource};

/// What the hook knows about the call it is decorating
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Operation identifier, e.g. `TagBasedPolicyBulkTemplateApply`
    pub operation_id: &'a str,

    /// Base URL the request was built against
    pub base_url: &'a str,

    /// The call's context
    pub context: &'a Context,
}

/// Applies credentials from a [`SecuritySource`] to outgoing requests
#[derive(Clone)]
pub struct AuthenticationHook {
    source: Arc<dyn SecuritySource>,
}

impl std::fmt::Debug for AuthenticationHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationHook")
            .field("source", &"<SecuritySource>")
            .finish()
    }
}

impl AuthenticationHook {
    /// Create a hook backed by `source`
    pub fn new(source: Arc<dyn SecuritySource>) -> Self {
        Self { source }
    }

    /// Resolve the security object and apply it to `request`
    ///
    /// Objects without the configuration-provider capability leave the
    /// request untouched.
    pub async fn before_request(&self, hook_ctx: &HookContext<'_>, mut request: reqwest::Request) -> Result<reqwest::Request> {
        let ctx = hook_ctx.context;
        let security = ctx.run(self.source.resolve(ctx)).await?;

        let creds = match security {
            Security::ConfigProvider(creds) => creds,
            Security::Opaque => {
                debug!(
                    operation = hook_ctx.operation_id,
                    "security object has no credentials, sending request unauthenticated"
                );
                return Ok(request);
            }
        };

        apply_credentials(&mut request, &creds)?;
        debug!(operation = hook_ctx.operation_id, "applied API key authentication");
        Ok(request)
    }
}

fn apply_credentials(request: &mut reqwest::Request, creds: &Credentials) -> Result<()> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", creds.api_key()))
        .map_err(|_| Error::security("API key contains characters not allowed in a header"))?;
    value.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, value);

    if let Some(server_url) = creds.server_url() {
        rebase(request.url_mut(), server_url)?;
    }
    Ok(())
}

/// Point `url` at the scheme, host and port of `server_url`
fn rebase(url: &mut Url, server_url: &str) -> Result<()> {
    let target = Url::parse(server_url)
        .map_err(|e| Error::security(format!("invalid credential server URL '{}': {}", server_url, e)))?;
    let host = target
        .host_str()
        .ok_or_else(|| Error::security(format!("credential server URL has no host: '{}'", server_url)))?;

    let invalid = || Error::security(format!("cannot route request to '{}'", server_url));
    url.set_scheme(target.scheme()).map_err(|_| invalid())?;
    url.set_host(Some(host)).map_err(|_| invalid())?;
    url.set_port(target.port()).map_err(|_| invalid())?;
    Ok(())
}
