// # Tag-Based Policy Operations
//
// Bulk apply/un-apply of named networks and templates on a tag-based policy.
//
// ## API Reference
//
// - Apply named networks:    PUT    `/api/tagbasedpolicies/{tagbasedpolicyId}/namednetworks`
// - Un-apply named networks: DELETE `/api/tagbasedpolicies/{tagbasedpolicyId}/namednetworks`
// - Apply templates:         PUT    `/api/tagbasedpolicies/{tagbasedpolicyId}/templates`
// - Un-apply templates:      DELETE `/api/tagbasedpolicies/{tagbasedpolicyId}/templates`
//
// All four answer `202 Accepted` with no body on success.
//
// ## Call Pipeline
//
// ```text
// timeout ─► base URL ─► URL ─► body ─► envelope ─► auth hook ─► caller headers
//                                                                    │
//                     status ≥ 400 ─► error (body drained) ◄── retry loop (5XX)
// ```

use crate::SdkConfiguration;
use crate::hooks::{AuthenticationHook, HookContext};
use crate::models::operations::*;
use crate::request::{PathParams, apply_headers, build_request, generate_url, serialize_request_body};
use reqwest::Method;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use xshield_core::{Context, Error, Result, Retries, StatusCoded, retry};

/// Status codes retried by every operation in this group
const RETRY_STATUS_CODES: &[&str] = &["5XX"];

/// Static description of one API operation
#[derive(Debug)]
struct OperationSpec {
    id: &'static str,
    method: Method,
    path: &'static str,
}

static NAMED_NETWORK_APPLY: OperationSpec = OperationSpec {
    id: "TagBasedPolicyBulkNamedNetworkApply",
    method: Method::PUT,
    path: "/api/tagbasedpolicies/{tagbasedpolicyId}/namednetworks",
};

static NAMED_NETWORK_UN_APPLY: OperationSpec = OperationSpec {
    id: "TagBasedPolicyBulkNamedNetworkUnApply",
    method: Method::DELETE,
    path: "/api/tagbasedpolicies/{tagbasedpolicyId}/namednetworks",
};

static TEMPLATE_APPLY: OperationSpec = OperationSpec {
    id: "TagBasedPolicyBulkTemplateApply",
    method: Method::PUT,
    path: "/api/tagbasedpolicies/{tagbasedpolicyId}/templates",
};

static TEMPLATE_UN_APPLY: OperationSpec = OperationSpec {
    id: "TagBasedPolicyBulkTemplateUnApply",
    method: Method::DELETE,
    path: "/api/tagbasedpolicies/{tagbasedpolicyId}/templates",
};

/// One HTTP exchange, as seen by the retry engine
struct Attempt(reqwest::Response);

impl StatusCoded for Attempt {
    fn status_code(&self) -> u16 {
        self.0.status().as_u16()
    }
}

/// Tag-based policy operations group
#[derive(Debug, Clone)]
pub struct TagBasedPolicies {
    sdk_configuration: Arc<SdkConfiguration>,
    hook: Option<AuthenticationHook>,
}

impl TagBasedPolicies {
    pub(crate) fn new(sdk_configuration: Arc<SdkConfiguration>) -> Self {
        let hook = sdk_configuration.security.clone().map(AuthenticationHook::new);
        Self {
            sdk_configuration,
            hook,
        }
    }

    /// Apply named networks to a policy
    pub async fn tag_based_policy_bulk_named_network_apply(
        &self,
        ctx: &Context,
        request: TagBasedPolicyBulkNamedNetworkApplyRequest,
        options: Options,
    ) -> Result<TagBasedPolicyBulkNamedNetworkApplyResponse> {
        let raw = self
            .execute(ctx, &NAMED_NETWORK_APPLY, &request, request.request_body.as_ref(), options)
            .await?;
        Ok(BulkOperationResponse::from_raw(raw))
    }

    /// Remove named networks from a policy
    pub async fn tag_based_policy_bulk_named_network_un_apply(
        &self,
        ctx: &Context,
        request: TagBasedPolicyBulkNamedNetworkUnApplyRequest,
        options: Options,
    ) -> Result<TagBasedPolicyBulkNamedNetworkUnApplyResponse> {
        let raw = self
            .execute(ctx, &NAMED_NETWORK_UN_APPLY, &request, request.request_body.as_ref(), options)
            .await?;
        Ok(BulkOperationResponse::from_raw(raw))
    }

    /// Apply templates to a policy
    pub async fn tag_based_policy_bulk_template_apply(
        &self,
        ctx: &Context,
        request: TagBasedPolicyBulkTemplateApplyRequest,
        options: Options,
    ) -> Result<TagBasedPolicyBulkTemplateApplyResponse> {
        let raw = self
            .execute(ctx, &TEMPLATE_APPLY, &request, request.request_body.as_ref(), options)
            .await?;
        Ok(BulkOperationResponse::from_raw(raw))
    }

    /// Remove templates from a policy
    pub async fn tag_based_policy_bulk_template_un_apply(
        &self,
        ctx: &Context,
        request: TagBasedPolicyBulkTemplateUnApplyRequest,
        options: Options,
    ) -> Result<TagBasedPolicyBulkTemplateUnApplyResponse> {
        let raw = self
            .execute(ctx, &TEMPLATE_UN_APPLY, &request, request.request_body.as_ref(), options)
            .await?;
        Ok(BulkOperationResponse::from_raw(raw))
    }

    /// Shared pipeline: build, authenticate, send with retries, classify
    ///
    /// Returns the transport response for any status below 400. Larger
    /// statuses drain the body into [`Error::UnexpectedStatus`].
    async fn execute<P, B>(
        &self,
        ctx: &Context,
        op: &OperationSpec,
        params: &P,
        body: Option<&B>,
        options: Options,
    ) -> Result<reqwest::Response>
    where
        P: PathParams,
        B: Serialize + ?Sized,
    {
        let sdk = &self.sdk_configuration;

        let ctx = match options.timeout.or(sdk.config.timeout) {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.clone(),
        };
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let base_url = match &options.server_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => sdk.config.server.resolve()?,
        };
        let url = generate_url(&base_url, op.path, params)?;
        let body = serialize_request_body(body)?;
        let mut request = build_request(op.method.clone(), url, body, &sdk.config.user_agent)?;

        if let Some(hook) = &self.hook {
            let hook_ctx = HookContext {
                operation_id: op.id,
                base_url: &base_url,
                context: &ctx,
            };
            request = hook.before_request(&hook_ctx, request).await?;
        }
        apply_headers(request.headers_mut(), &options.headers)?;

        let retry_config = sdk.config.effective_retry_config(options.retries.as_ref());
        let retries = Retries::new(retry_config, RETRY_STATUS_CODES)?;

        debug!(
            operation = op.id,
            method = %op.method,
            url = %request.url(),
            "sending request"
        );

        let client = &sdk.client;
        let request = &request;
        let Attempt(response) = retry(&ctx, &retries, || {
            let attempt = request.try_clone();
            async move {
                let attempt = attempt.ok_or_else(|| Error::construction("request body cannot be replayed"))?;
                client
                    .execute(attempt)
                    .await
                    .map(Attempt)
                    .map_err(|e| Error::transport(e.to_string()))
            }
        })
        .await?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = ctx
                .run(async {
                    Ok(response.text().await.unwrap_or_else(|e| {
                        warn!(operation = op.id, status, error = %e, "failed to read error response body");
                        format!("<unreadable response body: {}>", e)
                    }))
                })
                .await?;
            warn!(operation = op.id, status, "unexpected response from API");
            return Err(Error::unexpected_status(status, body));
        }

        debug!(operation = op.id, status, "request succeeded");
        Ok(response)
    }
}
