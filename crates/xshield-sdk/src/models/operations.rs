//! Request, response and per-call option types of the bulk policy operations

use crate::request::PathParams;
use std::collections::BTreeMap;
use std::time::Duration;
use xshield_core::RetryConfig;
use xshield_core::models::{NamedNetworkReference, TemplateReference};

/// Path placeholder naming the target policy
pub const TAG_BASED_POLICY_ID_PARAM: &str = "tagbasedpolicyId";

/// Per-call overrides
///
/// Every field falls back to the client configuration when unset.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Retry policy for this call only
    pub retries: Option<RetryConfig>,

    /// Timeout covering the whole call, retries included
    pub timeout: Option<Duration>,

    /// Base URL for this call only
    pub server_url: Option<String>,

    /// Extra headers, applied last (they replace headers set by the client)
    pub headers: BTreeMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retries(mut self, retries: RetryConfig) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = Some(server_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Bulk apply/un-apply of named networks on one policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedNetworkBulkRequest {
    /// Target policy
    pub tagbasedpolicy_id: String,

    /// References to apply or remove; `None` sends no body
    pub request_body: Option<Vec<NamedNetworkReference>>,
}

impl NamedNetworkBulkRequest {
    pub fn new(tagbasedpolicy_id: impl Into<String>, named_networks: Vec<NamedNetworkReference>) -> Self {
        Self {
            tagbasedpolicy_id: tagbasedpolicy_id.into(),
            request_body: Some(named_networks),
        }
    }
}

impl PathParams for NamedNetworkBulkRequest {
    fn path_param(&self, name: &str) -> Option<String> {
        (name == TAG_BASED_POLICY_ID_PARAM).then(|| self.tagbasedpolicy_id.clone())
    }
}

/// Bulk apply/un-apply of templates on one policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBulkRequest {
    /// Target policy
    pub tagbasedpolicy_id: String,

    /// References to apply or remove; `None` sends no body
    pub request_body: Option<Vec<TemplateReference>>,
}

impl TemplateBulkRequest {
    pub fn new(tagbasedpolicy_id: impl Into<String>, templates: Vec<TemplateReference>) -> Self {
        Self {
            tagbasedpolicy_id: tagbasedpolicy_id.into(),
            request_body: Some(templates),
        }
    }
}

impl PathParams for TemplateBulkRequest {
    fn path_param(&self, name: &str) -> Option<String> {
        (name == TAG_BASED_POLICY_ID_PARAM).then(|| self.tagbasedpolicy_id.clone())
    }
}

pub type TagBasedPolicyBulkNamedNetworkApplyRequest = NamedNetworkBulkRequest;
pub type TagBasedPolicyBulkNamedNetworkUnApplyRequest = NamedNetworkBulkRequest;
pub type TagBasedPolicyBulkTemplateApplyRequest = TemplateBulkRequest;
pub type TagBasedPolicyBulkTemplateUnApplyRequest = TemplateBulkRequest;

/// Successful (< 400) outcome of a bulk operation
///
/// The bulk endpoints answer `202 Accepted` without a body, so nothing is
/// decoded. The raw response is handed over unread.
#[derive(Debug)]
pub struct BulkOperationResponse {
    /// HTTP status code
    pub status_code: u16,

    /// `Content-Type` of the response, empty when absent
    pub content_type: String,

    /// The transport response, body unread
    pub raw_response: reqwest::Response,
}

impl BulkOperationResponse {
    pub(crate) fn from_raw(raw_response: reqwest::Response) -> Self {
        let content_type = raw_response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Self {
            status_code: raw_response.status().as_u16(),
            content_type,
            raw_response,
        }
    }
}

pub type TagBasedPolicyBulkNamedNetworkApplyResponse = BulkOperationResponse;
pub type TagBasedPolicyBulkNamedNetworkUnApplyResponse = BulkOperationResponse;
pub type TagBasedPolicyBulkTemplateApplyResponse = BulkOperationResponse;
pub type TagBasedPolicyBulkTemplateUnApplyResponse = BulkOperationResponse;
