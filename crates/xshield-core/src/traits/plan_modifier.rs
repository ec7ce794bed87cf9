// # Plan Modifier Trait
//
// Interface through which the plan/diff framework lets the provider rewrite a
// proposed attribute value before it is compared against prior state.
//
// Modifiers are invoked once per plan computation. They must be deterministic,
// must not touch anything besides the response they are handed, and must be
// idempotent: running a modifier on its own output changes nothing.

use crate::models::StringValue;
use serde::{Deserialize, Serialize};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Blocks the plan
    Error,
    /// Reported, plan continues
    Warning,
}

/// A message surfaced to the end user by the framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity of the diagnostic
    pub severity: DiagnosticSeverity,
    /// A short summary of the issue
    pub summary: String,
    /// A detailed description of the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The attribute path where the issue occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Add detail to this diagnostic
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the attribute path for this diagnostic
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// Input to a string plan modifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringRequest {
    /// Attribute path, e.g. `criteria`
    pub path: String,
    /// Value from configuration
    pub config_value: StringValue,
    /// Value from prior state
    pub state_value: StringValue,
    /// Proposed value
    pub plan_value: StringValue,
}

impl StringRequest {
    /// A request for `path` whose config and plan both hold `plan_value`
    pub fn new(path: impl Into<String>, plan_value: StringValue) -> Self {
        Self {
            path: path.into(),
            config_value: plan_value.clone(),
            state_value: StringValue::Null,
            plan_value,
        }
    }

    /// Set the prior state value
    pub fn with_state_value(mut self, state_value: StringValue) -> Self {
        self.state_value = state_value;
        self
    }
}

/// Output of a string plan modifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringResponse {
    /// Value to plan; starts as the request's plan value
    pub plan_value: StringValue,
    /// Diagnostics to surface
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the change forces replacement
    pub requires_replace: bool,
}

impl StringResponse {
    /// Response that, untouched, keeps the request's plan value
    pub fn from_request(req: &StringRequest) -> Self {
        Self {
            plan_value: req.plan_value.clone(),
            diagnostics: Vec::new(),
            requires_replace: false,
        }
    }
}

/// A plan modifier for string attributes
pub trait StringPlanModifier: Send + Sync {
    /// Plain-text description
    fn description(&self) -> String;

    /// Markdown description
    fn markdown_description(&self) -> String;

    /// Inspect `req` and rewrite `resp` as needed
    fn plan_modify_string(&self, req: &StringRequest, resp: &mut StringResponse);
}

/// Run `modifiers` in order, each seeing the previous one's output
pub fn apply_string_modifiers(
    modifiers: &[&dyn StringPlanModifier],
    req: &StringRequest,
) -> StringResponse {
    let mut resp = StringResponse::from_request(req);
    for modifier in modifiers {
        let step = StringRequest {
            plan_value: resp.plan_value.clone(),
            ..req.clone()
        };
        modifier.plan_modify_string(&step, &mut resp);
    }
    resp
}
