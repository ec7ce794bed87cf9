//! Plan modifiers for the segment resource
//!
//! - [`AppendManagedByModifier`]: ensures the `criteria` filter restricts the
//!   segment to assets managed by this provider
//! - [`NormalizeDeploymentModeModifier`]: maps the user-facing `enforce` to the
//!   API's `enforced`
//!
//! Null and unknown plan values are never touched.

use crate::models::StringValue;
use crate::traits::plan_modifier::{StringPlanModifier, StringRequest, StringResponse};
use tracing::debug;

/// Clause appended to criteria that do not mention `managedby`
pub const MANAGED_BY_CLAUSE: &str = " AND 'managedby' in ('colortokens')";

/// Deployment mode as spelled in configuration
pub const DEPLOYMENT_MODE_ENFORCE: &str = "enforce";

/// Deployment mode as expected by the API
pub const DEPLOYMENT_MODE_ENFORCED: &str = "enforced";

/// Whether `criteria` already constrains on `managedby`, in either quoting style, in any case
pub fn mentions_managed_by(criteria: &str) -> bool {
    let lower = criteria.to_lowercase();
    lower.contains("'managedby'") || lower.contains("\"managedby\"")
}

/// Append [`MANAGED_BY_CLAUSE`] unless the criteria already mention `managedby`
pub fn append_managed_by(criteria: &str) -> Option<String> {
    if mentions_managed_by(criteria) {
        None
    } else {
        Some(format!("{}{}", criteria, MANAGED_BY_CLAUSE))
    }
}

/// Rewrite `enforce` to `enforced`; anything else passes through
pub fn normalize_deployment_mode(mode: &str) -> Option<&'static str> {
    (mode == DEPLOYMENT_MODE_ENFORCE).then_some(DEPLOYMENT_MODE_ENFORCED)
}

/// Appends ` AND 'managedby' in ('colortokens')` to the criteria if not already present
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendManagedByModifier;

impl StringPlanModifier for AppendManagedByModifier {
    fn description(&self) -> String {
        "Appends ' AND 'managedby' in ('colortokens')' to the criteria if not already present"
            .to_string()
    }

    fn markdown_description(&self) -> String {
        "Appends ` AND 'managedby' in ('colortokens')` to the criteria if not already present"
            .to_string()
    }

    fn plan_modify_string(&self, req: &StringRequest, resp: &mut StringResponse) {
        let Some(original) = req.plan_value.known() else {
            return;
        };

        if let Some(modified) = append_managed_by(original) {
            debug!(
                path = %req.path,
                original = %original,
                modified = %modified,
                "appending managedby condition"
            );
            resp.plan_value = StringValue::Known(modified);
        }
    }
}

/// Converts `enforce` to `enforced` to match API expectations
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeDeploymentModeModifier;

impl StringPlanModifier for NormalizeDeploymentModeModifier {
    fn description(&self) -> String {
        "Converts 'enforce' to 'enforced' to match API expectations".to_string()
    }

    fn markdown_description(&self) -> String {
        "Converts `enforce` to `enforced` to match API expectations".to_string()
    }

    fn plan_modify_string(&self, req: &StringRequest, resp: &mut StringResponse) {
        let Some(mode) = req.plan_value.known() else {
            return;
        };

        if let Some(normalized) = normalize_deployment_mode(mode) {
            debug!(path = %req.path, "converting enforce to enforced");
            resp.plan_value = StringValue::string(normalized);
        }
    }
}
