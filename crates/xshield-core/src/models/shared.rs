//! Wire models shared by the tag-based policy endpoints

use serde::{Deserialize, Serialize};

/// A tag-based policy ("segment")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBasedPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_based_policy_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_breach_impact_score: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<i64>,

    /// Filter expression selecting the assets in the segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,

    #[serde(default, rename = "namednetworks")]
    pub named_networks: Vec<MetadataNamedNetworkReference>,

    #[serde(default)]
    pub templates: Vec<TemplateReference>,
}

/// Named network as listed on a policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataNamedNetworkReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_network_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_network_name: Option<String>,
}

/// Named network reference sent to the bulk apply/un-apply endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedNetworkReference {
    pub named_network_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_network_name: Option<String>,
}

impl NamedNetworkReference {
    /// Reference a named network by id
    pub fn new(named_network_id: impl Into<String>) -> Self {
        Self {
            named_network_id: named_network_id.into(),
            named_network_name: None,
        }
    }
}

/// Template reference (policy listing and bulk endpoints)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateReference {
    pub template_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
}

impl TemplateReference {
    /// Reference a template by id
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            template_name: None,
        }
    }
}
