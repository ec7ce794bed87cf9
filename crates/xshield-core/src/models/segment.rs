//! Segment resource model and its metadata-only projection

use super::shared::TagBasedPolicy;
use super::value::{Int64Value, StringValue};

/// Framework-facing state of a segment resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentResourceModel {
    pub id: StringValue,
    pub description: StringValue,
    pub tag_based_policy_name: StringValue,
    pub target_breach_impact_score: Int64Value,
    pub timeline: Int64Value,
    pub criteria: StringValue,
    /// Named network ids currently applied to the segment
    pub named_networks: Vec<String>,
    /// Template ids currently applied to the segment
    pub templates: Vec<String>,
}

impl SegmentResourceModel {
    /// Payload for a metadata-only update
    ///
    /// Null or unknown attributes are left out. The relation lists are always
    /// empty, so an update built from this payload cannot resend (and thereby
    /// overwrite) the named networks and templates already on the policy;
    /// those are managed through the bulk apply/un-apply endpoints.
    pub fn to_shared_tag_based_policy_metadata(&self) -> TagBasedPolicy {
        TagBasedPolicy {
            id: self.id.known().cloned(),
            description: self.description.known().cloned(),
            tag_based_policy_name: self.tag_based_policy_name.known().cloned(),
            target_breach_impact_score: self.target_breach_impact_score.known().copied(),
            timeline: self.timeline.known().copied(),
            criteria: self.criteria.known().cloned(),
            named_networks: Vec::new(),
            templates: Vec::new(),
        }
    }
}
