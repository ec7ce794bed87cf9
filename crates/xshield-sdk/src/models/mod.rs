//! Operation models
//!
//! Wire models shared with the provider live in `xshield_core::models`.

pub mod operations;

pub use operations::{
    BulkOperationResponse, NamedNetworkBulkRequest, Options, TemplateBulkRequest,
    TagBasedPolicyBulkNamedNetworkApplyRequest, TagBasedPolicyBulkNamedNetworkApplyResponse,
    TagBasedPolicyBulkNamedNetworkUnApplyRequest, TagBasedPolicyBulkNamedNetworkUnApplyResponse,
    TagBasedPolicyBulkTemplateApplyRequest, TagBasedPolicyBulkTemplateApplyResponse,
    TagBasedPolicyBulkTemplateUnApplyRequest, TagBasedPolicyBulkTemplateUnApplyResponse,
};
pub use xshield_core::models::{NamedNetworkReference, TemplateReference};
