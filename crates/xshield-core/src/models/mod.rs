//! Data models
//!
//! - [`shared`]: JSON wire models of the tag-based policy API
//! - [`null`]: nullable scalars for decoding API payloads
//! - [`value`]: null/unknown/known attribute values from the plan framework
//! - [`segment`]: the segment resource model and its metadata projection

pub mod null;
pub mod segment;
pub mod shared;
pub mod value;

pub use null::{NullInt, NullString};
pub use segment::SegmentResourceModel;
pub use shared::{MetadataNamedNetworkReference, NamedNetworkReference, TagBasedPolicy, TemplateReference};
pub use value::{AttrValue, Int64Value, StringValue};
