//! Core traits for the Xshield provider
//!
//! This module defines the seams between the core and its collaborators.
//!
//! - [`SecuritySource`]: per-call credential resolution
//! - [`StringPlanModifier`]: plan-time rewriting of string attributes

pub mod plan_modifier;
pub mod security;

pub use plan_modifier::{
    apply_string_modifiers, Diagnostic, DiagnosticSeverity, StringPlanModifier, StringRequest,
    StringResponse,
};
pub use security::{Credentials, Security, SecuritySource, StaticSecurity};
