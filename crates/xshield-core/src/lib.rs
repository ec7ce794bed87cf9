// # xshield-core
//
// Core library for the Xshield provider.
//
// ## Architecture Overview
//
// This library holds everything about an API call that does not depend on the
// HTTP transport, plus the plan-time normalization rules:
// - **Context**: Per-call cancellation token and deadline
// - **Retry engine**: Exponential backoff over any status-bearing outcome
// - **ClientConfig / RetryConfig**: Read-only configuration shared by all calls
// - **SecuritySource**: Per-call credential resolution (no caching)
// - **Plan modifiers**: `criteria` and `deployment_mode` normalization
// - **Models**: Wire models, nullable scalars, segment metadata projection
//
// The HTTP client lives in `xshield-sdk`.

pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod planmodifier;
pub mod retry;
pub mod traits;

// Re-export core types for convenience
pub use config::{BackoffStrategy, ClientConfig, DEFAULT_RETRY_CONFIG, RetryConfig, RetryStrategy, ServerDetails};
pub use context::Context;
pub use error::{Error, Result};
pub use models::{NullInt, NullString};
pub use planmodifier::{AppendManagedByModifier, NormalizeDeploymentModeModifier};
pub use retry::{Retries, StatusCoded, StatusPattern, retry};
pub use traits::{Credentials, Security, SecuritySource, StaticSecurity, StringPlanModifier};
