//! Resource provider lifecycle webhook.
//!
//! The resource-management plane calls these endpoints while it provisions
//! and deletes resources of this provider's types:
//!
//! ```text
//! POST /Provider/OnResourceCreationValidate   -> refuse or accept a create
//! PUT  /Provider/OnResourceCreationBegin      -> materialize, echo resource
//! POST /Provider/OnResourceCreationCompleted  -> post-provisioning hook
//! POST /Provider/OnResourceDeletionValidate   -> refuse or accept a delete
//! ```
//!
//! Every answer is HTTP 200; a refusal travels in the body as
//! `{"error":{"code":..,"message":..},"status":"Failed"}`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`provider`]: Lifecycle events, resource payloads and response envelopes
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus counters and latency histograms
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod utils;

pub use config::Config;
pub use error::{Result, WebhookError};
