//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - reqwest-based client for the analytics backend
//! - Tokio runtime bridge for async operations

pub mod api;
pub mod runtime;

pub use api::ApiClient;
pub use runtime::{DatasetResult, RuntimeBridge, RuntimeCommand, RuntimeEvent};
