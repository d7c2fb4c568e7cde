//! Terminal dashboard and typed client for the AI data-analytics backend.

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod logging;
pub mod modules;
pub mod ui;

pub use crate::core::{Context, DataContext, DataScope};
pub use crate::infrastructure::api::{ApiClient, ApiError, ApiResult, UploadFile};
