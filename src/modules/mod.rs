//! UI Modules
//!
//! Each module implements the Module trait and handles its own key input
//! and rendering.
//!
//! Modules:
//! - dashboard: dataset, analysis, models and insights panels

pub mod dashboard;
