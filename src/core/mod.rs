//! # Core Module
//!
//! Core domain types, configuration, and error handling for Botanica.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: Add response module with oracle reply cleanup utilities
//! - 1.1.0: Add typed intent-boundary errors
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::{AuthError, ReminderError, WizardError};
pub use response::{extract_json, preview, PREVIEW_LIMIT};
