//! Configuration module for FinFlow
//!
//! - Path resolution for settings, sheet stores and the audit log
//! - User settings persistence
//! - Built-in tax tables

pub mod paths;
pub mod settings;
pub mod tax_year;

pub use paths::FinflowPaths;
pub use settings::Settings;
