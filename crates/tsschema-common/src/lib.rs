//! Common types and utilities for the tsschema crates.
//!
//! This crate provides foundational pieces shared by the front-end contract,
//! the schema model, and the resolver:
//! - Resolution limits and thresholds
//! - File name to canonical module name mapping (`file_name_to_module_name`)
//! - Resolver options (`ResolverOptions`, `RelativePrefix`)

// Centralized limits and thresholds
pub mod limits;

// File path -> canonical module name
pub mod module_name;
pub use module_name::{RelativePrefix, file_name_to_module_name, posix_join};

// Options threaded through a resolution pass
pub mod options;
pub use options::ResolverOptions;

/// Name of the global (ambient) module.
pub const GLOBAL_MODULE_NAME: &str = "";
