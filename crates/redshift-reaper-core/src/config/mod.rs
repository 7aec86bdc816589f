//! Configuration and profile management
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! Profiles hold the defaults a nuke run would otherwise need on the command
//! line: region, AWS named profile, age, required tags, selected kinds and
//! the tag-failure policy.
//!
//! # Features
//!
//! - Multiple named profiles with an optional default
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

pub mod config;
pub mod document;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, Profile};
pub use document::ConfigDocument;
pub use error::{ConfigError, Result};
