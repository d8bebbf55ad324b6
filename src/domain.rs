//! Domain types for layered requirement files.
//!
//! This module holds the in-memory model of a flat requirements file, the
//! five [`Tier`]s generated from a manifest, and the project configuration.

mod config;
pub use config::{CONFIG_FILE_NAME, Config, ConfigError};

mod layout;
pub use layout::Layout;

/// Requirement entries and their identifiers.
pub mod requirements;
pub use requirements::{Identifier, Requirements};

mod tier;
pub use tier::{Selector, Tier};
