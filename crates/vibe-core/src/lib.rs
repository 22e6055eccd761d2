//! Core types, errors, and configuration for the vibe-monitor tool.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`Config`] - the JSON configuration document and its defaults
//! - [`ExclusionRules`] - file-name patterns and folder fragments to ignore
//! - [`ConfigError`] - errors raised while loading or validating configuration
//!
//! Configuration is loaded once at startup and passed explicitly to the
//! watcher, tracker, and notifier. There is no global state.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod rules;

pub use config::{CONFIG_FILE_NAME, Config, LoadOutcome, Settings, WatchConfig};
pub use error::ConfigError;
pub use rules::{ExclusionRules, parse_pattern_list, read_pattern_file};
