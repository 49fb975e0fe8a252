//! Triage Configuration Module
//!
//! Deployment settings loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `--config` CLI flag
//! 2. `FEVER_TRIAGE_CONFIG` environment variable (path to TOML file)
//! 3. `triage_config.toml` in the current working directory
//! 4. Built-in defaults
//!
//! The loaded config is passed explicitly to whoever needs it; there is no
//! process-wide config singleton.

mod triage_config;
pub mod defaults;
pub mod validation;

pub use triage_config::*;
