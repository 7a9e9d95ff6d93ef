//! Panda configuration resolver library.
//!
//! Resolves the service configuration from defaults, an optional YAML file and
//! environment overrides. The binary in `main.rs` is a thin inspection tool on top.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
