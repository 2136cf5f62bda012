//! # rpc-board-cli
//!
//! CLI library for building board trees from RPC router type graphs.
//!
//! This crate provides the core functionality for the `rpc-board` CLI tool:
//! loading a type graph file, building and validating the tree artifact,
//! and describing the form a procedure's input would mount.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`commands`] - Build and describe logic, returning reports
//! - [`writer`] - Input reading, verified artifact output and previews
//! - [`error`] - Error types and exit codes

pub mod commands;
pub mod config;
pub mod error;
pub mod writer;

// Re-export main types for convenience
pub use commands::{build_tree, describe_procedure, BuildReport, FormReport};
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use writer::{ArtifactWriter, Emitted};
