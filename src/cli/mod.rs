//! CLI module
//!
//! Command-line interface for running list operations.
//!
//! # Commands
//!
//! - `list` - Run a list operation across pages
//! - `operations` - List operations of a service
//! - `validate` - Validate a service definition
//! - `services` - List built-in services

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
