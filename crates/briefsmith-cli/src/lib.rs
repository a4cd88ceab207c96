//! Briefsmith CLI library.
//!
//! This library provides the core functionality for the Briefsmith command-line
//! interface, including configuration loading, provider resolution, command
//! execution, and report rendering.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
