//! glosstip CLI library
//!
//! This library provides the command-line interface for annotating HTML
//! files with glossary tooltips.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
