//! CLI surface for lector.
//!
//! `main.rs` is the composition root; everything else here is reusable:
//! argument definitions, bootstrap wiring, command handlers, the
//! progress-bar event sink, and the plain-text extractor adapter.

pub mod bootstrap;
pub mod commands;
pub mod config_file;
pub mod extract;
pub mod parser;
pub mod progress;

pub use parser::{CacheCommand, Cli, Commands, SettingsCommand};
