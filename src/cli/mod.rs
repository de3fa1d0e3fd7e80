//! CLI module
//!
//! Command-line interface for the notifier.
//!
//! # Commands
//!
//! - `run` - Poll and notify until interrupted
//! - `state` - Inspect persisted state
//! - `reset` - Remove persisted state

mod commands;
mod runner;

pub use commands::{Cli, Commands, RunArgs};
pub use runner::Runner;
