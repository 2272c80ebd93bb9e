#![warn(unused_crate_dependencies)]

// Only used in the binary and triggers unused warning
use tokio as _;

pub mod cli;
mod commands;
pub mod configuration;
pub mod tracing;

pub use commands::{run, TerminalNavigator};
