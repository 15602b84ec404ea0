//! Command-line interface module
//!
//! Provides the binary's own argument parsing and the demo command set it
//! dispatches to.

pub mod args;
pub mod commands;

pub use args::{Args, parse_args};
pub use commands::{demo_app, execute};
