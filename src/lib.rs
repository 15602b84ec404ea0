//! # Switchboard
//!
//! Declarative command registration and argument dispatch for small CLIs.
//! Commands are registered with their flags, optional subcommands and an
//! action; [`App::run`] then parses an argument vector and invokes the right
//! command.
//!
//! ## Features
//!
//! - Short (`-p`) and long (`--port`) flag names
//! - Required flags, all missing ones reported together
//! - Flag processors run in registration order, threading an accumulator
//! - One level of subcommands
//! - Positional arguments collected in order
//!
//! ## Example
//!
//! ```no_run
//! use switchboard::{App, Flag};
//!
//! let mut app = App::new()?;
//! app.command("echo", "Echo a message", |c| {
//!     c.flag(Flag::new("message").short('m').required(), |value, _| {
//!         println!("{}", value);
//!         Ok(())
//!     });
//! })?;
//! app.run(["echo", "-m", "hi"])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod help;

pub use crate::core::{App, Command, CommandSummary, Dispatch, Flag, FlagSummary};
pub use error::{Result, SwitchboardError};

use anyhow::Result as AnyResult;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> AnyResult<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
