//! Core registration and dispatch
//!
//! Commands are registered on an [`App`]; each [`Command`] owns its flags and
//! at most one level of subcommands. [`App::run`] parses an argument vector
//! and invokes the selected command.

pub mod app;
pub mod command;
pub mod dispatch;
pub mod flag;
mod names;

pub use app::App;
pub use command::{Command, CommandSummary, FlagSummary};
pub use dispatch::Dispatch;
pub use flag::Flag;
