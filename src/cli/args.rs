//! Command-line argument parsing for the switchboard binary

use clap::Parser;

/// Switchboard - dispatch arguments to declaratively registered commands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "switchboard")]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Do not print the command listing for an empty or unknown command
    #[arg(long)]
    pub no_help: bool,

    /// Program name shown in the command listing
    #[arg(long, value_name = "NAME")]
    pub program_name: Option<String>,

    /// Command, subcommand, flags and arguments to dispatch
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub argv: Vec<String>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
