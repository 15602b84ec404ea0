//! Configuration for the switchboard shell
//!
//! Decides how the binary reacts to the lenient dispatch outcomes.

use crate::{cli::Args, error::SwitchboardError};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Program name shown in help output
    pub program_name: String,
    /// Help output configuration
    pub help: HelpConfig,
}

/// When the shell prints the command listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpConfig {
    /// Print help when no command is given
    pub on_empty: bool,
    /// Print help when the command name is not registered
    pub on_unknown: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            program_name: "switchboard".to_string(),
            help: HelpConfig::default(),
        }
    }
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            on_empty: true,
            on_unknown: true,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, SwitchboardError> {
        let mut config = Self {
            debug: args.debug,
            ..Self::default()
        };

        if args.no_help {
            config.help.on_empty = false;
            config.help.on_unknown = false;
        }
        if let Some(name) = &args.program_name {
            config.program_name = name.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SwitchboardError> {
        if self.program_name.trim().is_empty() {
            return Err(SwitchboardError::validation("Program name must not be empty"));
        }

        if self.program_name.chars().any(char::is_whitespace) {
            return Err(SwitchboardError::validation(format!(
                "Program name must not contain whitespace: '{}'",
                self.program_name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.debug);
        assert_eq!(config.program_name, "switchboard");
        assert!(config.help.on_empty && config.help.on_unknown);
    }

    #[test]
    fn test_from_args_overrides() {
        let args = Args::try_parse_from([
            "switchboard",
            "--debug",
            "--no-help",
            "--program-name",
            "tool",
            "hello",
        ])
        .unwrap();
        let config = Config::from_args(&args).unwrap();
        assert!(config.debug);
        assert_eq!(config.program_name, "tool");
        assert!(!config.help.on_empty);
        assert!(!config.help.on_unknown);
    }

    #[test]
    fn test_invalid_program_name() {
        let config = Config {
            program_name: "my tool".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SwitchboardError::Validation { .. })
        ));
    }
}
