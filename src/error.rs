//! Error types for command registration and dispatch
//!
//! Registration problems surface when a command is registered; missing flags,
//! flag processor failures and action failures surface when it is dispatched.

use thiserror::Error;

/// Boxed cause carried by processor and action failures
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for switchboard
#[derive(Error, Debug)]
pub enum SwitchboardError {
    /// One or more required flags were not present on the command line
    #[error("Missing required flags for '{command}': {}", format_flags(.flags))]
    MissingRequiredFlags { command: String, flags: Vec<String> },

    /// A flag processor rejected its value
    #[error("Flag --{flag} of '{command}' failed: {source}")]
    FlagProcessing {
        command: String,
        flag: String,
        #[source]
        source: BoxedCause,
    },

    /// The terminal action of a command returned an error
    #[error("Command '{command}' failed: {source}")]
    Action {
        command: String,
        #[source]
        source: BoxedCause,
    },

    /// A command was registered with an invalid shape
    #[error("Invalid registration of '{command}': {message}")]
    Registration { command: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

fn format_flags(flags: &[String]) -> String {
    flags
        .iter()
        .map(|flag| format!("--{flag}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SwitchboardError {
    /// Create a new missing-required-flags error
    pub fn missing_required_flags(command: impl Into<String>, flags: Vec<String>) -> Self {
        Self::MissingRequiredFlags {
            command: command.into(),
            flags,
        }
    }

    /// Create a new flag processing error
    pub fn flag_processing(
        command: impl Into<String>,
        flag: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::FlagProcessing {
            command: command.into(),
            flag: flag.into(),
            source: source.into(),
        }
    }

    /// Create a new action error
    pub fn action(command: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Action {
            command: command.into(),
            source: source.into(),
        }
    }

    /// Create a new registration error
    pub fn registration(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registration {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Name of the flag that failed, if this is a flag processing error
    pub fn failed_flag(&self) -> Option<&str> {
        match self {
            Self::FlagProcessing { flag, .. } => Some(flag),
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SwitchboardError>;
