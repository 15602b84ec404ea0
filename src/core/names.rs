//! Registration-time checks for command and flag names
//!
//! Only names that could never be matched by a command-line token are
//! rejected: empty names, names with whitespace, and names starting with `-`.

use crate::{
    core::flag::Flag,
    error::{Result, SwitchboardError},
};
use regex::Regex;

/// Validates names handed to the registration API
pub(crate) struct NameRules {
    /// Command names and long flag names
    re_name: Regex,
}

impl NameRules {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            re_name: Regex::new(r"^[^-\s]\S*$").map_err(|e| {
                SwitchboardError::config(format!("Failed to compile regex: {}", e))
            })?,
        })
    }

    /// Check a command or subcommand name
    pub(crate) fn check_command(&self, name: &str) -> std::result::Result<(), String> {
        if self.re_name.is_match(name) {
            Ok(())
        } else {
            Err(format!("'{}' is not a valid command name", name))
        }
    }

    /// Check the long and short names of a flag
    pub(crate) fn check_flag(&self, flag: &Flag) -> std::result::Result<(), String> {
        if !self.re_name.is_match(&flag.long) {
            return Err(format!("'{}' is not a valid long flag name", flag.long));
        }
        match flag.short {
            Some(short) if short == '-' || short.is_whitespace() => Err(format!(
                "'{}' is not a valid short name for --{}",
                short, flag.long
            )),
            _ => Ok(()),
        }
    }
}
