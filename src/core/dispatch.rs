//! Token classification and dispatch
//!
//! A dispatch walks the tokens that follow the command name once, left to
//! right. Tokens starting with `-` are flags; `--name` is a long name and `-n`
//! is resolved through the short alias index. Unresolved flag tokens are
//! consumed and ignored. A value flag takes the next token as its value unless
//! that token itself starts with `-`. Everything else is positional.
//!
//! After the scan, all missing required flags are reported together. Flag
//! processors then run in registration order, threading the accumulator, and
//! stop at the first failure. Finally the terminal action runs.

use crate::{
    core::command::{Action, Command},
    error::{Result, SwitchboardError},
};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Outcome of a successful call to [`App::run`](crate::App::run)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A command ran; `path` is the command name plus the subcommand, if any
    Executed { path: Vec<String> },
    /// The argument vector was empty
    NoCommand,
    /// The first token named no registered command
    UnknownCommand(String),
}

/// Per-dispatch state, built from the target command's flags
#[derive(Debug, Default)]
pub(crate) struct DispatchSession {
    pub(crate) flag_values: HashMap<String, String>,
    pub(crate) required_satisfied: HashMap<String, bool>,
    pub(crate) positional_args: Vec<String>,
    pub(crate) short_to_long: HashMap<char, String>,
}

impl DispatchSession {
    fn record(&mut self, long: &str, value: impl Into<String>) {
        self.flag_values.insert(long.to_string(), value.into());
        if let Some(satisfied) = self.required_satisfied.get_mut(long) {
            *satisfied = true;
        }
    }

    /// Resolve the name part of a flag token to a long name
    fn resolve(&self, token: &str) -> Option<String> {
        let stripped = token.strip_prefix('-')?;
        if let Some(long) = stripped.strip_prefix('-') {
            return Some(long.to_string());
        }
        let mut chars = stripped.chars();
        match (chars.next(), chars.next()) {
            (Some(short), None) => self.short_to_long.get(&short).cloned(),
            _ => None,
        }
    }
}

impl<A: 'static> Command<A> {
    /// Hand the tokens to a matching subcommand, or parse them against this command
    pub(crate) fn route(&mut self, tokens: &[String], path: &mut Vec<String>) -> Result<()> {
        if let Some((first, rest)) = tokens.split_first() {
            if let Some(subcommand) = self.subcommands.get_mut(first) {
                debug!("Selected subcommand '{} {}'", self.path, first);
                path.push(first.clone());
                return subcommand.dispatch(rest, path);
            }
        }
        self.execute(tokens)
    }

    /// Parse `tokens` against this command's flags and run it
    #[instrument(skip(self), fields(command = %self.path))]
    pub(crate) fn execute(&mut self, tokens: &[String]) -> Result<()> {
        let session = self.scan(tokens);

        let missing: Vec<String> = self
            .flags
            .order()
            .iter()
            .filter(|long| session.required_satisfied.get(*long) == Some(&false))
            .cloned()
            .collect();
        if !missing.is_empty() {
            warn!("Missing required flags for '{}': {:?}", self.path, missing);
            return Err(SwitchboardError::missing_required_flags(
                self.path.clone(),
                missing,
            ));
        }

        self.process_flags(&session)?;
        self.invoke_action(&session.positional_args)
    }

    /// Classify every token in a single pass
    pub(crate) fn scan(&self, tokens: &[String]) -> DispatchSession {
        let mut session = DispatchSession {
            short_to_long: self.flags.alias_index(),
            required_satisfied: self
                .flags
                .iter()
                .filter(|flag| flag.descriptor.required)
                .map(|flag| (flag.descriptor.long.clone(), false))
                .collect(),
            ..DispatchSession::default()
        };

        let mut cursor = 0;
        while cursor < tokens.len() {
            let token = &tokens[cursor];
            if !token.starts_with('-') {
                session.positional_args.push(token.clone());
                cursor += 1;
                continue;
            }

            let resolved = session
                .resolve(token)
                .and_then(|long| self.flags.get(&long).map(|flag| (long, flag.is_boolean())));
            match resolved {
                Some((long, true)) => {
                    session.record(&long, "true");
                    cursor += 1;
                }
                Some((long, false)) => match tokens.get(cursor + 1) {
                    Some(value) if !value.starts_with('-') => {
                        session.record(&long, value.as_str());
                        cursor += 2;
                    }
                    _ => {
                        session.record(&long, "");
                        cursor += 1;
                    }
                },
                None => {
                    debug!("Ignoring unknown flag token '{}'", token);
                    cursor += 1;
                }
            }
        }

        debug!(
            "Scanned {} of {} flag(s) and {} positional argument(s)",
            session.flag_values.len(),
            self.flags.len(),
            session.positional_args.len()
        );
        session
    }

    /// Run processors of the flags that were given, in registration order
    fn process_flags(&mut self, session: &DispatchSession) -> Result<()> {
        let order = self.flags.order().to_vec();
        let mut accumulator: Option<A> = None;

        for long in order {
            let Some(raw) = session.flag_values.get(&long) else {
                continue;
            };
            let Some(flag) = self.flags.get_mut(&long) else {
                continue;
            };
            debug!("Processing --{} = '{}'", long, raw);
            accumulator = flag.processor.apply(raw, accumulator).map_err(|e| {
                warn!("Flag --{} of '{}' failed: {}", long, self.path, e);
                SwitchboardError::flag_processing(self.path.clone(), long.clone(), e)
            })?;
        }
        Ok(())
    }

    fn invoke_action(&mut self, positional_args: &[String]) -> Result<()> {
        let outcome = match &mut self.action {
            Action::ZeroArg(action) => {
                debug!("Running '{}'", self.path);
                action()
            }
            Action::Positional(action) => {
                debug!("Running '{}' with {:?}", self.path, positional_args);
                action(positional_args)
            }
            Action::None => {
                debug!("'{}' has no action", self.path);
                Ok(())
            }
        };
        outcome.map_err(|e| SwitchboardError::action(self.path.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{flag::Flag, names::NameRules};
    use std::{cell::RefCell, rc::Rc};

    fn command<A: 'static>(name: &str) -> Command<A> {
        Command::new(name, "test command", None, Rc::new(NameRules::new().unwrap()))
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|token| token.to_string()).collect()
    }

    #[test]
    fn test_short_and_long_record_same_value() {
        let mut cmd = command::<()>("greet");
        cmd.flag(Flag::new("name").short('n'), |_, _| Ok(()));

        let long = cmd.scan(&tokens(&["--name", "John"]));
        let short = cmd.scan(&tokens(&["-n", "John"]));
        assert_eq!(long.flag_values, short.flag_values);
        assert_eq!(long.flag_values.get("name").map(String::as_str), Some("John"));
    }

    #[test]
    fn test_unknown_flags_are_swallowed() {
        let cmd = command::<()>("echo");
        let session = cmd.scan(&tokens(&["-x", "--nope", "kept", "-", "--"]));
        assert!(session.flag_values.is_empty());
        assert_eq!(session.positional_args, ["kept"]);
    }

    #[test]
    fn test_value_lookahead_stops_at_flags() {
        let mut cmd = command::<()>("calc");
        cmd.flag(Flag::new("offset"), |_, _| Ok(()));
        cmd.bool_flag(Flag::new("verbose"), |_| Ok(()));

        let session = cmd.scan(&tokens(&["--offset", "-5", "--verbose"]));
        assert_eq!(session.flag_values.get("offset").map(String::as_str), Some(""));
        assert_eq!(session.flag_values.get("verbose").map(String::as_str), Some("true"));
        assert!(session.positional_args.is_empty());
    }

    #[test]
    fn test_bool_flag_does_not_consume_next_token() {
        let mut cmd = command::<()>("copy");
        cmd.bool_flag(Flag::new("verbose").short('v'), |_| Ok(()));

        let session = cmd.scan(&tokens(&["-v", "src.txt", "dst.txt"]));
        assert_eq!(session.positional_args, ["src.txt", "dst.txt"]);
    }

    #[test]
    fn test_required_flag_without_value_is_satisfied() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let mut cmd = command::<()>("echo");
        cmd.flag(Flag::new("message").required(), move |value, _| {
            *sink.borrow_mut() = Some(value.to_string());
            Ok(())
        });

        cmd.execute(&tokens(&["--message"])).unwrap();
        assert_eq!(seen.borrow().as_deref(), Some(""));
    }

    #[test]
    fn test_missing_required_flags_are_batched() {
        let calls = Rc::new(RefCell::new(0));
        let mut cmd = command::<()>("deploy");
        for name in ["env", "verbose", "region"] {
            let calls = Rc::clone(&calls);
            let flag = if name == "verbose" {
                Flag::new(name)
            } else {
                Flag::new(name).required()
            };
            cmd.flag(flag, move |_, _| {
                *calls.borrow_mut() += 1;
                Ok(())
            });
        }
        let ran = Rc::new(RefCell::new(false));
        let ran_in_action = Rc::clone(&ran);
        cmd.run(move || {
            *ran_in_action.borrow_mut() = true;
            Ok(())
        });

        let err = cmd.execute(&tokens(&["--verbose", "yes"])).unwrap_err();
        match err {
            SwitchboardError::MissingRequiredFlags { command, flags } => {
                assert_eq!(command, "deploy");
                assert_eq!(flags, ["env", "region"]);
            }
            other => panic!("Expected MissingRequiredFlags, got {other:?}"),
        }
        assert_eq!(*calls.borrow(), 0);
        assert!(!*ran.borrow());
    }

    #[test]
    fn test_accumulator_follows_registration_order() {
        let result = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&result);
        let mut cmd = command::<String>("greet");
        cmd.flag(Flag::new("first"), |value, _| Ok(value.to_string()));
        cmd.flag(Flag::new("last"), move |value, previous| {
            let full = format!("{} {}", previous.unwrap_or_default(), value);
            *sink.borrow_mut() = full.clone();
            Ok(full)
        });

        cmd.execute(&tokens(&["--last", "Doe", "--first", "Jane"])).unwrap();
        assert_eq!(*result.borrow(), "Jane Doe");
    }

    #[test]
    fn test_replaced_processor_runs_in_original_slot() {
        let trail = Rc::new(RefCell::new(Vec::new()));
        let mut cmd = command::<String>("greet");
        cmd.flag(Flag::new("first"), |_, _| Ok("stale".to_string()));
        let last_sink = Rc::clone(&trail);
        cmd.flag(Flag::new("last"), move |value, previous| {
            let full = format!("{} {}", previous.unwrap_or_default(), value);
            last_sink.borrow_mut().push(full.clone());
            Ok(full)
        });
        let first_sink = Rc::clone(&trail);
        cmd.flag(Flag::new("first"), move |value, previous| {
            first_sink
                .borrow_mut()
                .push(format!("first after {:?}", previous));
            Ok(value.to_uppercase())
        });

        cmd.execute(&tokens(&["--last", "Doe", "--first", "jane"])).unwrap();
        assert_eq!(*trail.borrow(), ["first after None", "JANE Doe"]);
    }

    #[test]
    fn test_reregistered_flag_reclaims_short_name() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut cmd = command::<()>("t");
        for long in ["alpha", "beta", "alpha"] {
            let sink = Rc::clone(&seen);
            cmd.flag(Flag::new(long).short('x'), move |value, _| {
                sink.borrow_mut().push(format!("{} {}", long, value));
                Ok(())
            });
        }

        cmd.execute(&tokens(&["-x", "1"])).unwrap();
        assert_eq!(*seen.borrow(), ["alpha 1"]);
    }

    #[test]
    fn test_processor_failure_is_fail_fast() {
        let later = Rc::new(RefCell::new(false));
        let later_sink = Rc::clone(&later);
        let ran = Rc::new(RefCell::new(false));
        let ran_sink = Rc::clone(&ran);

        let mut cmd = command::<()>("port");
        cmd.flag(Flag::new("port").required(), |value, _| {
            value
                .parse::<u16>()
                .map(|_| ())
                .map_err(|e| anyhow::anyhow!("invalid port '{}': {}", value, e))
        });
        cmd.bool_flag(Flag::new("verbose"), move |_| {
            *later_sink.borrow_mut() = true;
            Ok(())
        });
        cmd.run(move || {
            *ran_sink.borrow_mut() = true;
            Ok(())
        });

        let err = cmd
            .execute(&tokens(&["--verbose", "--port", "bogus"]))
            .unwrap_err();
        assert_eq!(err.failed_flag(), Some("port"));
        assert!(err.to_string().contains("invalid port"));
        assert!(!*later.borrow());
        assert!(!*ran.borrow());
    }

    #[test]
    fn test_action_error_is_reported() {
        let mut cmd = command::<()>("fail");
        cmd.run(|| Err(anyhow::anyhow!("boom")));
        let err = cmd.execute(&[]).unwrap_err();
        assert!(matches!(err, SwitchboardError::Action { ref command, .. } if command == "fail"));
    }

    #[test]
    fn test_no_action_is_noop() {
        let mut cmd = command::<()>("idle");
        cmd.bool_flag(Flag::new("verbose"), |_| Ok(()));
        assert!(cmd.execute(&tokens(&["--verbose", "extra"])).is_ok());
    }
}
