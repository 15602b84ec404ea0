//! Application registry: top-level commands and the dispatch entry point

use crate::{
    core::{
        command::{Command, CommandSummary, Node},
        dispatch::Dispatch,
        names::NameRules,
    },
    error::{Result, SwitchboardError},
};
use std::{collections::BTreeMap, rc::Rc};
use tracing::{debug, instrument};

/// Registry of top-level commands
pub struct App {
    commands: BTreeMap<String, Box<dyn Node>>,
    rules: Rc<NameRules>,
}

impl App {
    /// Create an empty application
    pub fn new() -> Result<Self> {
        Ok(Self {
            commands: BTreeMap::new(),
            rules: Rc::new(NameRules::new()?),
        })
    }

    /// Register a command whose flags are independent of each other.
    ///
    /// `configure` runs to completion before the command is stored. A command
    /// registered again under the same name replaces the earlier one.
    pub fn command<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        configure: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&mut Command<()>),
    {
        self.accumulating_command(name, description, configure)
    }

    /// Register a command whose value flags thread an accumulator of type `A`
    pub fn accumulating_command<A, F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        configure: F,
    ) -> Result<&mut Self>
    where
        A: 'static,
        F: FnOnce(&mut Command<A>),
    {
        let name = name.into();
        self.rules
            .check_command(&name)
            .map_err(|message| SwitchboardError::registration(name.clone(), message))?;

        let mut command =
            Command::<A>::new(name.clone(), description, None, Rc::clone(&self.rules));
        configure(&mut command);

        if !command.problems.is_empty() {
            return Err(SwitchboardError::registration(
                name,
                command.problems.join("; "),
            ));
        }

        debug!("Registered command '{}'", name);
        self.commands.insert(name, Box::new(command));
        Ok(self)
    }

    /// Whether a top-level command with this name exists
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered commands, sorted by name
    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.commands.values().map(|command| command.summary()).collect()
    }

    /// Dispatch an argument vector that does not include the program name
    #[instrument(skip(self, argv))]
    pub fn run<I, S>(&mut self, argv: I) -> Result<Dispatch>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = argv.into_iter().map(Into::into).collect();
        debug!("Dispatching {:?}", tokens);

        let Some((first, rest)) = tokens.split_first() else {
            debug!("No command given");
            return Ok(Dispatch::NoCommand);
        };
        let Some(command) = self.commands.get_mut(first) else {
            debug!("Unknown command '{}', nothing to do", first);
            return Ok(Dispatch::UnknownCommand(first.clone()));
        };

        let mut path = vec![first.clone()];
        command.dispatch(rest, &mut path)?;
        Ok(Dispatch::Executed { path })
    }

    /// Dispatch the arguments of the current process
    pub fn run_env(&mut self) -> Result<Dispatch> {
        self.run(std::env::args().skip(1))
    }
}
