//! Command nodes: flags, one level of subcommands, and a terminal action

use crate::{
    core::{
        flag::{Flag, FlagRegistry, Processor},
        names::NameRules,
    },
    error::Result,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, rc::Rc};

/// Action run once flags are parsed and processed
pub(crate) enum Action {
    None,
    ZeroArg(Box<dyn FnMut() -> anyhow::Result<()>>),
    Positional(Box<dyn FnMut(&[String]) -> anyhow::Result<()>>),
}

/// Object-safe view of a command, whatever its accumulator type
pub(crate) trait Node {
    fn summary(&self) -> CommandSummary;

    /// Select this node or one of its subcommands and execute it
    fn dispatch(&mut self, tokens: &[String], path: &mut Vec<String>) -> Result<()>;
}

/// A registered command.
///
/// `A` is the accumulator threaded through the value flag processors of this
/// command in registration order. Commands whose flags are independent use `()`.
pub struct Command<A = ()> {
    pub(crate) name: String,
    pub(crate) description: String,
    /// Space separated path from the top-level command, used in errors
    pub(crate) path: String,
    depth: usize,
    pub(crate) flags: FlagRegistry<A>,
    pub(crate) subcommands: BTreeMap<String, Box<dyn Node>>,
    pub(crate) action: Action,
    rules: Rc<NameRules>,
    pub(crate) problems: Vec<String>,
}

impl<A: 'static> Command<A> {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parent: Option<&str>,
        rules: Rc<NameRules>,
    ) -> Self {
        let name = name.into();
        let path = match parent {
            Some(parent) => format!("{} {}", parent, name),
            None => name.clone(),
        };
        Self {
            name,
            description: description.into(),
            path,
            depth: usize::from(parent.is_some()),
            flags: FlagRegistry::new(),
            subcommands: BTreeMap::new(),
            action: Action::None,
            rules,
            problems: Vec::new(),
        }
    }

    /// Register a flag that takes a value.
    ///
    /// The processor receives the raw value (empty when the flag was given
    /// without one) and the accumulator returned by the previous value flag.
    pub fn flag<F>(&mut self, flag: Flag, processor: F) -> &mut Self
    where
        F: FnMut(&str, Option<A>) -> anyhow::Result<A> + 'static,
    {
        self.add_flag(flag, Processor::Value(Box::new(processor)))
    }

    /// Register a boolean flag; its processor only runs when the flag is present
    pub fn bool_flag<F>(&mut self, flag: Flag, processor: F) -> &mut Self
    where
        F: FnMut(bool) -> anyhow::Result<()> + 'static,
    {
        self.add_flag(flag, Processor::Bool(Box::new(processor)))
    }

    fn add_flag(&mut self, flag: Flag, processor: Processor<A>) -> &mut Self {
        match self.rules.check_flag(&flag) {
            Ok(()) => self.flags.register(flag, processor),
            Err(problem) => self.problems.push(problem),
        }
        self
    }

    /// Register a subcommand with independent flags
    pub fn subcommand<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        configure: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut Command<()>),
    {
        self.accumulating_subcommand(name, description, configure)
    }

    /// Register a subcommand whose value flags thread an accumulator of type `B`
    pub fn accumulating_subcommand<B, F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        configure: F,
    ) -> &mut Self
    where
        B: 'static,
        F: FnOnce(&mut Command<B>),
    {
        let name = name.into();
        if self.depth > 0 {
            self.problems.push(format!(
                "'{}' cannot have subcommand '{}': subcommands nest one level only",
                self.path, name
            ));
            return self;
        }
        if let Err(problem) = self.rules.check_command(&name) {
            self.problems.push(problem);
            return self;
        }

        let mut child = Command::<B>::new(
            name.clone(),
            description,
            Some(self.path.as_str()),
            Rc::clone(&self.rules),
        );
        configure(&mut child);

        if child.problems.is_empty() {
            self.subcommands.insert(name, Box::new(child));
        } else {
            self.problems.append(&mut child.problems);
        }
        self
    }

    /// Set an action that takes no arguments. Replaces any earlier action.
    pub fn run<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        self.action = Action::ZeroArg(Box::new(action));
        self
    }

    /// Set an action that receives the positional arguments. Replaces any earlier action.
    pub fn run_with_args<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut(&[String]) -> anyhow::Result<()> + 'static,
    {
        self.action = Action::Positional(Box::new(action));
        self
    }
}

impl<A: 'static> Node for Command<A> {
    fn summary(&self) -> CommandSummary {
        CommandSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            flags: self
                .flags
                .iter()
                .map(|flag| FlagSummary {
                    flag: flag.descriptor.clone(),
                    boolean: flag.is_boolean(),
                })
                .collect(),
            subcommands: self.subcommands.values().map(|sub| sub.summary()).collect(),
        }
    }

    fn dispatch(&mut self, tokens: &[String], path: &mut Vec<String>) -> Result<()> {
        self.route(tokens, path)
    }
}

/// Registered shape of a command, for help output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    pub name: String,
    pub description: String,
    pub flags: Vec<FlagSummary>,
    pub subcommands: Vec<CommandSummary>,
}

/// Registered shape of a flag, for help output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSummary {
    #[serde(flatten)]
    pub flag: Flag,
    pub boolean: bool,
}
