//! Flag descriptors and the ordered registry a command keeps them in

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Processor for a value flag: receives the raw value and the accumulator
/// produced by the previous flag, and returns the next accumulator
pub type ValueProcessor<A> = Box<dyn FnMut(&str, Option<A>) -> anyhow::Result<A>>;

/// Processor for a boolean flag
pub type BoolProcessor = Box<dyn FnMut(bool) -> anyhow::Result<()>>;

/// Identity of a flag as declared by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Canonical `--long` name
    pub long: String,
    /// Optional single-character `-s` alias
    pub short: Option<char>,
    /// Human-readable description
    pub description: String,
    /// Whether dispatch fails when the flag is absent
    pub required: bool,
}

impl Flag {
    /// Create an optional flag with the given long name
    pub fn new(long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            description: String::new(),
            required: false,
        }
    }

    /// Set the short alias
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the flag as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

pub(crate) enum Processor<A> {
    Value(ValueProcessor<A>),
    Bool(BoolProcessor),
}

impl<A> Processor<A> {
    /// Run the processor; boolean flags pass the accumulator through untouched
    pub(crate) fn apply(&mut self, raw: &str, previous: Option<A>) -> anyhow::Result<Option<A>> {
        match self {
            Self::Value(process) => process(raw, previous).map(Some),
            Self::Bool(process) => {
                process(raw == "true")?;
                Ok(previous)
            }
        }
    }
}

pub(crate) struct RegisteredFlag<A> {
    pub(crate) descriptor: Flag,
    pub(crate) processor: Processor<A>,
    /// Position of the latest registration of this flag among all registrations
    registered_at: usize,
}

impl<A> RegisteredFlag<A> {
    pub(crate) fn is_boolean(&self) -> bool {
        matches!(self.processor, Processor::Bool(_))
    }
}

/// Flags of one command, keyed by long name, remembering first registration order
pub(crate) struct FlagRegistry<A> {
    entries: HashMap<String, RegisteredFlag<A>>,
    order: Vec<String>,
    registrations: usize,
}

impl<A> FlagRegistry<A> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            registrations: 0,
        }
    }

    /// Add or replace a flag. A replaced flag keeps its original position.
    pub(crate) fn register(&mut self, descriptor: Flag, processor: Processor<A>) {
        let long = descriptor.long.clone();
        let registered_at = self.registrations;
        self.registrations += 1;
        let previous = self.entries.insert(
            long.clone(),
            RegisteredFlag {
                descriptor,
                processor,
                registered_at,
            },
        );
        if previous.is_none() {
            self.order.push(long);
        }
    }

    /// Map of short alias to long name.
    ///
    /// A shared alias goes to the most recent registration, including a
    /// re-registration of a flag that keeps its earlier position.
    pub(crate) fn alias_index(&self) -> HashMap<char, String> {
        let mut flags: Vec<_> = self.entries.values().collect();
        flags.sort_by_key(|flag| flag.registered_at);
        flags
            .into_iter()
            .filter_map(|flag| {
                let descriptor = &flag.descriptor;
                descriptor.short.map(|short| (short, descriptor.long.clone()))
            })
            .collect()
    }

    pub(crate) fn get(&self, long: &str) -> Option<&RegisteredFlag<A>> {
        self.entries.get(long)
    }

    pub(crate) fn get_mut(&mut self, long: &str) -> Option<&mut RegisteredFlag<A>> {
        self.entries.get_mut(long)
    }

    /// Long names in registration order
    pub(crate) fn order(&self) -> &[String] {
        &self.order
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &RegisteredFlag<A>> {
        self.order.iter().filter_map(|long| self.entries.get(long))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}
