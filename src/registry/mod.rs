//! Command registry.
//!
//! Name-to-handler bindings plus an optional autocomplete provider per
//! command. Pure storage and lookup; nothing here runs a handler.

use crate::error::ShellError;
use crate::io::{LineEditor, Terminal};
use crate::response::Response;
use crate::shell::parser::Args;
use crate::shell::SubShell;
use core::fmt;
use std::rc::Rc;

pub mod completion;

/// An executable command.
///
/// Closures `Fn(SubShell<E, T>, Args) -> Response` implement this
/// automatically.
pub trait Command<E: LineEditor, T: Terminal> {
    /// Start the command. The context is only valid until the returned
    /// response settles (or its stream is exhausted).
    fn execute(&self, shell: SubShell<E, T>, args: Args) -> Response;
}

impl<E, T, F> Command<E, T> for F
where
    E: LineEditor,
    T: Terminal,
    F: Fn(SubShell<E, T>, Args) -> Response,
{
    fn execute(&self, shell: SubShell<E, T>, args: Args) -> Response {
        self(shell, args)
    }
}

/// Completion provider for a command's own arguments.
///
/// `index` is relative to the first argument; `args` excludes the command name.
pub trait Autocomplete {
    /// Return unfiltered candidates for the argument at `index`.
    fn complete(&self, index: usize, args: &[String]) -> Vec<String>;
}

impl<F> Autocomplete for F
where
    F: Fn(usize, &[String]) -> Vec<String>,
{
    fn complete(&self, index: usize, args: &[String]) -> Vec<String> {
        self(index, args)
    }
}

/// One registered command.
pub struct Entry<E: LineEditor, T: Terminal> {
    name: String,
    command: Rc<dyn Command<E, T>>,
    autocomplete: Option<Rc<dyn Autocomplete>>,
}

impl<E: LineEditor, T: Terminal> Entry<E, T> {
    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command handler
    pub fn command(&self) -> &Rc<dyn Command<E, T>> {
        &self.command
    }

    /// Autocomplete provider, if the command has one
    pub fn autocomplete(&self) -> Option<&Rc<dyn Autocomplete>> {
        self.autocomplete.as_ref()
    }
}

impl<E: LineEditor, T: Terminal> Clone for Entry<E, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            command: Rc::clone(&self.command),
            autocomplete: self.autocomplete.clone(),
        }
    }
}

impl<E: LineEditor, T: Terminal> fmt::Debug for Entry<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("autocomplete", &self.autocomplete.is_some())
            .finish_non_exhaustive()
    }
}

/// Command registry, in registration order.
pub struct Registry<E: LineEditor, T: Terminal> {
    entries: Vec<Entry<E, T>>,
}

impl<E: LineEditor, T: Terminal> Registry<E, T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind `name` to `command`.
    ///
    /// Re-registering a name replaces the earlier entry in place and logs a
    /// warning. Fails only for names that are empty or contain whitespace,
    /// which the tokenizer could never produce.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        command: Rc<dyn Command<E, T>>,
        autocomplete: Option<Rc<dyn Autocomplete>>,
    ) -> Result<&mut Self, ShellError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ShellError::InvalidCommandName(name));
        }

        let entry = Entry {
            name,
            command,
            autocomplete,
        };

        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => {
                log::warn!(
                    "{}; replacing previous handler",
                    ShellError::CommandAlreadyRegistered(entry.name.clone())
                );
                *existing = entry;
            }
            None => self.entries.push(entry),
        }

        Ok(self)
    }

    /// True if `name` is bound.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up the entry bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Entry<E, T>> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E: LineEditor, T: Terminal> Default for Registry<E, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: LineEditor, T: Terminal> fmt::Debug for Registry<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
