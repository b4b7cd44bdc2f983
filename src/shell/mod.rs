//! Shell session and REPL loop.
//!
//! The `Shell` owns the command registry, the environment and the
//! line-editor attachment state. `repl()` reads a line, dispatches it to a
//! fresh [`SubShell`], destroys that context and loops. It is the single
//! error boundary: nothing a command does can end the session.

use crate::config::ShellConfig;
use crate::error::{CommandResult, ReadError, ShellError};
use crate::io::{LineEditor, Terminal};
use crate::registry::{completion, Autocomplete, Command, Entry, Registry};
use crate::response::Response;
use core::fmt;
use futures::StreamExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// Sub-modules
#[cfg(feature = "builtins")]
pub mod builtins;
pub mod environment;
pub mod parser;
pub mod raw;
pub mod subshell;

// Re-export key types
pub use environment::Environment;
pub use parser::{Args, FlagValue, Flags};
pub use raw::RawInput;
pub use subshell::SubShell;

/// Dynamic prompt function.
type PromptProvider = Rc<dyn Fn(&Environment) -> String>;

/// Session state shared between the `Shell` handle and its contexts.
pub(crate) struct Core<E: LineEditor, T: Terminal> {
    editor: E,
    terminal: T,
    registry: RefCell<Registry<E, T>>,
    environment: Environment,
    /// True while the line editor owns raw key events
    attached: Cell<bool>,
    prompt: RefCell<Option<PromptProvider>>,
    /// True while `repl()` is running
    running: Cell<bool>,
    config: ShellConfig,
}

impl<E: LineEditor, T: Terminal> Core<E, T> {
    fn print(&self, message: &str) {
        self.terminal.write(message);
    }

    fn print_line(&self, message: &str) {
        self.editor.println(message);
    }

    fn print_list<S: AsRef<str>>(&self, items: &[S]) {
        let items: Vec<String> = items.iter().map(|s| s.as_ref().to_string()).collect();
        self.editor.print_wide(&items);
    }

    fn commands(&self) -> Vec<String> {
        self.registry.borrow().names()
    }

    fn autocomplete(&self, index: usize, tokens: &[String]) -> Vec<String> {
        completion::resolve(&self.registry.borrow(), index, tokens)
    }

    /// Hand raw input to a command. Fails if something already holds it.
    pub(crate) fn detach_editor(&self) -> Result<(), ShellError> {
        if !self.attached.get() {
            return Err(ShellError::InputBusy);
        }
        self.editor.detach();
        self.attached.set(false);
        log::debug!("line editor detached");
        Ok(())
    }

    /// Give raw input back to the line editor.
    pub(crate) fn attach_editor(&self) {
        if self.attached.get() {
            return;
        }
        self.editor.attach();
        self.attached.set(true);
        log::debug!("line editor attached");
    }
}

/// Destroys its context when dropped, whichever way dispatch ends.
struct Invocation<E: LineEditor, T: Terminal>(SubShell<E, T>);

impl<E: LineEditor, T: Terminal> Drop for Invocation<E, T> {
    fn drop(&mut self) {
        self.0.destroy();
    }
}

/// Clears the running flag when `repl()` returns or is cancelled.
struct ReplGuard<'a>(&'a Cell<bool>);

impl Drop for ReplGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Interactive shell session.
///
/// A cheap handle: clones share the same session. Generic over:
/// - `E`: LineEditor implementation
/// - `T`: Terminal implementation
pub struct Shell<E: LineEditor, T: Terminal> {
    core: Rc<Core<E, T>>,
}

impl<E: LineEditor, T: Terminal> Clone for Shell<E, T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<E: LineEditor, T: Terminal> fmt::Debug for Shell<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("commands", &self.core.commands())
            .field("attached", &self.core.attached.get())
            .field("environment", &self.core.environment.vars())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Construction & registration
// ============================================================================

impl<E, T> Shell<E, T>
where
    E: LineEditor + 'static,
    T: Terminal + 'static,
{
    /// Create a shell with the default configuration.
    ///
    /// The line editor is assumed to be attached already. Call `activate()`
    /// before `repl()` to print the banner and install completion.
    pub fn new(editor: E, terminal: T) -> Self {
        Self::with_config(editor, terminal, ShellConfig::default())
    }

    /// Create a shell from a configuration.
    pub fn with_config(editor: E, terminal: T, config: ShellConfig) -> Self {
        let environment = Environment::from(config.environment.clone());
        Self {
            core: Rc::new(Core {
                editor,
                terminal,
                registry: RefCell::new(Registry::new()),
                environment,
                attached: Cell::new(true),
                prompt: RefCell::new(None),
                running: Cell::new(false),
                config,
            }),
        }
    }

    /// Print the welcome banner and install the autocomplete handler.
    pub fn activate(&self) {
        if let Some(welcome) = &self.core.config.welcome {
            self.core.print_line(welcome);
        }

        #[cfg(feature = "completion")]
        {
            let core = Rc::downgrade(&self.core);
            self.core
                .editor
                .add_autocomplete_handler(Box::new(move |index: usize, tokens: &[String]| {
                    core.upgrade()
                        .map(|core| core.autocomplete(index, tokens))
                        .unwrap_or_default()
                }));
        }
    }

    /// Register a command. Re-registering a name replaces it (with a warning).
    pub fn register<F>(&self, name: &str, handler: F) -> Result<&Self, ShellError>
    where
        F: Fn(SubShell<E, T>, Args) -> Response + 'static,
    {
        self.register_command(name, Rc::new(handler), None)
    }

    /// Register a command with an autocomplete provider for its arguments.
    pub fn register_with_autocomplete<F, P>(
        &self,
        name: &str,
        handler: F,
        autocomplete: P,
    ) -> Result<&Self, ShellError>
    where
        F: Fn(SubShell<E, T>, Args) -> Response + 'static,
        P: Fn(usize, &[String]) -> Vec<String> + 'static,
    {
        self.register_command(name, Rc::new(handler), Some(Rc::new(autocomplete)))
    }

    /// Register any [`Command`] implementation.
    pub fn register_command(
        &self,
        name: &str,
        command: Rc<dyn Command<E, T>>,
        autocomplete: Option<Rc<dyn Autocomplete>>,
    ) -> Result<&Self, ShellError> {
        self.core
            .registry
            .borrow_mut()
            .register(name, command, autocomplete)?;
        Ok(self)
    }

    /// True if `name` is registered.
    pub fn has(&self, name: &str) -> bool {
        self.core.registry.borrow().has(name)
    }

    /// Registry entry for `name`.
    pub fn get(&self, name: &str) -> Option<Entry<E, T>> {
        self.core.registry.borrow().get(name).cloned()
    }

    /// Registered command names, in registration order.
    pub fn commands(&self) -> Vec<String> {
        self.core.commands()
    }

    /// Completion candidates for the token at `index` (unfiltered).
    pub fn autocomplete(&self, index: usize, tokens: &[String]) -> Vec<String> {
        self.core.autocomplete(index, tokens)
    }
}

// ============================================================================
// Session state & I/O primitives
// ============================================================================

impl<E, T> Shell<E, T>
where
    E: LineEditor + 'static,
    T: Terminal + 'static,
{
    /// The session environment (shared handle).
    pub fn environment(&self) -> Environment {
        self.core.environment.clone()
    }

    /// Compute the prompt from the environment on every read.
    pub fn set_prompt<F>(&self, provider: F)
    where
        F: Fn(&Environment) -> String + 'static,
    {
        *self.core.prompt.borrow_mut() = Some(Rc::new(provider));
    }

    /// Current prompt text.
    pub fn prompt(&self) -> String {
        let provider = self.core.prompt.borrow().clone();
        match provider {
            Some(provider) => provider(&self.core.environment),
            None => self.core.config.prompt.clone(),
        }
    }

    /// True while the line editor owns raw input.
    pub fn is_attached(&self) -> bool {
        self.core.attached.get()
    }

    /// Write text to the terminal.
    pub fn print(&self, message: &str) {
        self.core.print(message);
    }

    /// Print a line through the line editor.
    pub fn print_line(&self, message: &str) {
        self.core.print_line(message);
    }

    /// Print items as a multi-column list.
    pub fn print_list<S: AsRef<str>>(&self, items: &[S]) {
        self.core.print_list(items);
    }

    /// Prompt for a line.
    pub async fn read_line(&self, prompt: &str) -> Result<String, ShellError> {
        Ok(self.core.editor.read(prompt).await?)
    }

    /// Prompt for a single character.
    pub async fn read_char(&self, prompt: &str) -> Result<String, ShellError> {
        Ok(self.core.editor.read_char(prompt).await?)
    }

    /// Abort a pending read.
    pub fn abort_read(&self, reason: &str) {
        self.core.editor.abort_read(reason);
    }

    /// Clear the terminal.
    pub fn clear(&self) {
        self.core.terminal.clear();
    }

    /// Terminal width.
    pub fn cols(&self) -> u16 {
        self.core.terminal.cols()
    }

    /// Terminal height.
    pub fn rows(&self) -> u16 {
        self.core.terminal.rows()
    }

    /// The line editor.
    pub fn editor(&self) -> &E {
        &self.core.editor
    }

    /// The terminal surface.
    pub fn terminal(&self) -> &T {
        &self.core.terminal
    }
}

// ============================================================================
// Dispatch & REPL
// ============================================================================

impl<E, T> Shell<E, T>
where
    E: LineEditor + 'static,
    T: Terminal + 'static,
{
    /// Tokenize, parse and dispatch one line.
    ///
    /// An empty line is a no-op. The invocation context is destroyed before
    /// this returns, on every path. Errors are returned, not reported.
    pub async fn execute(&self, line: &str) -> CommandResult {
        let argv = parser::tokenize(line)?;
        let Some((name, rest)) = argv.split_first() else {
            return Ok(());
        };

        let entry = self
            .get(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.clone()))?;
        let args = parser::parse_args(rest);
        log::debug!(
            "dispatching `{}` ({} args, {} flags)",
            name,
            args.positional.len(),
            args.flags.len()
        );

        let invocation = Invocation(SubShell::new(Rc::downgrade(&self.core)));
        match entry.command().execute(invocation.0.clone(), args) {
            Response::Immediate(future) => future.await,
            Response::Streamed(mut chunks) => {
                while let Some(chunk) = chunks.next().await {
                    invocation.0.print(&chunk?)?;
                }
                Ok(())
            }
        }
    }

    /// Run the read-eval-print loop.
    ///
    /// Returns when the line editor reports its input closed, or immediately
    /// with `ShellError::ReplActive` if a loop is already running on this
    /// session. Command failures are logged, shown as one line, and the
    /// loop carries on.
    pub async fn repl(&self) -> Result<(), ShellError> {
        if self.core.running.replace(true) {
            return Err(ShellError::ReplActive);
        }
        let _guard = ReplGuard(&self.core.running);

        loop {
            let prompt = self.prompt();
            let line = match self.core.editor.read(&prompt).await {
                Ok(line) => line,
                Err(ReadError::Aborted(reason)) => {
                    log::debug!("prompt aborted: {}", reason);
                    continue;
                }
                Err(ReadError::Closed) => {
                    log::debug!("line editor closed, leaving repl");
                    return Ok(());
                }
            };

            if let Err(err) = self.execute(&line).await {
                log::error!("`{}` failed: {:?}", line.trim(), err);
                self.core.print_line(&err.to_string());
            }
        }
    }
}
