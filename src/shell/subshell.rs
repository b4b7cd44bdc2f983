//! Per-invocation context handed to a running command.
//!
//! A `SubShell` is a thin, lifetime-scoped proxy onto its session: it holds
//! only a weak back-reference, and once destroyed every operation on it
//! (and on any clone of it) fails with `ShellError::ContextDestroyed`.

use super::environment::Environment;
use super::raw::{RawInput, RawLease};
use super::Core;
use crate::error::ShellError;
use crate::io::{LineEditor, Terminal};
use core::fmt;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// State shared by every clone of one context.
pub(crate) struct ContextState<E: LineEditor, T: Terminal> {
    destroyed: Cell<bool>,
    leases: RefCell<Vec<Rc<RawLease<E, T>>>>,
}

impl<E: LineEditor, T: Terminal> ContextState<E, T> {
    fn new() -> Self {
        Self {
            destroyed: Cell::new(false),
            leases: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

/// Invocation context ("sub-shell") for one command call.
pub struct SubShell<E: LineEditor, T: Terminal> {
    shell: Weak<Core<E, T>>,
    state: Rc<ContextState<E, T>>,
}

impl<E: LineEditor, T: Terminal> SubShell<E, T> {
    pub(crate) fn new(shell: Weak<Core<E, T>>) -> Self {
        Self {
            shell,
            state: Rc::new(ContextState::new()),
        }
    }

    /// Context with no session behind it.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self::new(Weak::new())
    }

    fn core(&self) -> Result<Rc<Core<E, T>>, ShellError> {
        if self.state.is_destroyed() {
            return Err(ShellError::ContextDestroyed);
        }
        self.shell.upgrade().ok_or(ShellError::SessionClosed)
    }

    // ========================================
    // Output
    // ========================================

    /// Write text to the terminal without a newline.
    pub fn print(&self, message: &str) -> Result<(), ShellError> {
        self.core()?.print(message);
        Ok(())
    }

    /// Print a line through the line editor.
    pub fn print_line(&self, message: &str) -> Result<(), ShellError> {
        self.core()?.print_line(message);
        Ok(())
    }

    /// Print items as a multi-column list.
    pub fn print_list<S: AsRef<str>>(&self, items: &[S]) -> Result<(), ShellError> {
        self.core()?.print_list(items);
        Ok(())
    }

    /// Clear the terminal.
    pub fn clear(&self) -> Result<(), ShellError> {
        self.core()?.terminal.clear();
        Ok(())
    }

    // ========================================
    // Input
    // ========================================

    /// Prompt for a line. Fails with `ShellError::Read` if aborted.
    pub async fn read_line(&self, prompt: &str) -> Result<String, ShellError> {
        let core = self.core()?;
        Ok(core.editor.read(prompt).await?)
    }

    /// Prompt for a single character. Fails with `ShellError::Read` if aborted.
    pub async fn read_char(&self, prompt: &str) -> Result<String, ShellError> {
        let core = self.core()?;
        Ok(core.editor.read_char(prompt).await?)
    }

    /// Abort a pending `read_line` / `read_char`.
    pub fn abort_read(&self, reason: &str) -> Result<(), ShellError> {
        self.core()?.editor.abort_read(reason);
        Ok(())
    }

    /// Take raw terminal input.
    ///
    /// Detaches the line editor until the returned stream ends. Only one
    /// stream can be open at a time (`ShellError::InputBusy` otherwise); a
    /// new one may be opened after the previous one has ended.
    pub fn read_stream(&self) -> Result<RawInput<E, T>, ShellError> {
        let core = self.core()?;
        let (lease, receiver) = RawLease::acquire(&core)?;
        log::debug!("raw input opened");

        let mut leases = self.state.leases.borrow_mut();
        leases.retain(|lease| !lease.is_released());
        leases.push(Rc::clone(&lease));

        Ok(RawInput::new(receiver, lease, Rc::clone(&self.state)))
    }

    // ========================================
    // Session state
    // ========================================

    /// Registered command names.
    pub fn commands(&self) -> Result<Vec<String>, ShellError> {
        Ok(self.core()?.commands())
    }

    /// The session's environment (shared, not a copy).
    pub fn environment(&self) -> Result<Environment, ShellError> {
        Ok(self.core()?.environment.clone())
    }

    /// Terminal width.
    pub fn columns(&self) -> Result<u16, ShellError> {
        Ok(self.core()?.terminal.cols())
    }

    /// Terminal height.
    pub fn rows(&self) -> Result<u16, ShellError> {
        Ok(self.core()?.terminal.rows())
    }

    // ========================================
    // Lifecycle
    // ========================================

    /// Invalidate this context and every clone of it. Ends any open raw
    /// stream. Idempotent.
    pub fn destroy(&self) {
        if self.state.destroyed.replace(true) {
            return;
        }

        let leases = core::mem::take(&mut *self.state.leases.borrow_mut());
        for lease in leases {
            lease.release();
        }
    }

    /// True once destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state.is_destroyed()
    }
}

impl<E: LineEditor, T: Terminal> Clone for SubShell<E, T> {
    fn clone(&self) -> Self {
        Self {
            shell: Weak::clone(&self.shell),
            state: Rc::clone(&self.state),
        }
    }
}

impl<E: LineEditor, T: Terminal> fmt::Debug for SubShell<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubShell")
            .field("destroyed", &self.state.is_destroyed())
            .finish_non_exhaustive()
    }
}
