//! Error types for shell operations.
//!
//! `ShellError` covers everything the shell itself can fail with. Errors
//! raised by command code are opaque [`CommandError`] values; the REPL loop
//! only ever shows their message to the user.

use thiserror::Error;

/// Error raised by command handlers, output streams and autocomplete code.
///
/// Any error type converts into it with `?`.
pub type CommandError = anyhow::Error;

/// Result alias for command code.
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Why a prompted read ended without producing input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// `abort_read` was called while the read was pending
    #[error("Read aborted: {0}")]
    Aborted(String),

    /// The editor has no more input (terminal torn down)
    #[error("Input closed")]
    Closed,
}

/// Shell error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// Dispatch of a name with no registry entry
    #[error("Command Not Found: {0}")]
    CommandNotFound(String),

    /// Registration replaced an existing entry (logged, never returned by `register`)
    #[error("Command Already Registered: {0}")]
    CommandAlreadyRegistered(String),

    /// Command names must be non-empty and free of whitespace
    #[error("Invalid command name: {0:?}")]
    InvalidCommandName(String),

    /// Operation on an invocation context after its command finished
    #[error("Invocation context has been destroyed")]
    ContextDestroyed,

    /// The owning session is gone
    #[error("Shell session has been closed")]
    SessionClosed,

    /// Raw input is already owned by an open stream
    #[error("Raw input is already in use")]
    InputBusy,

    /// `repl()` called while a loop is already running on the session
    #[error("REPL is already running")]
    ReplActive,

    /// Quote opened but never closed
    #[error("Unterminated quote in input")]
    UnterminatedQuote,

    /// Prompted read failed
    #[error(transparent)]
    Read(#[from] ReadError),
}
