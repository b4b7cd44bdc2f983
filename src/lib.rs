//! # nut-term
//!
//! Interactive command shell layer for terminal surfaces.
//!
//! **Key features:**
//! - **Command registry** - Named handlers with per-command argument completion
//! - **REPL loop** - One command at a time; a failing command never ends the session
//! - **Scoped contexts** - Each invocation gets a `SubShell` that goes inert when it finishes
//! - **Raw input hand-off** - Commands can take exclusive raw keystroke control and
//!   always give it back to the line editor
//!
//! The line editor and the terminal are supplied by the host through the
//! [`LineEditor`] and [`Terminal`] traits. Everything runs on one thread;
//! drive `Shell::repl()` from a current-thread executor.
//!
//! ## Optional Features
//!
//! - `completion` - Autocomplete resolution (default)
//! - `builtins` - `help`, `clear`, `env`, `set`, `unset` (default)
//! - `config` - Load [`ShellConfig`] from TOML

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod io;
pub mod registry;
pub mod response;
pub mod shell;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Collaborator traits
pub use io::{CompletionHandler, LineEditor, Subscription, Terminal};

// Configuration
pub use config::ShellConfig;

// Error types
pub use error::{CommandError, CommandResult, ReadError, ShellError};

// Registry types
pub use registry::completion::filter_candidates;
pub use registry::{Autocomplete, Command, Entry, Registry};

// Response types
pub use response::Response;

// Shell types
pub use shell::parser::{parse_args, tokenize};
pub use shell::{Args, Environment, FlagValue, Flags, RawInput, Shell, SubShell};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
