//! Boundary traits for the line editor and the terminal surface.
//!
//! The shell never reads keys itself. A host supplies a [`LineEditor`]
//! (prompted reads, echo, printing) and a [`Terminal`] (raw input events,
//! writes, geometry) and the shell arbitrates which of the two owns input.
//!
//! All methods take `&self`: implementations are expected to use interior
//! mutability, since the shell and the running command share them on a
//! single thread.

use crate::error::ReadError;
use tokio::sync::mpsc::UnboundedSender;

/// Completion callback installed on the line editor.
///
/// Called with the index of the token under the cursor and all tokens typed
/// so far; returns unfiltered candidates.
pub type CompletionHandler = Box<dyn Fn(usize, &[String]) -> Vec<String>>;

/// Line-editing engine.
///
/// While attached, the editor consumes the terminal's raw key events for
/// line editing. While detached it must leave them alone.
pub trait LineEditor {
    /// Start consuming raw key events.
    fn attach(&self);

    /// Stop consuming raw key events.
    fn detach(&self);

    /// Read one line after printing `prompt`.
    ///
    /// Resolves with `ReadError::Aborted` if [`abort_read`](Self::abort_read)
    /// is called while pending, `ReadError::Closed` once input is gone.
    #[allow(async_fn_in_trait)]
    async fn read(&self, prompt: &str) -> Result<String, ReadError>;

    /// Read a single character after printing `prompt`.
    #[allow(async_fn_in_trait)]
    async fn read_char(&self, prompt: &str) -> Result<String, ReadError>;

    /// Abort the pending read, if any.
    fn abort_read(&self, reason: &str);

    /// Print a message followed by a newline.
    fn println(&self, message: &str);

    /// Print items as a multi-column list.
    fn print_wide(&self, items: &[String]);

    /// Install the completion callback.
    fn add_autocomplete_handler(&self, handler: CompletionHandler);
}

/// Handle returned by [`Terminal::on_data`].
pub trait Subscription {
    /// Stop delivering raw input. Called at most once by the shell.
    fn dispose(&mut self);
}

/// Raw terminal surface.
pub trait Terminal {
    /// Subscription handle type
    type Subscription: Subscription;

    /// Write text verbatim.
    fn write(&self, text: &str);

    /// Clear the screen.
    fn clear(&self);

    /// Deliver raw input chunks into `sink` until the returned handle is
    /// disposed. Dropping `sink` signals the event source itself went away.
    fn on_data(&self, sink: UnboundedSender<String>) -> Self::Subscription;

    /// Terminal width in columns.
    fn cols(&self) -> u16;

    /// Terminal height in rows.
    fn rows(&self) -> u16;
}
