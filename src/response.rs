//! Response types for command execution.
//!
//! A command returns either a single eventual result or a lazy sequence of
//! output chunks. The shell inspects the variant once, at the call boundary.

use crate::error::{CommandError, CommandResult};
use core::fmt;
use core::future::Future;
use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::stream::{self, LocalBoxStream, Stream, StreamExt};

/// What a command handed back to the shell.
pub enum Response {
    /// Completes once; the shell awaits it and discards the value.
    Immediate(LocalBoxFuture<'static, CommandResult>),

    /// Chunks written in order through the context's `print` as they arrive.
    /// The first `Err` chunk ends the stream and is reported like a handler error.
    Streamed(LocalBoxStream<'static, CommandResult<String>>),
}

impl Response {
    /// Wrap a future.
    pub fn immediate<F>(future: F) -> Self
    where
        F: Future<Output = CommandResult> + 'static,
    {
        Self::Immediate(future.boxed_local())
    }

    /// Wrap a stream of output chunks.
    pub fn streamed<S>(stream: S) -> Self
    where
        S: Stream<Item = CommandResult<String>> + 'static,
    {
        Self::Streamed(stream.boxed_local())
    }

    /// Already-finished success.
    pub fn done() -> Self {
        Self::Immediate(future::ready(Ok(())).boxed_local())
    }

    /// Already-finished failure.
    pub fn fail(err: impl Into<CommandError>) -> Self {
        let err = err.into();
        Self::Immediate(future::ready(Err(err)).boxed_local())
    }

    /// Stream a fixed sequence of chunks.
    pub fn chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        I::IntoIter: 'static,
    {
        Self::streamed(stream::iter(chunks).map(|chunk| Ok(chunk.into())))
    }

    /// True for the `Streamed` variant.
    pub fn is_streamed(&self) -> bool {
        matches!(self, Self::Streamed(_))
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("Response::Immediate(..)"),
            Self::Streamed(_) => f.write_str("Response::Streamed(..)"),
        }
    }
}
