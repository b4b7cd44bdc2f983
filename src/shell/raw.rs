//! Raw terminal input for running commands.
//!
//! Opening a [`RawInput`] takes exclusive ownership of the terminal's input:
//! the line editor is detached and raw chunks are routed into the stream.
//! Ownership is held by a [`RawLease`], released exactly once when the
//! stream ends, is dropped, or its invocation context is destroyed.

use super::subshell::ContextState;
use super::Core;
use crate::error::ShellError;
use crate::io::{LineEditor, Subscription, Terminal};
use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use futures::Stream;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Exclusive hold on terminal input.
pub(crate) struct RawLease<E: LineEditor, T: Terminal> {
    shell: Weak<Core<E, T>>,
    subscription: RefCell<Option<T::Subscription>>,
    waker: RefCell<Option<Waker>>,
}

impl<E: LineEditor, T: Terminal> RawLease<E, T> {
    /// Detach the line editor and subscribe to raw terminal data.
    pub(crate) fn acquire(
        core: &Rc<Core<E, T>>,
    ) -> Result<(Rc<Self>, UnboundedReceiver<String>), ShellError> {
        core.detach_editor()?;

        let (sink, receiver) = mpsc::unbounded_channel();
        let subscription = core.terminal.on_data(sink);

        let lease = Rc::new(Self {
            shell: Rc::downgrade(core),
            subscription: RefCell::new(Some(subscription)),
            waker: RefCell::new(None),
        });
        Ok((lease, receiver))
    }

    pub(crate) fn is_released(&self) -> bool {
        self.subscription.borrow().is_none()
    }

    /// Dispose the subscription and hand input back to the line editor.
    /// No-op after the first call.
    pub(crate) fn release(&self) {
        let Some(mut subscription) = self.subscription.borrow_mut().take() else {
            return;
        };
        subscription.dispose();

        if let Some(core) = self.shell.upgrade() {
            core.attach_editor();
        }
        if let Some(waker) = self.waker.borrow_mut().take() {
            waker.wake();
        }
    }

    fn park(&self, waker: &Waker) {
        *self.waker.borrow_mut() = Some(waker.clone());
    }
}

/// Stream of raw input chunks, in arrival order.
///
/// Ends when the terminal's event source goes away, when the owning context
/// is destroyed, or when the stream is dropped. Single pass: once it has
/// ended it never yields again.
pub struct RawInput<E: LineEditor, T: Terminal> {
    receiver: UnboundedReceiver<String>,
    lease: Rc<RawLease<E, T>>,
    context: Rc<ContextState<E, T>>,
}

impl<E: LineEditor, T: Terminal> RawInput<E, T> {
    pub(crate) fn new(
        receiver: UnboundedReceiver<String>,
        lease: Rc<RawLease<E, T>>,
        context: Rc<ContextState<E, T>>,
    ) -> Self {
        Self {
            receiver,
            lease,
            context,
        }
    }

    /// True until the stream has ended.
    pub fn is_open(&self) -> bool {
        !self.lease.is_released() && !self.context.is_destroyed()
    }

    /// End the stream now and return input to the line editor.
    pub fn close(self) {
        self.lease.release();
    }
}

impl<E: LineEditor, T: Terminal> Stream for RawInput<E, T> {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        let this = self.get_mut();

        if this.context.is_destroyed() {
            this.lease.release();
        }
        if this.lease.is_released() {
            return Poll::Ready(None);
        }

        match this.receiver.poll_recv(cx) {
            Poll::Ready(Some(chunk)) => {
                log::trace!("raw input chunk: {:?}", chunk);
                Poll::Ready(Some(chunk))
            }
            Poll::Ready(None) => {
                log::debug!("terminal data source closed");
                this.lease.release();
                Poll::Ready(None)
            }
            Poll::Pending => {
                this.lease.park(cx.waker());
                Poll::Pending
            }
        }
    }
}

impl<E: LineEditor, T: Terminal> Drop for RawInput<E, T> {
    fn drop(&mut self) {
        self.lease.release();
    }
}

impl<E: LineEditor, T: Terminal> fmt::Debug for RawInput<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawInput")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
