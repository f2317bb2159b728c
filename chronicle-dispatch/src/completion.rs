use crate::{DispatchError, DispatchResult};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// The caller's handle on a submitted command's outcome.
///
/// Resolves only after the command's transaction has durably committed and
/// indices are updated, so the submitting caller reads its own writes.
/// Await it from async code, or [`Completion::wait`] from a plain thread.
#[must_use = "a completion does nothing until awaited or waited on"]
#[derive(Debug)]
pub struct Completion<T> {
    receiver: oneshot::Receiver<DispatchResult<T>>,
}

impl<T> Completion<T> {
    pub(crate) fn new(receiver: oneshot::Receiver<DispatchResult<T>>) -> Self {
        Self { receiver }
    }

    /// Blocks the calling thread until the command completes.
    pub fn wait(self) -> DispatchResult<T> {
        self.receiver
            .blocking_recv()
            .unwrap_or_else(|_| Err(DispatchError::Stopped))
    }
}

impl<T> Future for Completion<T> {
    type Output = DispatchResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(DispatchError::Stopped)))
    }
}
