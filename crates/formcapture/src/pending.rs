//! Bridge from callback-style platform results to futures.
//!
//! Platform glue usually reports results through a one-shot callback (camera
//! finished, permission answered, location fix arrived). [`pending`] hands
//! out a [`Resolver`] for the callback side and a [`Pending`] future for the
//! controller side. A resolver dropped without being used is seen as
//! [`Settled::Cancelled`]; the consumer cancels by no longer awaiting.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Outcome of a pending platform result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    /// The platform delivered a value.
    Resolved(T),
    /// The callback side went away without delivering anything.
    Cancelled,
}

impl<T> Settled<T> {
    /// The delivered value, if any.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/// Create a linked resolver/future pair.
#[must_use]
pub fn pending<T>() -> (Resolver<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    (Resolver { tx }, Pending { rx })
}

/// The callback half. Consumed by [`resolve`](Self::resolve).
#[derive(Debug)]
pub struct Resolver<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Resolver<T> {
    /// Deliver the result.
    ///
    /// Returns the value back if the waiting side has already stopped
    /// listening.
    ///
    /// # Errors
    ///
    /// Returns `Err(value)` when nobody is awaiting the result anymore.
    pub fn resolve(self, value: T) -> Result<(), T> {
        self.tx.send(value)
    }
}

/// The awaiting half.
#[derive(Debug)]
#[must_use = "a pending result does nothing unless awaited"]
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for Pending<T> {
    type Output = Settled<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|result| match result {
            Ok(value) => Settled::Resolved(value),
            Err(_) => Settled::Cancelled,
        })
    }
}
