// src/output/mediator.rs

//! Pause/resume gate around a callback.
//!
//! [`mediate`] wraps `f` into a [`Mediated`] handle and its
//! [`MediatorControls`]. While paused, calls are queued instead of executed
//! and each returns a [`Completion`] that resolves once the queued call has
//! actually run. Queued calls are drained strictly FIFO and never dropped
//! or reordered.
//!
//! The callback runs under the mediator's lock, so it must not call back
//! into the same mediator.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

/// Resolves with the callback's return value once the mediated call ran.
///
/// Resolves with an error only if the mediator was dropped while the call was
/// still queued.
pub type Completion<R> = oneshot::Receiver<R>;

type Callback<A, R> = Box<dyn FnMut(A) -> R + Send>;
type Deferred<A, R> = Box<dyn FnOnce(&mut Callback<A, R>) + Send>;

struct Inner<A, R> {
    paused: bool,
    queue: VecDeque<Deferred<A, R>>,
    callback: Callback<A, R>,
}

impl<A, R> Inner<A, R> {
    fn drain(&mut self, count: usize) -> usize {
        let mut ran = 0;
        while ran < count {
            let Some(deferred) = self.queue.pop_front() else {
                break;
            };
            deferred(&mut self.callback);
            ran += 1;
        }
        ran
    }
}

type Shared<A, R> = Arc<Mutex<Inner<A, R>>>;

fn lock<A, R>(inner: &Shared<A, R>) -> MutexGuard<'_, Inner<A, R>> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Wrap `f` so its invocations can be held back and replayed in order.
///
/// The mediator starts un-paused.
pub fn mediate<A, R, F>(f: F) -> (Mediated<A, R>, MediatorControls<A, R>)
where
    A: Send + 'static,
    R: Send + 'static,
    F: FnMut(A) -> R + Send + 'static,
{
    let inner = Arc::new(Mutex::new(Inner {
        paused: false,
        queue: VecDeque::new(),
        callback: Box::new(f) as Callback<A, R>,
    }));

    (
        Mediated {
            inner: Arc::clone(&inner),
        },
        MediatorControls { inner },
    )
}

/// The gated version of the wrapped callback.
pub struct Mediated<A, R> {
    inner: Shared<A, R>,
}

impl<A, R> Clone for Mediated<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> std::fmt::Debug for Mediated<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("Mediated")
            .field("paused", &inner.paused)
            .field("queued", &inner.queue.len())
            .finish()
    }
}

impl<A, R> Mediated<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    /// Invoke the callback now, or queue the invocation while paused.
    pub fn call(&self, arg: A) -> Completion<R> {
        let (tx, rx) = oneshot::channel();
        let mut inner = lock(&self.inner);

        if inner.paused {
            inner.queue.push_back(Box::new(move |callback: &mut Callback<A, R>| {
                let _ = tx.send(callback(arg));
            }));
        } else {
            let _ = tx.send((inner.callback)(arg));
        }

        rx
    }

    /// Resolves once every call made before this one has run.
    pub fn settled(&self) -> Completion<()> {
        let (tx, rx) = oneshot::channel();
        let mut inner = lock(&self.inner);

        if inner.paused {
            inner.queue.push_back(Box::new(move |_: &mut Callback<A, R>| {
                let _ = tx.send(());
            }));
        } else {
            let _ = tx.send(());
        }

        rx
    }
}

/// Pause/resume handle for a [`Mediated`] callback.
pub struct MediatorControls<A, R> {
    inner: Shared<A, R>,
}

impl<A, R> Clone for MediatorControls<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> std::fmt::Debug for MediatorControls<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("MediatorControls")
            .field("paused", &inner.paused)
            .field("queued", &inner.queue.len())
            .finish()
    }
}

impl<A, R> MediatorControls<A, R> {
    /// Start queueing calls instead of running them.
    pub fn pause(&self) {
        lock(&self.inner).paused = true;
    }

    /// Un-pause and drain the whole queue before returning.
    pub fn resume(&self) {
        let mut inner = lock(&self.inner);
        inner.paused = false;
        inner.drain(usize::MAX);
    }

    /// Run up to `count` queued calls; returns how many ran.
    ///
    /// Does not change the paused state.
    pub fn next(&self, count: usize) -> usize {
        lock(&self.inner).drain(count)
    }

    /// Run every queued call; returns how many ran.
    pub fn flush(&self) -> usize {
        self.next(usize::MAX)
    }

    pub fn is_paused(&self) -> bool {
        lock(&self.inner).paused
    }

    /// Number of calls (and `settled` markers) waiting in the queue.
    pub fn queued(&self) -> usize {
        lock(&self.inner).queue.len()
    }
}
