// src/engine/limiter.rs

//! Bounded admission for asynchronous jobs.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

/// The limiter was closed before the job could be admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("limiter closed; job was not started")]
pub struct LimiterClosed;

/// A held unit of capacity. Capacity returns to the limiter on drop.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

/// Admits at most `concurrency` jobs at a time, in the order they asked.
///
/// Waiters are served FIFO (tokio's semaphore is fair), so admission order is
/// call order. Capacity is tied to a [`Slot`]: a job that panics or returns
/// an error still releases its slot when it settles.
///
/// In sequential mode the limiter still admits up to `concurrency` jobs; it
/// only advertises that the caller wants their observable effects in
/// submission order (see [`crate::output::OutputSequencer`]).
#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    sequential: bool,
}

impl Limiter {
    /// `concurrency` is clamped to at least 1; a zero-capacity limiter would
    /// never admit anything.
    pub fn new(concurrency: usize) -> Self {
        debug_assert!(concurrency >= 1, "concurrency must be >= 1");
        let concurrency = concurrency.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            sequential: false,
        }
    }

    pub fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    pub fn is_sequential(&self) -> bool {
        self.sequential
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Slots currently held.
    pub fn active(&self) -> usize {
        self.concurrency - self.semaphore.available_permits()
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> Result<Slot, LimiterClosed> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| LimiterClosed)?;
        Ok(Slot { _permit: permit })
    }

    /// Wait for a slot, run `job` while holding it, and hand back the job's
    /// own result unchanged.
    pub async fn run<F, Fut>(&self, job: F) -> Result<Fut::Output, LimiterClosed>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let slot = self.acquire().await?;
        let output = job().await;
        drop(slot);
        Ok(output)
    }

    /// Wait for a slot, then run `job` on its own tokio task. The slot is
    /// released when that task ends, however it ends.
    ///
    /// Awaiting only covers admission, so calling `spawn` in a loop admits
    /// jobs strictly in loop order while letting them run concurrently.
    pub async fn spawn<F, Fut>(&self, job: F) -> Result<JoinHandle<Fut::Output>, LimiterClosed>
    where
        F: FnOnce() -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let slot = self.acquire().await?;
        let fut = job();
        Ok(tokio::spawn(async move {
            let _slot = slot;
            fut.await
        }))
    }

    /// Stop admitting: pending and future `acquire` calls fail with
    /// [`LimiterClosed`]. Jobs already running are unaffected.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }
}
