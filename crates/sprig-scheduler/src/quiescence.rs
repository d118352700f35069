use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tokio::sync::watch;

/// Counts in-flight indexing jobs and signals when the count drops to zero.
///
/// Async callers await [`Quiescence::wait`]; synchronous callers use
/// [`Quiescence::wait_blocking`].
#[derive(Clone, Debug)]
pub struct Quiescence {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    in_flight: Mutex<usize>,
    idle: Condvar,
    tx: watch::Sender<usize>,
}

impl Default for Quiescence {
    fn default() -> Self {
        Self::new()
    }
}

impl Quiescence {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                in_flight: Mutex::new(0),
                idle: Condvar::new(),
                tx,
            }),
        }
    }

    /// Mark one job as started; it ends when the guard drops.
    pub fn begin(&self) -> QuiescenceGuard {
        let mut in_flight = self.inner.in_flight.lock();
        *in_flight += 1;
        self.inner.tx.send_replace(*in_flight);
        QuiescenceGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        *self.inner.in_flight.lock()
    }

    pub fn is_quiescent(&self) -> bool {
        self.in_flight() == 0
    }

    pub async fn wait(&self) {
        let mut rx = self.inner.tx.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|in_flight| *in_flight == 0).await;
    }

    pub fn wait_blocking(&self) {
        let mut in_flight = self.inner.in_flight.lock();
        while *in_flight > 0 {
            self.inner.idle.wait(&mut in_flight);
        }
    }

    /// `true` if quiescence was reached before `timeout` elapsed.
    pub fn wait_blocking_timeout(&self, timeout: Duration) -> bool {
        let mut in_flight = self.inner.in_flight.lock();
        if *in_flight == 0 {
            return true;
        }
        let _ = self
            .inner
            .idle
            .wait_while_for(&mut in_flight, |n| *n > 0, timeout);
        *in_flight == 0
    }
}

/// Keeps one job counted while alive.
#[must_use = "the job ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct QuiescenceGuard {
    inner: Arc<Inner>,
}

impl Drop for QuiescenceGuard {
    fn drop(&mut self) {
        let mut in_flight = self.inner.in_flight.lock();
        *in_flight = in_flight.saturating_sub(1);
        self.inner.tx.send_replace(*in_flight);
        if *in_flight == 0 {
            self.inner.idle.notify_all();
        }
    }
}
