// src/checker/limiter.rs
// =============================================================================
// The one concurrency gate of an audit run.
//
// Every image probe of every page passes through the same ConcurrencyLimiter,
// so the number of probes in flight never exceeds its capacity, not even at a
// page boundary. Cloning the limiter clones a handle, not the gate.
//
// The limiter also counts work in flight and remembers the highest count it
// ever saw. The audit only logs these; tests use them to prove the cap holds.
// =============================================================================

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ConcurrencyLimiter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runs `work` once a slot is free. The slot is released when `work`
    /// finishes, whatever its outcome.
    pub async fn run<F, T>(&self, work: F) -> T
    where
        F: Future<Output = T>,
    {
        // The semaphore is owned here and never closed, so acquire cannot fail
        let _permit = self.semaphore.acquire().await.ok();

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _slot = InFlight(&self.in_flight);

        work.await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of units ever running at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

// Decrements the in-flight count on drop, including when the work panics
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
