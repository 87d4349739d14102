//! Bounded task admission
//!
//! A semaphore caps how many tasks hold a slot at once. Slots are acquired
//! before a task is spawned and released when the task drops its slot, so
//! the number of live tasks never exceeds the capacity. The limiter also
//! records the highest number of slots ever held at once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Default)]
struct SlotCounters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Caps concurrent tasks and tracks the observed peak
#[derive(Debug, Clone)]
pub struct TaskSlots {
    semaphore: Arc<Semaphore>,
    counters: Arc<SlotCounters>,
    capacity: usize,
}

/// Held by a running task; releases its slot when dropped
#[derive(Debug)]
pub struct TaskSlot {
    _permit: OwnedSemaphorePermit,
    counters: Arc<SlotCounters>,
}

impl TaskSlots {
    /// Creates a limiter with `capacity` slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            counters: Arc::new(SlotCounters::default()),
            capacity,
        }
    }

    /// Waits for a free slot
    ///
    /// # Returns
    ///
    /// * `Some(TaskSlot)` - A slot, held until dropped
    /// * `None` - The semaphore was closed
    pub async fn acquire(&self) -> Option<TaskSlot> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;

        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(now, Ordering::SeqCst);

        Some(TaskSlot {
            _permit: permit,
            counters: self.counters.clone(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of slots held at the same time
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
