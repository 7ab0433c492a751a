//! Idempotency cache for the sync uplink.
//!
//! At-least-once delivery means the same measurement can arrive at the
//! uplink more than once: the queue persists the dequeue only after the
//! uplink accepts, so a crash in between replays the record. The cache
//! tracks accepted measurement ids; a replay is acknowledged without a
//! second archive insert.
//!
//! Bounded to protect against unbounded growth on long-lived devices;
//! eviction is oldest-first, and the archive itself remains the
//! authoritative backstop for anything evicted here.

use shared_types::MeasurementId;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// Default maximum number of remembered ids.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Thread-safe seen-set of accepted measurement ids.
#[derive(Debug)]
pub struct IdempotencyCache {
    inner: Mutex<CacheInner>,
}

#[derive(Debug)]
struct CacheInner {
    seen: HashSet<MeasurementId>,
    order: VecDeque<MeasurementId>,
    capacity: usize,
}

impl IdempotencyCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                seen: HashSet::new(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Records `id` as accepted.
    ///
    /// # Returns
    /// - `true`: the id is fresh; process the record
    /// - `false`: the id was already accepted; acknowledge idempotently
    pub fn check_and_insert(&self, id: MeasurementId) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.seen.contains(&id) {
            return false;
        }
        if inner.order.len() >= inner.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.seen.remove(&evicted);
            }
        }
        inner.seen.insert(id);
        inner.order.push_back(id);
        true
    }

    /// Number of remembered ids.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.seen.len())
            .unwrap_or(0)
    }

    /// Returns true if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IdempotencyCache {
    fn default() -> Self {
        Self::new()
    }
}
