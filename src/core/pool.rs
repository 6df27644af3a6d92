//! Object pools for records and scratch buffers
//!
//! A pool is a lock-free free list (`crossbeam_queue::SegQueue`). It has no
//! capacity bound; under sustained concurrency it simply grows to the peak
//! number of objects in flight. Pooling only saves allocations: a disabled
//! pool allocates on every acquire and drops on every release, and the
//! logger behaves identically either way.

use super::record::Record;
use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Initial capacity of a freshly allocated scratch buffer.
pub const BUFFER_INITIAL_CAPACITY: usize = 128;

/// Objects that can be cleared before going back to a pool.
pub trait Recycle: Default {
    /// Drop any caller-derived state while keeping allocations.
    fn recycle(&mut self);

    /// Allocate a fresh object when the free list is empty.
    fn fresh() -> Self {
        Self::default()
    }
}

impl Recycle for Vec<u8> {
    fn recycle(&mut self) {
        self.clear();
    }

    fn fresh() -> Self {
        Vec::with_capacity(BUFFER_INITIAL_CAPACITY)
    }
}

pub type MessagePool = Pool<Record>;
pub type BufferPool = Pool<Vec<u8>>;

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total `acquire` calls
    pub acquired: u64,
    /// Acquires served by a fresh allocation
    pub allocated: u64,
    /// Acquires served from the free list
    pub reused: u64,
    /// Total `release` calls
    pub released: u64,
}

pub struct Pool<T: Recycle> {
    free: SegQueue<T>,
    enabled: bool,
    acquired: AtomicU64,
    allocated: AtomicU64,
    released: AtomicU64,
}

impl<T: Recycle> Pool<T> {
    pub fn new() -> Self {
        Self::with_pooling(true)
    }

    /// A pool that never retains objects.
    pub fn disabled() -> Self {
        Self::with_pooling(false)
    }

    pub fn with_pooling(enabled: bool) -> Self {
        Self {
            free: SegQueue::new(),
            enabled,
            acquired: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn acquire(&self) -> T {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        match self.free.pop() {
            Some(item) => item,
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                T::fresh()
            }
        }
    }

    #[inline]
    pub fn release(&self, mut item: T) {
        self.released.fetch_add(1, Ordering::Relaxed);
        if self.enabled {
            item.recycle();
            self.free.push(item);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of objects currently sitting in the free list.
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    pub fn stats(&self) -> PoolStats {
        let acquired = self.acquired.load(Ordering::Relaxed);
        let allocated = self.allocated.load(Ordering::Relaxed);
        PoolStats {
            acquired,
            allocated,
            reused: acquired.saturating_sub(allocated),
            released: self.released.load(Ordering::Relaxed),
        }
    }
}

impl<T: Recycle> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
