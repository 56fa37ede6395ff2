//! SharedRangeSumCache: a RangeSumCache behind one lock

use std::sync::Arc;
use parking_lot::Mutex;

use crate::error::Result;
use crate::range::{Interval, Op, RangeSumCache};

/// Thread-safe handle to a range-sum cache that owns its array
///
/// Every public method holds the lock for the whole logical operation, so an
/// invalidation scan never interleaves with another caller's insert. Clones
/// share the same array and cache.
#[derive(Clone)]
pub struct SharedRangeSumCache {
    inner: Arc<Mutex<RangeSumCache<Vec<i64>>>>,
}

impl SharedRangeSumCache {
    /// Create a shared cache owning `array`
    ///
    /// # Arguments
    /// * `array` - Backing data
    /// * `capacity` - Maximum number of cached ranges
    ///
    /// # Returns
    /// * `Result<SharedRangeSumCache>` - Fails if `capacity` is 0
    pub fn new(array: Vec<i64>, capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(RangeSumCache::try_new(array, capacity)?)),
        })
    }

    /// See [`RangeSumCache::get_range_sum`]
    pub fn get_range_sum(&self, left: usize, right: usize) -> Result<i64> {
        self.inner.lock().get_range_sum(left, right)
    }

    /// See [`RangeSumCache::update`]
    pub fn update<I>(&self, index: I, value: i64)
    where
        I: TryInto<usize>,
    {
        self.inner.lock().update(index, value);
    }

    /// See [`RangeSumCache::try_update`]
    pub fn try_update<I>(&self, index: I, value: i64) -> Result<usize>
    where
        I: TryInto<usize>,
    {
        self.inner.lock().try_update(index, value)
    }

    /// See [`RangeSumCache::apply`]
    pub fn apply(&self, op: &Op) -> Result<Option<i64>> {
        self.inner.lock().apply(op)
    }

    /// Run `f` with exclusive access, for multi-step critical sections
    pub fn with<R>(&self, f: impl FnOnce(&mut RangeSumCache<Vec<i64>>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Copy of the current array contents
    pub fn array_snapshot(&self) -> Vec<i64> {
        self.inner.lock().array().to_vec()
    }

    /// Snapshot of the cached ranges, most recently used first
    pub fn cached_ranges(&self) -> Vec<Interval> {
        self.inner.lock().cached_ranges()
    }

    /// Number of cached ranges
    pub fn cached_len(&self) -> usize {
        self.inner.lock().cached_len()
    }

    /// Current hit ratio
    pub fn hit_ratio(&self) -> f64 {
        self.inner.lock().stats().hit_ratio()
    }
}
