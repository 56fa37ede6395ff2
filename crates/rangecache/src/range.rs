//! RangeSumCache: LRU-cached range sums over a mutable array

use std::fmt;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Closed index interval `[left, right]`, the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    /// First index, inclusive
    pub left: usize,
    /// Last index, inclusive
    pub right: usize,
}

impl Interval {
    /// Create an interval; `left <= right` is not checked here
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Check whether `index` lies inside the interval
    pub fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }

    /// Number of indices covered
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left) + 1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

/// One operation in a query sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Inclusive range-sum query
    Range {
        /// First index
        left: usize,
        /// Last index
        right: usize,
    },
    /// Point assignment `array[index] = value`
    Update {
        /// Index to overwrite
        index: usize,
        /// New value
        value: i64,
    },
}

/// Range-sum cache bound to a mutable integer array
///
/// `A` is any mutable slice storage: a borrowed `&mut [i64]` / `&mut Vec<i64>`
/// or an owned `Vec<i64>`. The cache never outlives its view of the array, and
/// only this type's methods mutate either.
pub struct RangeSumCache<A> {
    array: A,
    cache: LruCache<Interval, i64>,
    stats: CacheStats,
}

impl<A> RangeSumCache<A>
where
    A: AsRef<[i64]> + AsMut<[i64]>,
{
    /// Bind a new cache of the given capacity to `array`
    ///
    /// # Panics
    /// If `capacity` is 0. Use [`RangeSumCache::try_new`] to get an error instead.
    pub fn new(array: A, capacity: usize) -> Self {
        Self {
            array,
            cache: LruCache::new(capacity),
            stats: CacheStats::new(),
        }
    }

    /// Bind a new cache to `array`, rejecting a zero capacity
    pub fn try_new(array: A, capacity: usize) -> Result<Self> {
        Ok(Self {
            array,
            cache: LruCache::try_new(capacity)?,
            stats: CacheStats::new(),
        })
    }

    /// Sum of `array[left..=right]`
    ///
    /// # Arguments
    /// * `left` - First index, inclusive
    /// * `right` - Last index, inclusive
    ///
    /// # Returns
    /// * `Result<i64>` - The sum, served from cache when possible. Reversed or
    ///   out-of-bounds ranges fail with [`Error::OutOfRangeQuery`]; a sum that
    ///   does not fit in `i64` fails with [`Error::SumOverflow`] and is not cached.
    pub fn get_range_sum(&mut self, left: usize, right: usize) -> Result<i64> {
        let len = self.len();
        if left > right || right >= len {
            return Err(Error::OutOfRangeQuery { left, right, len });
        }

        let key = Interval::new(left, right);
        if let Some(&sum) = self.cache.get(&key) {
            self.stats.record_hit();
            trace!(range = %key, sum, "range cache hit");
            return Ok(sum);
        }

        self.stats.record_miss();
        let sum = self.array.as_ref()[left..=right]
            .iter()
            .try_fold(0i64, |acc, &v| acc.checked_add(v));
        self.stats.record_scan(key.width() as u64);
        let sum = sum.ok_or(Error::SumOverflow { left, right })?;
        trace!(range = %key, sum, "range cache miss");

        self.stats.record_insert();
        if let Some((evicted, _)) = self.cache.put(key, sum) {
            self.stats.record_eviction();
            trace!(range = %evicted, "evicted least recently used range");
        }

        Ok(sum)
    }

    /// Set `array[index] = value` and drop every cached range containing `index`
    ///
    /// Indices outside the array (including negative ones) are ignored.
    pub fn update<I>(&mut self, index: I, value: i64)
    where
        I: TryInto<usize>,
    {
        if let Err(err) = self.try_update(index, value) {
            debug!(%err, "ignoring out-of-range update");
        }
    }

    /// Strict form of [`RangeSumCache::update`]
    ///
    /// # Returns
    /// * `Result<usize>` - Number of cached ranges invalidated, or
    ///   [`Error::OutOfRangeUpdate`] if `index` is outside the array. The
    ///   array and cache are untouched on error.
    pub fn try_update<I>(&mut self, index: I, value: i64) -> Result<usize>
    where
        I: TryInto<usize>,
    {
        let len = self.len();
        let index = match TryInto::<usize>::try_into(index) {
            Ok(index) if index < len => index,
            Ok(index) => return Err(Error::OutOfRangeUpdate { index: Some(index), len }),
            Err(_) => return Err(Error::OutOfRangeUpdate { index: None, len }),
        };

        self.array.as_mut()[index] = value;

        let mut removed = 0;
        for key in self.cache.keys() {
            if key.contains(index) {
                self.cache.remove(&key);
                removed += 1;
            }
        }

        if removed > 0 {
            self.stats.record_invalidations(removed as u64);
            debug!(index, removed, "invalidated cached ranges");
        }

        Ok(removed)
    }

    /// Run one operation, returning the sum for range queries
    pub fn apply(&mut self, op: &Op) -> Result<Option<i64>> {
        match *op {
            Op::Range { left, right } => self.get_range_sum(left, right).map(Some),
            Op::Update { index, value } => {
                self.update(index, value);
                Ok(None)
            }
        }
    }

    /// Current array contents
    pub fn array(&self) -> &[i64] {
        self.array.as_ref()
    }

    /// Length of the array
    pub fn len(&self) -> usize {
        self.array.as_ref().len()
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.array.as_ref().is_empty()
    }

    /// Check whether `[left, right]` is cached, without promoting it
    pub fn is_cached(&self, left: usize, right: usize) -> bool {
        self.cache.contains(&Interval::new(left, right))
    }

    /// Cached sum for `[left, right]`, without promoting it
    pub fn cached_sum(&self, left: usize, right: usize) -> Option<i64> {
        self.cache.peek(&Interval::new(left, right)).copied()
    }

    /// Snapshot of the cached ranges, most recently used first
    pub fn cached_ranges(&self) -> Vec<Interval> {
        self.cache.keys()
    }

    /// Number of cached ranges
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Clear the cache and reset statistics (the array is unchanged)
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.stats.reset();
    }

    /// Release the array
    pub fn into_inner(self) -> A {
        self.array
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        self.cache.assert_consistent();
        for key in self.cache.keys() {
            assert!(key.left <= key.right && key.right < self.len());
            let sum: i64 = self.array()[key.left..=key.right].iter().sum();
            assert_eq!(self.cache.peek(&key), Some(&sum), "stale entry {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let range = Interval::new(2, 4);

        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert_eq!(range.width(), 3);
        assert_eq!(range.to_string(), "[2, 4]");
    }

    #[test]
    fn test_range_miss_then_hit() {
        let mut array: Vec<i64> = vec![1, 2, 3, 4, 5];
        let mut cache = RangeSumCache::new(&mut array, 4);

        assert_eq!(cache.get_range_sum(0, 2), Ok(6));
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().scans(), 1);

        assert_eq!(cache.get_range_sum(0, 2), Ok(6));
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().scans(), 1);
        cache.assert_consistent();
    }

    #[test]
    fn test_range_single_element_and_full() {
        let mut array: Vec<i64> = vec![4, -7, 10];
        let mut cache = RangeSumCache::new(&mut array, 4);

        assert_eq!(cache.get_range_sum(1, 1), Ok(-7));
        assert_eq!(cache.get_range_sum(0, 2), Ok(7));
        assert_eq!(cache.stats().scanned_elements(), 4);
    }

    #[test]
    fn test_range_negative_sum_is_cached() {
        let mut array: Vec<i64> = vec![-1, 0];
        let mut cache = RangeSumCache::new(&mut array, 2);

        assert_eq!(cache.get_range_sum(0, 1), Ok(-1));
        assert_eq!(cache.get_range_sum(0, 1), Ok(-1));
        assert_eq!(cache.stats().hits(), 1);
    }

    #[test]
    fn test_range_sum_overflow() {
        let mut cache = RangeSumCache::new(vec![i64::MAX, 1, -1], 2);

        assert_eq!(
            cache.get_range_sum(0, 1),
            Err(Error::SumOverflow { left: 0, right: 1 })
        );
        assert!(!cache.is_cached(0, 1));
        assert_eq!(cache.stats().misses(), 1);

        // Still fits once the negative element is included
        assert_eq!(cache.get_range_sum(1, 2), Ok(0));
        assert_eq!(cache.get_range_sum(0, 0), Ok(i64::MAX));
    }

    #[test]
    fn test_range_out_of_bounds() {
        let mut array: Vec<i64> = vec![1, 2, 3];
        let mut cache = RangeSumCache::new(&mut array, 2);

        assert_eq!(
            cache.get_range_sum(2, 1),
            Err(Error::OutOfRangeQuery { left: 2, right: 1, len: 3 })
        );
        assert_eq!(
            cache.get_range_sum(0, 3),
            Err(Error::OutOfRangeQuery { left: 0, right: 3, len: 3 })
        );
        assert_eq!(cache.cached_len(), 0);
        assert_eq!(cache.stats().misses(), 0);
    }

    #[test]
    fn test_range_empty_array() {
        let mut array: Vec<i64> = Vec::new();
        let mut cache = RangeSumCache::new(&mut array, 1);

        assert!(cache.is_empty());
        assert!(cache.get_range_sum(0, 0).is_err());
        cache.update(0usize, 1);
        assert!(cache.array().is_empty());
    }

    #[test]
    fn test_update_invalidates_overlapping_only() {
        let mut array: Vec<i64> = vec![1, 2, 3, 4, 5];
        let mut cache = RangeSumCache::new(&mut array, 8);

        cache.get_range_sum(0, 1).unwrap();
        cache.get_range_sum(1, 3).unwrap();
        cache.get_range_sum(2, 4).unwrap();
        cache.get_range_sum(3, 3).unwrap();

        assert_eq!(cache.try_update(3usize, 10), Ok(3));

        assert!(cache.is_cached(0, 1));
        assert!(!cache.is_cached(1, 3));
        assert!(!cache.is_cached(2, 4));
        assert!(!cache.is_cached(3, 3));
        assert_eq!(cache.stats().invalidations(), 3);
        cache.assert_consistent();
    }

    #[test]
    fn test_update_boundaries_of_interval() {
        let mut array: Vec<i64> = vec![0; 6];
        let mut cache = RangeSumCache::new(&mut array, 4);

        cache.get_range_sum(1, 3).unwrap();
        cache.update(1, 5);
        assert!(!cache.is_cached(1, 3));

        cache.get_range_sum(1, 3).unwrap();
        cache.update(3, 5);
        assert!(!cache.is_cached(1, 3));

        cache.get_range_sum(1, 3).unwrap();
        cache.update(4, 5);
        cache.update(0, 5);
        assert_eq!(cache.cached_sum(1, 3), Some(10));
    }

    #[test]
    fn test_update_preserves_recency_of_survivors() {
        let mut array: Vec<i64> = vec![1, 1, 1, 1, 1];
        let mut cache = RangeSumCache::new(&mut array, 3);

        cache.get_range_sum(0, 0).unwrap();
        cache.get_range_sum(1, 1).unwrap();
        cache.get_range_sum(2, 2).unwrap();
        cache.update(1, 7);

        assert_eq!(
            cache.cached_ranges(),
            vec![Interval::new(2, 2), Interval::new(0, 0)]
        );

        cache.get_range_sum(3, 3).unwrap();
        cache.get_range_sum(4, 4).unwrap();

        // (0, 0) was the oldest survivor, so it goes first
        assert!(!cache.is_cached(0, 0));
        assert_eq!(cache.stats().evictions(), 1);
        cache.assert_consistent();
    }

    #[test]
    fn test_try_update_out_of_range() {
        let mut array: Vec<i64> = vec![1, 2, 3];
        let mut cache = RangeSumCache::new(&mut array, 2);

        assert_eq!(
            cache.try_update(3usize, 0),
            Err(Error::OutOfRangeUpdate { index: Some(3), len: 3 })
        );
        assert_eq!(
            cache.try_update(-1i64, 0),
            Err(Error::OutOfRangeUpdate { index: None, len: 3 })
        );
        assert_eq!(cache.array(), &[1, 2, 3]);
    }

    #[test]
    fn test_apply() {
        let mut cache = RangeSumCache::new(vec![1i64, 2, 3], 2);

        assert_eq!(cache.apply(&Op::Range { left: 0, right: 2 }), Ok(Some(6)));
        assert_eq!(cache.apply(&Op::Update { index: 0, value: 5 }), Ok(None));
        assert_eq!(cache.apply(&Op::Range { left: 0, right: 2 }), Ok(Some(10)));
        assert!(cache.apply(&Op::Range { left: 1, right: 9 }).is_err());
        assert_eq!(cache.into_inner(), vec![5, 2, 3]);
    }

    #[test]
    fn test_clear_cache() {
        let mut cache = RangeSumCache::new(vec![1i64, 2, 3], 2);

        cache.get_range_sum(0, 1).unwrap();
        cache.get_range_sum(0, 1).unwrap();
        cache.clear_cache();

        assert_eq!(cache.cached_len(), 0);
        assert_eq!(cache.stats().hits(), 0);
        assert_eq!(cache.array(), &[1, 2, 3]);
    }

    #[test]
    fn test_try_new_zero_capacity() {
        assert!(matches!(
            RangeSumCache::try_new(vec![1i64], 0),
            Err(Error::ZeroCapacity)
        ));
    }
}
