//! # rangecache
//!
//! LRU-cached range-sum queries over a mutable integer array.
//!
//! ## Architecture
//! - **HashMap**: AHash map from key to arena slot (O(1))
//! - **LRU List**: Intrusive doubly-linked list over arena slots, so both
//!   tail eviction and removal of an arbitrary key are O(1)
//! - **RangeSumCache**: Caches `[left, right]` sums, and on a point update
//!   drops exactly the cached ranges that contain the updated index
//! - **SharedRangeSumCache**: One mutex around array and cache for
//!   multi-threaded callers
//!
//! ## Example
//! ```
//! use rangecache::RangeSumCache;
//!
//! let mut array: Vec<i64> = vec![1, 2, 3, 4, 5];
//! let mut cache = RangeSumCache::new(&mut array, 16);
//!
//! assert_eq!(cache.get_range_sum(0, 2), Ok(6));
//! cache.update(1, 9);
//! assert_eq!(cache.get_range_sum(0, 2), Ok(13));
//! ```

#![warn(missing_docs)]

mod error;
mod lru;
mod range;
mod shared;
mod stats;

pub use error::{Error, Result};
pub use lru::LruCache;
pub use range::{Interval, Op, RangeSumCache};
pub use shared::SharedRangeSumCache;
pub use stats::CacheStats;
