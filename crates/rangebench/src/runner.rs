//! Run one operation sequence cached and uncached, and compare

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rangecache::{Op, RangeSumCache};
use serde::Serialize;
use tracing::{info, warn};

use crate::baseline;

/// Outcome of a benchmark run
#[derive(Debug, Serialize)]
pub struct Report {
    /// Operations executed per implementation
    pub operations: usize,
    /// Uncached wall time in seconds
    pub uncached_secs: f64,
    /// Cached wall time in seconds
    pub cached_secs: f64,
    /// `uncached_secs / cached_secs`
    pub speedup: f64,
    /// Cache capacity used
    pub capacity: usize,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
    /// Computed sums stored in the cache
    pub inserts: u64,
    /// Hit ratio (0.0 to 1.0)
    pub hit_ratio: f64,
    /// Least recently used evictions
    pub evictions: u64,
    /// Entries dropped by updates
    pub invalidations: u64,
    /// Range results that differed between implementations
    pub mismatches: usize,
}

/// Results of the range queries in order, plus elapsed time
struct Run {
    sums: Vec<i64>,
    elapsed: Duration,
}

fn run_uncached(array: &mut [i64], ops: &[Op]) -> Result<Run> {
    let mut sums = Vec::with_capacity(ops.len());
    let start = Instant::now();
    for op in ops {
        match *op {
            Op::Range { left, right } => {
                let sum = baseline::range_sum(array, left, right).with_context(|| {
                    format!("invalid or overflowing range [{}, {}]", left, right)
                })?;
                sums.push(sum);
            }
            Op::Update { index, value } => baseline::update(array, index, value),
        }
    }
    Ok(Run { sums, elapsed: start.elapsed() })
}

fn run_cached<A>(cache: &mut RangeSumCache<A>, ops: &[Op]) -> Result<Run>
where
    A: AsRef<[i64]> + AsMut<[i64]>,
{
    let mut sums = Vec::with_capacity(ops.len());
    let start = Instant::now();
    for op in ops {
        if let Some(sum) = cache.apply(op)? {
            sums.push(sum);
        }
    }
    Ok(Run { sums, elapsed: start.elapsed() })
}

/// Execute `ops` against two copies of `array`, uncached first
///
/// # Arguments
/// * `array` - Initial array contents (left untouched)
/// * `ops` - Operation sequence
/// * `capacity` - Cache capacity
///
/// # Returns
/// * `Result<Report>` - Timings, cache statistics and parity
pub fn run(array: &[i64], ops: &[Op], capacity: usize) -> Result<Report> {
    let mut plain = array.to_vec();
    let uncached = run_uncached(&mut plain, ops)?;
    info!("Uncached run: {:.3}s", uncached.elapsed.as_secs_f64());

    let mut data = array.to_vec();
    let mut cache = RangeSumCache::try_new(&mut data, capacity)?;
    let cached = run_cached(&mut cache, ops)?;
    info!("Cached run: {:.3}s", cached.elapsed.as_secs_f64());

    let mut mismatches = uncached
        .sums
        .iter()
        .zip(&cached.sums)
        .filter(|(a, b)| a != b)
        .count();
    mismatches += uncached.sums.len().abs_diff(cached.sums.len());
    if cache.array() != plain.as_slice() {
        warn!("Final arrays differ between cached and uncached runs");
        mismatches += 1;
    }

    let uncached_secs = uncached.elapsed.as_secs_f64();
    let cached_secs = cached.elapsed.as_secs_f64();
    let stats = cache.stats();

    Ok(Report {
        operations: ops.len(),
        uncached_secs,
        cached_secs,
        speedup: if cached_secs > 0.0 { uncached_secs / cached_secs } else { 0.0 },
        capacity,
        hits: stats.hits(),
        misses: stats.misses(),
        inserts: stats.inserts(),
        hit_ratio: stats.hit_ratio(),
        evictions: stats.evictions(),
        invalidations: stats.invalidations(),
        mismatches,
    })
}
