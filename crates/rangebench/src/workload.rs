//! Synthetic query workloads: mostly hot ranges, some random ones, a few updates

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rangecache::Op;

/// Parameters for workload generation
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Array length
    pub len: usize,
    /// Number of operations to generate
    pub queries: usize,
    /// Number of distinct hot ranges
    pub hot_pool: usize,
    /// Probability that a range query picks a hot range
    pub p_hot: f64,
    /// Probability that an operation is an update
    pub p_update: f64,
    /// Upper bound for array and update values (lower bound is 1)
    pub max_value: i64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            len: 100_000,
            queries: 50_000,
            hot_pool: 30,
            p_hot: 0.95,
            p_update: 0.03,
            max_value: 100,
        }
    }
}

impl WorkloadConfig {
    /// Reject configurations the generator cannot honour
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.len > 0, "array length must be at least 1");
        anyhow::ensure!(self.hot_pool > 0, "hot pool must hold at least 1 range");
        anyhow::ensure!(self.max_value >= 1, "max value must be at least 1");
        let worst = i64::try_from(self.len)
            .ok()
            .and_then(|len| len.checked_mul(self.max_value));
        anyhow::ensure!(
            worst.is_some(),
            "len {} * max value {} overflows a 64-bit range sum",
            self.len,
            self.max_value
        );
        for (name, p) in [("p-hot", self.p_hot), ("p-update", self.p_update)] {
            anyhow::ensure!((0.0..=1.0).contains(&p), "{} must be within [0, 1], got {}", name, p);
        }
        Ok(())
    }
}

/// Deterministic generator when seeded, entropy-seeded otherwise
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Array of `len` values drawn from `[1, max_value]`
pub fn base_array(config: &WorkloadConfig, rng: &mut impl Rng) -> Vec<i64> {
    (0..config.len).map(|_| rng.gen_range(1..=config.max_value)).collect()
}

/// Generate the operation sequence
///
/// Hot ranges start in the first half of the array and end in the second.
pub fn make_queries(config: &WorkloadConfig, rng: &mut impl Rng) -> Vec<Op> {
    let n = config.len;
    let hot: Vec<(usize, usize)> = (0..config.hot_pool)
        .map(|_| (rng.gen_range(0..=n / 2), rng.gen_range(n / 2..n)))
        .collect();

    (0..config.queries)
        .map(|_| {
            if rng.gen_bool(config.p_update) {
                Op::Update {
                    index: rng.gen_range(0..n),
                    value: rng.gen_range(1..=config.max_value),
                }
            } else if rng.gen_bool(config.p_hot) {
                let &(left, right) = hot.choose(&mut *rng).unwrap_or(&(0, n - 1));
                Op::Range { left, right }
            } else {
                let left = rng.gen_range(0..n);
                let right = rng.gen_range(left..n);
                Op::Range { left, right }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn small() -> WorkloadConfig {
        WorkloadConfig {
            len: 50,
            queries: 2_000,
            hot_pool: 5,
            ..WorkloadConfig::default()
        }
    }

    #[test]
    fn test_queries_in_bounds() {
        let config = small();
        let ops = make_queries(&config, &mut rng(Some(7)));

        assert_eq!(ops.len(), config.queries);
        for op in ops {
            match op {
                Op::Range { left, right } => assert!(left <= right && right < config.len),
                Op::Update { index, value } => {
                    assert!(index < config.len);
                    assert!((1..=config.max_value).contains(&value));
                }
            }
        }
    }

    #[test]
    fn test_hot_ranges_dominate() {
        let config = WorkloadConfig {
            len: 10_000,
            ..small()
        };
        let ops = make_queries(&config, &mut rng(Some(1)));

        let distinct: HashSet<_> = ops
            .iter()
            .filter(|op| matches!(op, Op::Range { .. }))
            .collect();
        // 5 hot ranges plus roughly 5% random ones
        assert!(distinct.len() < 300);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let config = small();

        let a = make_queries(&config, &mut rng(Some(42)));
        let b = make_queries(&config, &mut rng(Some(42)));

        assert_eq!(a, b);
    }

    #[test]
    fn test_base_array_values() {
        let config = small();
        let array = base_array(&config, &mut rng(Some(3)));

        assert_eq!(array.len(), 50);
        assert!(array.iter().all(|v| (1..=100).contains(v)));
    }

    #[test]
    fn test_validate() {
        assert!(WorkloadConfig::default().validate().is_ok());
        assert!(WorkloadConfig { len: 0, ..small() }.validate().is_err());
        assert!(WorkloadConfig { p_hot: 1.5, ..small() }.validate().is_err());
        assert!(WorkloadConfig { p_update: -0.1, ..small() }.validate().is_err());
        assert!(WorkloadConfig { max_value: i64::MAX, ..small() }.validate().is_err());
        assert!(WorkloadConfig { max_value: i64::MAX / 50, ..small() }.validate().is_ok());
    }
}
