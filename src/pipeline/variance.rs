//! Conditional variance aggregation
//!
//! For one feature subset, rows are partitioned by exact match on their
//! tuple of codes, each group's outcome variance accumulates through
//! Welford's streaming update, and the groups reduce to a single weighted
//! scalar: the expected conditional variance of the outcome given the
//! subset - its irreducible-error estimate.

use std::collections::HashMap;

/// Streaming mean/variance accumulator (Welford).
#[derive(Debug, Default, Clone)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sample variance (n - 1 denominator). A single observation has no
    /// sample variance; it contributes 0 rather than being excluded - a
    /// fixed policy that downstream consumers rely on.
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }
}

/// Result of aggregating one subset.
#[derive(Debug, Clone, Copy)]
pub struct SubsetEstimate {
    /// Weighted-average within-group variance: sum over groups of
    /// |g| * Var_g, divided by N.
    pub error: f64,
    /// Number of distinct groups the subset induced.
    pub groups: usize,
}

/// Partition rows by exact match on the subset's codes and reduce the
/// within-group outcome variances into one weighted estimate.
///
/// `columns` holds one code slice per subset column; all slices and
/// `outcome` share the same length N ≥ 1. The groups always partition all
/// N rows: every row lands in exactly one group.
pub fn conditional_variance(columns: &[&[u32]], outcome: &[f64]) -> SubsetEstimate {
    let rows = outcome.len();
    let mut groups: HashMap<Vec<u32>, RunningStats> = HashMap::new();

    let mut key = vec![0u32; columns.len()];
    for row in 0..rows {
        for (slot, codes) in key.iter_mut().zip(columns) {
            *slot = codes[row];
        }
        groups
            .entry(key.clone())
            .or_default()
            .push(outcome[row]);
    }

    let weighted_sum: f64 = groups
        .values()
        .map(|stats| stats.count() as f64 * stats.sample_variance())
        .sum();

    debug_assert_eq!(
        groups.values().map(|s| s.count()).sum::<u64>(),
        rows as u64,
        "groups must partition every row"
    );

    SubsetEstimate {
        error: weighted_sum / rows as f64,
        groups: groups.len(),
    }
}
