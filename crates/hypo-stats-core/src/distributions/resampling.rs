//! Resampling methods
//!
//! - Permutation p-value from a null distribution
//! - Percentile bootstrap confidence interval
//! - Generators for bootstrap and permutation null distributions

use rand::prelude::*;
use rand::rngs::StdRng;

/// Fraction of null statistics at least as extreme as the observed one
///
/// Two-tailed compares absolute values; one-tailed counts `null >= observed`.
/// An empty null distribution gives 1.0.
pub fn permutation_p_value(observed: f64, null_distribution: &[f64], two_tailed: bool) -> f64 {
    if null_distribution.is_empty() || observed.is_nan() {
        return 1.0;
    }

    let extreme = null_distribution
        .iter()
        .filter(|&&null| {
            if two_tailed {
                null.abs() >= observed.abs()
            } else {
                null >= observed
            }
        })
        .count();

    extreme as f64 / null_distribution.len() as f64
}

/// Percentile confidence interval over bootstrap replicates
///
/// Indices are `round((len - 1) * percentile)`, clamped to the sample bounds.
/// A level outside (0, 1) falls back to 0.95; no samples gives `(0.0, 0.0)`.
pub fn bootstrap_confidence_interval(samples: &[f64], confidence_level: f64) -> (f64, f64) {
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() {
        return (0.0, 0.0);
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let level = if confidence_level > 0.0 && confidence_level < 1.0 {
        confidence_level
    } else {
        0.95
    };
    let alpha = 1.0 - level;
    let last = sorted.len() - 1;

    let index = |percentile: f64| ((last as f64 * percentile).round() as usize).min(last);
    let lower = sorted[index(alpha / 2.0)];
    let upper = sorted[index(1.0 - alpha / 2.0)];

    (lower, upper)
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Options for bootstrap resampling
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Number of bootstrap replicates
    pub n_bootstrap: usize,
    /// Optional seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            n_bootstrap: 2000,
            seed: None,
        }
    }
}

/// Replicates of `statistic` over resamples drawn with replacement
pub fn bootstrap_distribution<F>(data: &[f64], statistic: F, options: &BootstrapOptions) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if data.is_empty() {
        return Vec::new();
    }

    let mut rng = rng_from_seed(options.seed);
    let mut resample = vec![0.0; data.len()];

    (0..options.n_bootstrap)
        .map(|_| {
            for slot in resample.iter_mut() {
                *slot = data[rng.gen_range(0..data.len())];
            }
            statistic(&resample)
        })
        .collect()
}

/// Options for permutation testing
#[derive(Debug, Clone)]
pub struct PermutationOptions {
    /// Number of permutations
    pub n_permutations: usize,
    /// Optional seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for PermutationOptions {
    fn default() -> Self {
        Self {
            n_permutations: 2500,
            seed: None,
        }
    }
}

/// Null distribution of a paired statistic obtained by shuffling `y` against `x`
pub fn permutation_null_distribution<F>(
    x: &[f64],
    y: &[f64],
    statistic: F,
    options: &PermutationOptions,
) -> Vec<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    if x.is_empty() || x.len() != y.len() {
        return Vec::new();
    }

    let mut rng = rng_from_seed(options.seed);
    let mut shuffled = y.to_vec();

    (0..options.n_permutations)
        .map(|_| {
            shuffled.shuffle(&mut rng);
            statistic(x, &shuffled)
        })
        .collect()
}
