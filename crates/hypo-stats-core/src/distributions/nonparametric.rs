//! Rank-test p-values
//!
//! - Mann-Whitney U (normal approximation)
//! - Kruskal-Wallis H (chi-square approximation, df = k - 1)
//! - Wilcoxon signed-rank (exact for n <= 10, normal approximation above)

use super::pvalues::{chi_square_p_value, clamp_probability, normal_cdf};

/// Largest n for which the signed-rank distribution is enumerated exactly
pub const WILCOXON_EXACT_MAX_N: usize = 10;

fn two_tailed_normal(z: f64) -> f64 {
    if z.is_nan() {
        return 1.0;
    }
    clamp_probability(2.0 * (1.0 - normal_cdf(z.abs())))
}

/// Two-tailed p-value for the Mann-Whitney U statistic
pub fn mann_whitney_p_value(u_statistic: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 {
        return 1.0;
    }

    let (n1, n2) = (n1 as f64, n2 as f64);
    let mean_u = n1 * n2 / 2.0;
    let std_u = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    if std_u == 0.0 {
        return 1.0;
    }

    two_tailed_normal((u_statistic - mean_u) / std_u)
}

/// p-value for the Kruskal-Wallis H statistic over `k` groups and `n` observations
pub fn kruskal_wallis_p_value(h_statistic: f64, k: usize, n: usize) -> f64 {
    if k < 2 || n < k {
        return 1.0;
    }
    chi_square_p_value(h_statistic, (k - 1) as f64)
}

/// Two-sided p-value for the Wilcoxon signed-rank statistic W+ over `n` non-zero differences
pub fn wilcoxon_signed_rank_p_value(w_statistic: f64, n: usize) -> f64 {
    if n == 0 || w_statistic.is_nan() {
        return 1.0;
    }
    if n > WILCOXON_EXACT_MAX_N {
        return wilcoxon_normal_p_value(w_statistic, n);
    }
    wilcoxon_exact_p_value(w_statistic, n)
}

fn wilcoxon_normal_p_value(w_statistic: f64, n: usize) -> f64 {
    let n = n as f64;
    let mean_w = n * (n + 1.0) / 4.0;
    let std_w = (n * (n + 1.0) * (2.0 * n + 1.0) / 24.0).sqrt();
    if std_w == 0.0 {
        return 1.0;
    }
    two_tailed_normal((w_statistic - mean_w) / std_w)
}

/// Exact two-sided p-value by counting sign assignments of ranks 1..n
///
/// `counts[s]` is the number of the 2^n sign patterns whose positive-rank sum is `s`.
fn wilcoxon_exact_p_value(w_statistic: f64, n: usize) -> f64 {
    let total = n * (n + 1) / 2;
    let observed = w_statistic.round().clamp(0.0, total as f64) as usize;
    let tail = observed.min(total - observed);

    let mut counts = vec![0u64; total + 1];
    counts[0] = 1;
    for rank in 1..=n {
        for s in (rank..=total).rev() {
            counts[s] += counts[s - rank];
        }
    }

    let outcomes = (1u64 << n) as f64;
    let cumulative: u64 = counts[..=tail].iter().sum();
    clamp_probability(2.0 * cumulative as f64 / outcomes)
}
