//! Exact distribution mathematics
//!
//! Stateless, reentrant helpers shared by the brief computer, the
//! relationship engine and the senses. Every function returns a bounded,
//! non-NaN value for any input.

mod effect_size;
mod nonparametric;
mod power;
mod pvalues;
mod resampling;

pub use effect_size::{cohen_d, confidence_interval_mean, hedges_g};
pub use nonparametric::{
    kruskal_wallis_p_value, mann_whitney_p_value, wilcoxon_signed_rank_p_value,
    WILCOXON_EXACT_MAX_N,
};
pub use power::{sample_size_t_test, t_test_power};
pub use pvalues::{
    beta_cdf, chi_square_p_value, correlation_p_value, f_cdf, f_test_p_value, normal_cdf,
    normal_quantile, t_test_p_value,
};
pub use resampling::{
    bootstrap_confidence_interval, bootstrap_distribution, permutation_null_distribution,
    permutation_p_value, BootstrapOptions, PermutationOptions,
};

pub(crate) use pvalues::normal_critical;
