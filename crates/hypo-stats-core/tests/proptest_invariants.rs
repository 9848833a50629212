//! Property-based tests for numeric contracts.
//!
//!   - Every p-value lands in [0, 1] and is never NaN
//!   - Correlation confidence intervals are ordered and clamped
//!   - Brief quality ratios stay in [0, 1] with missing values present
//!   - The sense engine fills every registry slot, in order

use proptest::prelude::*;

use hypo_stats_core::distributions::{
    beta_cdf, bootstrap_confidence_interval, chi_square_p_value, correlation_p_value,
    f_test_p_value, kruskal_wallis_p_value, mann_whitney_p_value, normal_quantile,
    t_test_p_value, wilcoxon_signed_rank_p_value,
};
use hypo_stats_core::relationship::{correlation_confidence_interval, pearson};
use hypo_stats_core::{BriefComputer, ComputationRequest, EngineConfig, SenseEngine, VariableKey};

fn probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

/// Values with occasional missing entries and exact zeros
fn messy_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -1e4f64..1e4,
        1 => Just(0.0),
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn paired_sample(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (0usize..max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(-100.0f64..100.0, n),
            prop::collection::vec(-100.0f64..100.0, n),
        )
    })
}

// ═══════════════════════════════════════════════════════════════════
// Distributions
// ═══════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_t_test_p_value_bounded(t in prop::num::f64::ANY, df in -5.0f64..500.0) {
        let p = t_test_p_value(t, df);
        prop_assert!(probability(p), "t={} df={} p={}", t, df, p);
    }

    #[test]
    fn prop_correlation_p_value_bounded(r in -1.5f64..1.5, n in 0usize..1000) {
        let p = correlation_p_value(r, n);
        prop_assert!(probability(p), "r={} n={} p={}", r, n, p);
    }

    #[test]
    fn prop_tail_p_values_bounded(
        stat in prop::num::f64::ANY,
        df1 in -2.0f64..50.0,
        df2 in -2.0f64..50.0,
    ) {
        prop_assert!(probability(chi_square_p_value(stat, df1)));
        prop_assert!(probability(f_test_p_value(stat, df1, df2)));
        prop_assert!(probability(beta_cdf(stat, df1, df2)));
    }

    #[test]
    fn prop_rank_test_p_values_bounded(
        stat in -1000.0f64..1000.0,
        n1 in 0usize..40,
        n2 in 0usize..40,
    ) {
        prop_assert!(probability(mann_whitney_p_value(stat, n1, n2)));
        prop_assert!(probability(kruskal_wallis_p_value(stat.abs(), n1 % 6, n2)));
        prop_assert!(probability(wilcoxon_signed_rank_p_value(stat, n1)));
    }

    #[test]
    fn prop_normal_quantile_finite(p in prop::num::f64::ANY) {
        prop_assert!(normal_quantile(p).is_finite());
    }

    #[test]
    fn prop_bootstrap_interval_ordered(
        samples in prop::collection::vec(-1e3f64..1e3, 0..200),
        level in 0.0f64..1.2,
    ) {
        let (lower, upper) = bootstrap_confidence_interval(&samples, level);
        prop_assert!(lower <= upper);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Relationship metrics
// ═══════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_correlation_interval_ordered(
        r in -1.0f64..=1.0,
        n in 0usize..2000,
        level in 0.5f64..0.999,
    ) {
        let [lower, upper] = correlation_confidence_interval(r, n, level);
        prop_assert!(lower <= upper, "[{}, {}]", lower, upper);
        prop_assert!((-1.0..=1.0).contains(&lower));
        prop_assert!((-1.0..=1.0).contains(&upper));
    }

    #[test]
    fn prop_pearson_effect_bounded((x, y) in paired_sample(60)) {
        let (r, p) = pearson(&x, &y);
        prop_assert!((-1.0..=1.0).contains(&r));
        prop_assert!(probability(p));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Briefs
// ═══════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_brief_quality_ratios_bounded(data in prop::collection::vec(messy_value(), 1..300)) {
        let request = ComputationRequest {
            for_validation: true,
            for_hypothesis: true,
            ..Default::default()
        };
        let brief = BriefComputer::new()
            .compute_brief(&data, "field", "", &request)
            .unwrap();

        prop_assert_eq!(brief.sample_size, data.len());
        prop_assert!(probability(brief.quality.missing_ratio));
        prop_assert!(probability(brief.quality.sparsity_ratio));
        prop_assert!(probability(brief.quality.noise_coefficient));
        prop_assert!(probability(brief.distribution.shapiro_p));

        let temporal = brief.temporal.unwrap();
        prop_assert!(probability(temporal.variance_p_value));
        prop_assert!(probability(temporal.adf_p_value));
        prop_assert!(temporal.suggested_lags.len() <= 3);

        let validation = brief.validation.unwrap();
        prop_assert!([0.001, 0.005, 0.01].contains(&validation.recommended_alpha));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sense engine
// ═══════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_registry_slot_populated((x, y) in paired_sample(60)) {
        let engine = SenseEngine::new(&EngineConfig::default());
        let results = engine.analyze_all(&x, &y, &VariableKey::from("x"), &VariableKey::from("y"));

        prop_assert_eq!(results.len(), engine.len());
        for (result, name) in results.iter().zip(engine.available_senses()) {
            prop_assert_eq!(&result.sense_name, &name);
            prop_assert!(probability(result.p_value));
            prop_assert!((result.confidence - (1.0 - result.p_value)).abs() < 1e-12);
            prop_assert!(result.effect_size.is_finite());
            prop_assert!(!result.description.is_empty());
        }
    }
}
