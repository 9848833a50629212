//! Pairwise relationship analysis
//!
//! The [`RelationshipEngine`] combines a brief of the primary variable, the
//! senses relevant to the requested test type and a primary test whose
//! effect size, p-value and interpretation headline the result.

mod contingency;
mod correlation;
mod difference;

pub use contingency::{interpret_chi_square, CategoryKey, ChiSquareTest, ContingencyTable};
pub use correlation::{
    correlation_confidence_interval, interpret_correlation, pearson, pearson_r,
};
pub use difference::{interpret_difference, pooled_t_test, TTestOutcome};

use chrono::Utc;
use tracing::debug;

use crate::brief::BriefComputer;
use crate::config::EngineConfig;
use crate::errors::{StatsError, StatsResult};
use crate::senses::{finite_pairs, SenseContext, SenseEngine, SenseKind};
use crate::types::{
    ComputationRequest, PrimaryMetrics, QuickResult, RelationshipAnalysis, SenseResult, TestType,
    VariableKey,
};

const BRIEF_SOURCE: &str = "pairwise";

/// Entry point for relationship analysis
#[derive(Debug)]
pub struct RelationshipEngine {
    computer: BriefComputer,
    senses: SenseEngine,
    config: EngineConfig,
}

impl Default for RelationshipEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RelationshipEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            computer: BriefComputer::new(),
            senses: SenseEngine::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn senses(&self) -> &SenseEngine {
        &self.senses
    }

    pub fn brief_computer(&self) -> &BriefComputer {
        &self.computer
    }

    /// Full analysis of `x` against `y`
    ///
    /// `test_type` selects the primary test and the senses that run:
    /// `correlation`/`pearson`, `categorical`/`chisquare`, `difference`/`ttest`,
    /// `timeseries`/`temporal`; anything else runs every sense.
    ///
    /// # Errors
    /// `DimensionMismatch` when the lengths differ, `EmptyInput` when both are empty.
    pub fn analyze_relationship(
        &self,
        x: &[f64],
        y: &[f64],
        test_type: &str,
        var_x: &VariableKey,
        var_y: &VariableKey,
    ) -> StatsResult<RelationshipAnalysis> {
        self.analyze_relationship_with_context(x, y, test_type, var_x, var_y, None)
    }

    /// As [`analyze_relationship`](Self::analyze_relationship), passing `context` to the senses
    pub fn analyze_relationship_with_context(
        &self,
        x: &[f64],
        y: &[f64],
        test_type: &str,
        var_x: &VariableKey,
        var_y: &VariableKey,
        context: Option<&SenseContext>,
    ) -> StatsResult<RelationshipAnalysis> {
        check_lengths(x, y)?;

        let request = ComputationRequest {
            for_validation: true,
            for_hypothesis: true,
            ..Default::default()
        };
        let brief = self
            .computer
            .compute_brief(x, var_x.as_str(), BRIEF_SOURCE, &request)?;

        let kind = TestType::from_selector(test_type);
        let sense_results = self.run_senses(kind, x, y, var_x, var_y, context);
        let primary_metrics = self.primary_metrics(kind, x, y);

        debug!(
            var_x = %var_x,
            var_y = %var_y,
            test_type,
            sample_size = x.len(),
            senses = sense_results.len(),
            p_value = primary_metrics.p_value,
            "relationship analysed"
        );

        Ok(RelationshipAnalysis {
            variable_x: var_x.clone(),
            variable_y: var_y.clone(),
            test_type: test_type.to_string(),
            sample_size: x.len(),
            brief,
            sense_results,
            primary_metrics,
            computed_at: Utc::now(),
        })
    }

    /// Primary metrics only, for `correlation` and `difference`
    ///
    /// # Errors
    /// `DimensionMismatch` when the lengths differ.
    pub fn quick_analysis(&self, x: &[f64], y: &[f64], test_type: &str) -> StatsResult<QuickResult> {
        check_lengths(x, y)?;

        let mut result = QuickResult {
            test_type: test_type.to_string(),
            sample_size: x.len(),
            effect_size: 0.0,
            p_value: 1.0,
            interpretation: "Test type not supported for quick analysis".to_string(),
        };

        match test_type {
            "correlation" => {
                let metrics = self.correlation_metrics(x, y);
                result.effect_size = metrics.effect_size;
                result.p_value = metrics.p_value;
                result.interpretation = metrics.interpretation;
            }
            "difference" => {
                let metrics = self.difference_metrics(x, y);
                result.effect_size = metrics.effect_size;
                result.p_value = metrics.p_value;
                result.interpretation = metrics.interpretation;
            }
            _ => {}
        }

        Ok(result)
    }

    fn run_senses(
        &self,
        kind: TestType,
        x: &[f64],
        y: &[f64],
        var_x: &VariableKey,
        var_y: &VariableKey,
        context: Option<&SenseContext>,
    ) -> Vec<SenseResult> {
        let subset: &[SenseKind] = match kind {
            TestType::Correlation => &[
                SenseKind::MutualInformation,
                SenseKind::Spearman,
                SenseKind::CrossCorrelation,
            ],
            TestType::Categorical => &[SenseKind::ChiSquare],
            TestType::TimeSeries => &[SenseKind::Temporal],
            TestType::Difference | TestType::Unspecified => {
                return self
                    .senses
                    .analyze_all_with_context(x, y, var_x, var_y, context);
            }
        };

        subset
            .iter()
            .filter_map(|sense| {
                let name = sense.sense_name(&self.config);
                self.senses
                    .analyze_single_with_context(&name, x, y, var_x, var_y, context)
            })
            .collect()
    }

    fn primary_metrics(&self, kind: TestType, x: &[f64], y: &[f64]) -> PrimaryMetrics {
        match kind {
            TestType::Correlation => self.correlation_metrics(x, y),
            TestType::Categorical => self.categorical_metrics(x, y),
            TestType::Difference => self.difference_metrics(x, y),
            TestType::TimeSeries | TestType::Unspecified => PrimaryMetrics {
                effect_size: 0.0,
                p_value: 1.0,
                test_statistic: None,
                confidence_interval: None,
                interpretation: "Test type not supported".to_string(),
            },
        }
    }

    fn correlation_metrics(&self, x: &[f64], y: &[f64]) -> PrimaryMetrics {
        let (x, y) = finite_pairs(x, y).unwrap_or_default();
        let (r, p_value) = pearson(&x, &y);
        PrimaryMetrics {
            effect_size: r,
            p_value,
            test_statistic: None,
            confidence_interval: Some(correlation_confidence_interval(
                r,
                x.len(),
                self.config.confidence_level,
            )),
            interpretation: interpret_correlation(r, p_value, self.config.significance_level),
        }
    }

    fn categorical_metrics(&self, x: &[f64], y: &[f64]) -> PrimaryMetrics {
        let test = ContingencyTable::from_pairs(x, y).test();
        PrimaryMetrics {
            effect_size: test.cramers_v,
            p_value: test.p_value,
            test_statistic: Some(test.statistic),
            confidence_interval: None,
            interpretation: interpret_chi_square(
                test.cramers_v,
                test.p_value,
                self.config.significance_level,
            ),
        }
    }

    fn difference_metrics(&self, x: &[f64], y: &[f64]) -> PrimaryMetrics {
        let finite = |data: &[f64]| -> Vec<f64> { data.iter().copied().filter(|v| v.is_finite()).collect() };
        let outcome = pooled_t_test(&finite(x), &finite(y));
        PrimaryMetrics {
            effect_size: outcome.cohen_d,
            p_value: outcome.p_value,
            test_statistic: Some(outcome.t_statistic),
            confidence_interval: None,
            interpretation: interpret_difference(
                outcome.cohen_d,
                outcome.p_value,
                self.config.significance_level,
            ),
        }
    }
}

fn check_lengths(x: &[f64], y: &[f64]) -> StatsResult<()> {
    if x.len() != y.len() {
        return Err(StatsError::DimensionMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signal;

    fn keys() -> (VariableKey, VariableKey) {
        (VariableKey::from("spend"), VariableKey::from("revenue"))
    }

    #[test]
    fn test_length_mismatch_fails_before_computing() {
        let (vx, vy) = keys();
        let err = RelationshipEngine::default()
            .analyze_relationship(&[1.0, 2.0, 3.0], &[1.0, 2.0], "correlation", &vx, &vy)
            .unwrap_err();
        assert_eq!(err, StatsError::DimensionMismatch { x_len: 3, y_len: 2 });
    }

    #[test]
    fn test_empty_pair_fails() {
        let (vx, vy) = keys();
        let err = RelationshipEngine::default()
            .analyze_relationship(&[], &[], "correlation", &vx, &vy)
            .unwrap_err();
        assert_eq!(err, StatsError::EmptyInput { field: "data" });
    }

    #[test]
    fn test_perfect_correlation() {
        let (vx, vy) = keys();
        let analysis = RelationshipEngine::default()
            .analyze_relationship(
                &[1.0, 2.0, 3.0, 4.0, 5.0],
                &[2.0, 4.0, 6.0, 8.0, 10.0],
                "correlation",
                &vx,
                &vy,
            )
            .unwrap();

        let metrics = &analysis.primary_metrics;
        assert_eq!(metrics.effect_size, 1.0);
        assert!(metrics.p_value < 0.001);
        assert!(metrics.interpretation.contains("very strong"));
        assert!(metrics.interpretation.contains("positive"));
        assert_eq!(metrics.confidence_interval, Some([1.0, 1.0]));

        let names: Vec<&str> = analysis.sense_results.iter().map(|r| r.sense_name.as_str()).collect();
        assert_eq!(names, vec!["mutual_information", "spearman", "cross_correlation"]);
        assert_eq!(analysis.brief.field_key, "spend");
        assert_eq!(analysis.brief.source, "pairwise");
        assert!(analysis.brief.validation.is_some());
        assert!(analysis.brief.temporal.is_some());
    }

    #[test]
    fn test_categorical_dispatch() {
        let (vx, vy) = keys();
        let x: Vec<f64> = (0..60).map(|i| (i % 2) as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 - v).collect();
        let analysis = RelationshipEngine::default()
            .analyze_relationship(&x, &y, "chisquare", &vx, &vy)
            .unwrap();

        assert_eq!(analysis.sense_results.len(), 1);
        assert_eq!(analysis.sense_results[0].sense_name, "chi_square");
        assert!(analysis.primary_metrics.test_statistic.unwrap() > 50.0);
        assert!(analysis.primary_metrics.p_value < 1e-10);
        assert!(analysis.primary_metrics.interpretation.starts_with("very strong"));
    }

    #[test]
    fn test_difference_runs_every_sense() {
        let (vx, vy) = keys();
        let x: Vec<f64> = (0..20).map(|i| 10.0 + (i % 5) as f64).collect();
        let y: Vec<f64> = (0..20).map(|i| 2.0 + (i % 5) as f64).collect();
        let engine = RelationshipEngine::default();
        let analysis = engine.analyze_relationship(&x, &y, "ttest", &vx, &vy).unwrap();

        assert_eq!(analysis.sense_results.len(), engine.senses().len());
        assert!(analysis.primary_metrics.effect_size > 0.8);
        assert!(analysis.primary_metrics.interpretation.starts_with("large"));
    }

    #[test]
    fn test_timeseries_with_context() {
        use chrono::{Duration, TimeZone};

        let (vx, vy) = keys();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let context = SenseContext::with_timestamps(
            (0..20).map(|d| start + Duration::days(d)).collect(),
        );
        let x: Vec<f64> = (0..20).map(|d| d as f64 * 3.0).collect();
        let y = vec![1.0; 20];

        let analysis = RelationshipEngine::default()
            .analyze_relationship_with_context(&x, &y, "temporal", &vx, &vy, Some(&context))
            .unwrap();
        assert_eq!(analysis.sense_results.len(), 1);
        assert_eq!(analysis.sense_results[0].sense_name, "temporal_day");
        assert_eq!(analysis.sense_results[0].signal, Signal::Strong);
        assert_eq!(analysis.primary_metrics.interpretation, "Test type not supported");
        assert_eq!(analysis.primary_metrics.p_value, 1.0);
    }

    #[test]
    fn test_quick_analysis() {
        let engine = RelationshipEngine::default();
        let quick = engine
            .quick_analysis(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0], "correlation")
            .unwrap();
        assert_eq!(quick.effect_size, 1.0);
        assert_eq!(quick.sample_size, 5);

        let unsupported = engine.quick_analysis(&[1.0, 2.0], &[3.0, 4.0], "categorical").unwrap();
        assert_eq!(unsupported.interpretation, "Test type not supported for quick analysis");
        assert_eq!(unsupported.p_value, 1.0);

        assert!(engine.quick_analysis(&[1.0], &[1.0, 2.0], "difference").is_err());
    }

    #[test]
    fn test_custom_significance_level() {
        let config = EngineConfig {
            significance_level: 0.001,
            ..Default::default()
        };
        let engine = RelationshipEngine::new(config);
        // r is about 0.75 at n = 10, p about 0.013
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y = [0.0, 2.0, 1.0, 4.0, 3.0, 8.0, 5.0, 6.0, 9.0, 4.0];
        let quick = engine.quick_analysis(&x, &y, "correlation").unwrap();
        assert!(quick.p_value > 0.001 && quick.p_value < 0.05, "p = {}", quick.p_value);
        assert!(quick.interpretation.starts_with("No statistically significant"));
    }
}
