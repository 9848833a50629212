use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier for a variable (a dataset column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableKey(String);

impl VariableKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariableKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for VariableKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

// ============================================================================
// Brief
// ============================================================================

/// Which optional sections of a brief should be populated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationRequest {
    /// Basic quality check for freshly ingested data
    #[serde(default)]
    pub for_ingestion: bool,
    /// Adaptive validation policy (populates temporal and validation sections)
    #[serde(default)]
    pub for_validation: bool,
    /// Hypothesis enrichment (populates the temporal section)
    #[serde(default)]
    pub for_hypothesis: bool,
    /// Analyse only the first `sample_limit` values when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_limit: Option<usize>,
}

impl ComputationRequest {
    /// True when any extended section was asked for
    pub fn wants_extended(&self) -> bool {
        self.for_ingestion || self.for_validation || self.for_hypothesis
    }
}

/// Records which flags a brief was computed with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationContext {
    pub for_ingestion: bool,
    pub for_validation: bool,
    pub for_hypothesis: bool,
}

impl From<&ComputationRequest> for ComputationContext {
    fn from(request: &ComputationRequest) -> Self {
        Self {
            for_ingestion: request.for_ingestion,
            for_validation: request.for_validation,
            for_hypothesis: request.for_hypothesis,
        }
    }
}

/// Basic descriptive statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
}

/// Distribution shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub skewness: f64,
    /// Total kurtosis (3.0 for a normal distribution)
    pub kurtosis: f64,
    pub is_normal: bool,
    /// p-value of the normality test
    #[serde(rename = "shapiro_p_value")]
    pub shapiro_p: f64,
}

impl Default for DistributionStats {
    fn default() -> Self {
        Self {
            skewness: 0.0,
            kurtosis: 3.0,
            is_normal: false,
            shapiro_p: 1.0,
        }
    }
}

/// Data quality metrics; ratios are in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityStats {
    pub missing_ratio: f64,
    pub sparsity_ratio: f64,
    pub noise_coefficient: f64,
    pub outlier_count: usize,
}

/// Categorical profile of a low-cardinality field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub is_categorical: bool,
    pub cardinality: usize,
    /// Shannon entropy in bits
    pub entropy: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mode: String,
    #[serde(default)]
    pub mode_frequency: usize,
    #[serde(default)]
    pub gini_index: f64,
}

/// Temporal structure of a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalStats {
    pub is_stationary: bool,
    pub variance_p_value: f64,
    pub adf_statistic: f64,
    pub adf_p_value: f64,
    /// Lags with significant autocorrelation, ascending
    #[serde(
        rename = "suggested_causal_lags",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub suggested_lags: Vec<usize>,
    pub autocorr_lag1: f64,
    pub stability_score: f64,
}

/// Validation policy recommended for tests involving this field
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub recommended_alpha: f64,
    pub optimal_iterations: usize,
    #[serde(rename = "use_nonparametric")]
    pub use_non_parametric: bool,
    pub requires_bootstrap: bool,
    #[serde(default)]
    pub bootstrap_samples: usize,
}

/// Statistical summary of a single variable sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalBrief {
    pub field_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    pub sample_size: usize,

    pub summary: SummaryStats,
    pub distribution: DistributionStats,
    pub quality: QualityStats,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical: Option<CategoricalStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationStats>,

    pub computation: ComputationContext,
    pub computed_at: DateTime<Utc>,
}

impl StatisticalBrief {
    /// Empty brief carrying identification and request context
    pub fn new(
        field_key: impl Into<String>,
        source: impl Into<String>,
        sample_size: usize,
        request: &ComputationRequest,
    ) -> Self {
        Self {
            field_key: field_key.into(),
            source: source.into(),
            sample_size,
            summary: SummaryStats::default(),
            distribution: DistributionStats::default(),
            quality: QualityStats::default(),
            categorical: None,
            temporal: None,
            validation: None,
            computation: ComputationContext::from(request),
            computed_at: Utc::now(),
        }
    }
}

// ============================================================================
// Senses
// ============================================================================

/// Signal strength reported by a sense
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    #[default]
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Weak => "weak",
            Signal::Moderate => "moderate",
            Signal::Strong => "strong",
            Signal::VeryStrong => "very_strong",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one sense invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenseResult {
    pub sense_name: String,
    pub effect_size: f64,
    pub p_value: f64,
    /// Always `1 - p_value`
    pub confidence: f64,
    pub signal: Signal,
    pub description: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl SenseResult {
    /// Build a result, forcing the p-value into [0, 1] and deriving confidence.
    pub fn new(
        sense_name: impl Into<String>,
        effect_size: f64,
        p_value: f64,
        signal: Signal,
        description: impl Into<String>,
    ) -> Self {
        let p_value = if p_value.is_nan() {
            1.0
        } else {
            p_value.clamp(0.0, 1.0)
        };
        Self {
            sense_name: sense_name.into(),
            effect_size: if effect_size.is_finite() { effect_size } else { 0.0 },
            p_value,
            confidence: 1.0 - p_value,
            signal,
            description: description.into(),
            metadata: Map::new(),
        }
    }

    /// Uniform "not computed" result used by every sense's input guard
    pub fn insufficient(sense_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(sense_name, 0.0, 1.0, Signal::Weak, description)
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

// ============================================================================
// Relationships
// ============================================================================

/// Family of primary test selected by the free-text test-type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestType {
    Correlation,
    Categorical,
    Difference,
    TimeSeries,
    /// Anything unrecognised: every sense runs, no primary metric
    Unspecified,
}

impl TestType {
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "correlation" | "pearson" => TestType::Correlation,
            "categorical" | "chisquare" => TestType::Categorical,
            "difference" | "ttest" => TestType::Difference,
            "timeseries" | "temporal" => TestType::TimeSeries,
            _ => TestType::Unspecified,
        }
    }
}

/// Headline statistics of a relationship test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryMetrics {
    pub effect_size: f64,
    pub p_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_statistic: Option<f64>,
    /// `[lower, upper]`, lower <= upper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_interval: Option<[f64; 2]>,
    pub interpretation: String,
}

/// Complete analysis of one variable pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipAnalysis {
    pub variable_x: VariableKey,
    pub variable_y: VariableKey,
    pub test_type: String,
    pub sample_size: usize,
    /// Brief of the primary (x) variable
    pub brief: StatisticalBrief,
    /// In sense registration order
    pub sense_results: Vec<SenseResult>,
    pub primary_metrics: PrimaryMetrics,
    pub computed_at: DateTime<Utc>,
}

/// Primary metrics without a brief or senses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickResult {
    pub test_type: String,
    pub sample_size: usize,
    pub effect_size: f64,
    pub p_value: f64,
    pub interpretation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sense_result_confidence_complements_p_value() {
        let result = SenseResult::new("spearman", 0.4, 0.02, Signal::Moderate, "x");
        assert!((result.confidence - 0.98).abs() < 1e-12);

        let clamped = SenseResult::new("spearman", f64::NAN, 1.7, Signal::Weak, "x");
        assert_eq!(clamped.p_value, 1.0);
        assert_eq!(clamped.confidence, 0.0);
        assert_eq!(clamped.effect_size, 0.0);
    }

    #[test]
    fn test_signal_serializes_snake_case() {
        let json = serde_json::to_string(&Signal::VeryStrong).unwrap();
        assert_eq!(json, "\"very_strong\"");
    }

    #[test]
    fn test_selector_aliases() {
        assert_eq!(TestType::from_selector("pearson"), TestType::Correlation);
        assert_eq!(TestType::from_selector("chisquare"), TestType::Categorical);
        assert_eq!(TestType::from_selector("ttest"), TestType::Difference);
        assert_eq!(TestType::from_selector("temporal"), TestType::TimeSeries);
        assert_eq!(TestType::from_selector("anything"), TestType::Unspecified);
    }

    #[test]
    fn test_brief_optional_sections_skipped() {
        let brief = StatisticalBrief::new("revenue", "", 3, &ComputationRequest::default());
        let json = serde_json::to_value(&brief).unwrap();
        assert!(json.get("categorical").is_none());
        assert!(json.get("source").is_none());
        assert_eq!(json["distribution"]["shapiro_p_value"], 1.0);
    }
}
