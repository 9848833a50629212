//! Engine configuration
//!
//! Every field has a compiled default; a TOML document only needs to name the
//! values it overrides.

use serde::{Deserialize, Serialize};

use crate::errors::{StatsError, StatsResult};

/// How tied values are ranked by the Spearman sense
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieMethod {
    /// Ties keep their scan order and receive distinct consecutive ranks
    #[default]
    Ordinal,
    /// Ties share the mean of the ranks they span
    Average,
}

impl TieMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieMethod::Ordinal => "ordinal",
            TieMethod::Average => "average",
        }
    }
}

/// Settings shared by the relationship engine and the senses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Significance gate for interpretations and sense signals
    pub significance_level: f64,
    /// Level of the correlation confidence interval
    pub confidence_level: f64,
    /// Run the sense fan-out on the rayon pool
    pub parallel_senses: bool,
    /// Neighbour count of the mutual information estimator
    pub mutual_information_k: usize,
    /// Lags are scanned over `-max..=max`
    pub cross_correlation_max_lag: usize,
    /// Suffix of the temporal sense name
    pub temporal_time_unit: String,
    pub spearman_ties: TieMethod,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            confidence_level: 0.95,
            parallel_senses: true,
            mutual_information_k: 5,
            cross_correlation_max_lag: 10,
            temporal_time_unit: "day".to_string(),
            spearman_ties: TieMethod::Ordinal,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(toml_str: &str) -> StatsResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| StatsError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is inside its domain
    pub fn validate(&self) -> StatsResult<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(StatsError::InvalidConfig(
                "significance_level must be in (0, 1)".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(StatsError::InvalidConfig(
                "confidence_level must be in (0, 1)".to_string(),
            ));
        }
        if self.mutual_information_k == 0 {
            return Err(StatsError::InvalidConfig(
                "mutual_information_k must be at least 1".to_string(),
            ));
        }
        if self.cross_correlation_max_lag == 0 {
            return Err(StatsError::InvalidConfig(
                "cross_correlation_max_lag must be at least 1".to_string(),
            ));
        }
        if self.temporal_time_unit.trim().is_empty() {
            return Err(StatsError::InvalidConfig(
                "temporal_time_unit cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.spearman_ties, TieMethod::Ordinal);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            significance_level = 0.01
            spearman_ties = "average"
            "#,
        )
        .unwrap();
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.spearman_ties, TieMethod::Average);
        assert_eq!(config.cross_correlation_max_lag, 10);
        assert_eq!(config.temporal_time_unit, "day");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = EngineConfig::from_toml("significance_level = 1.5").unwrap_err();
        assert!(matches!(err, StatsError::InvalidConfig(_)));

        let err = EngineConfig::from_toml("mutual_information_k = 0").unwrap_err();
        assert!(matches!(err, StatsError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = EngineConfig::from_toml("significance_level = [").unwrap_err();
        assert!(matches!(err, StatsError::ConfigParse(_)));

        let err = EngineConfig::from_toml("spearman_ties = \"dense\"").unwrap_err();
        assert!(matches!(err, StatsError::ConfigParse(_)));
    }
}
