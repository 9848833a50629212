//! Short human-readable labels for a brief

use crate::types::StatisticalBrief;

const SKEW_BAND: f64 = 0.5;
const LIGHT_TAILS: f64 = 2.5;
const HEAVY_TAILS: f64 = 4.0;
const NON_STATIONARY_ADF_P: f64 = 0.10;

impl StatisticalBrief {
    /// One-line description for prompt enrichment
    ///
    /// `Distribution: <shape> | Stationarity: <label> | Quality: <labels>`
    pub fn llm_summary(&self) -> String {
        format!(
            "Distribution: {} | Stationarity: {} | Quality: {}",
            self.distribution_label(),
            self.stationarity_label(),
            self.quality_label()
        )
    }

    fn distribution_label(&self) -> String {
        let skewness = self.distribution.skewness;
        let kurtosis = self.distribution.kurtosis;

        let skew = if skewness >= SKEW_BAND {
            "Right-skewed"
        } else if skewness <= -SKEW_BAND {
            "Left-skewed"
        } else {
            "Symmetric"
        };
        let tails = if kurtosis < LIGHT_TAILS {
            "Light tails"
        } else if kurtosis > HEAVY_TAILS {
            "Heavy tails"
        } else {
            "Normal tails"
        };

        if skew == "Symmetric" && tails == "Normal tails" {
            "Normal-like".to_string()
        } else {
            format!("{} ({})", skew, tails)
        }
    }

    fn stationarity_label(&self) -> &'static str {
        match &self.temporal {
            None => "Not analyzed",
            Some(t) if t.is_stationary => "Stationary",
            Some(t) if t.adf_p_value > NON_STATIONARY_ADF_P => "Non-stationary",
            Some(_) => "Borderline stationary",
        }
    }

    fn quality_label(&self) -> String {
        let quality = &self.quality;
        let mut labels = Vec::new();

        if quality.sparsity_ratio > 0.5 {
            labels.push(format!("Sparse ({:.0}% zeros)", quality.sparsity_ratio * 100.0));
        }
        labels.push(
            if quality.noise_coefficient < 0.3 {
                "Low noise"
            } else if quality.noise_coefficient < 0.7 {
                "Moderate noise"
            } else {
                "High noise"
            }
            .to_string(),
        );
        if quality.missing_ratio > 0.1 {
            labels.push(format!("Missing ({:.1}%)", quality.missing_ratio * 100.0));
        }

        labels.join(", ")
    }
}
