//! Linear trend against wall-clock time
//!
//! Without timestamps this sense has nothing to measure. With them it
//! correlates the x values against seconds elapsed since the first sample.

use super::{SenseContext, StatisticalSense};
use crate::relationship::pearson_r;
use crate::types::{SenseResult, Signal, VariableKey};

const MIN_SAMPLES: usize = 3;
const MAX_PSEUDO_CONFIDENCE: f64 = 0.99;

#[derive(Debug, Clone)]
pub struct TemporalSense {
    name: String,
    time_unit: String,
    alpha: f64,
}

impl TemporalSense {
    pub fn new(time_unit: impl Into<String>, alpha: f64) -> Self {
        let time_unit = time_unit.into();
        Self {
            name: Self::name_for(&time_unit),
            time_unit,
            alpha,
        }
    }

    pub fn name_for(time_unit: &str) -> String {
        format!("temporal_{}", time_unit)
    }

    /// Correlation of values with elapsed seconds; 0.0 when undefined
    fn trend(&self, x: &[f64], context: &SenseContext) -> f64 {
        let Some(origin) = context.timestamps.first() else {
            return 0.0;
        };

        let (values, elapsed): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(&context.timestamps)
            .filter(|(v, _)| v.is_finite())
            .map(|(v, ts)| (*v, (*ts - *origin).num_seconds() as f64))
            .unzip();

        if values.len() < MIN_SAMPLES {
            return 0.0;
        }
        pearson_r(&elapsed, &values).unwrap_or(0.0)
    }
}

impl StatisticalSense for TemporalSense {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Analyzes temporal patterns at {} granularity", self.time_unit)
    }

    fn analyze(&self, _x: &[f64], _y: &[f64], _var_x: &VariableKey, _var_y: &VariableKey) -> SenseResult {
        SenseResult::insufficient(self.name.clone(), "Temporal analysis requires timestamp context")
    }

    fn analyze_with_context(
        &self,
        x: &[f64],
        y: &[f64],
        var_x: &VariableKey,
        var_y: &VariableKey,
        context: Option<&SenseContext>,
    ) -> SenseResult {
        let context = match context {
            Some(context) if !context.timestamps.is_empty() => context,
            _ => return self.analyze(x, y, var_x, var_y),
        };
        if context.timestamps.len() != x.len() {
            return SenseResult::insufficient(
                self.name.clone(),
                "Temporal analysis requires timestamp data",
            );
        }

        let trend = self.trend(x, context);
        let p_value = 1.0 - trend.abs().min(MAX_PSEUDO_CONFIDENCE);

        let signal = if p_value < self.alpha && trend.abs() > 0.7 {
            Signal::Strong
        } else if p_value < self.alpha && trend.abs() > 0.5 {
            Signal::Moderate
        } else {
            Signal::Weak
        };

        let description = if p_value > self.alpha {
            format!(
                "No significant temporal trend (r={:.3}, p={:.3})",
                trend, p_value
            )
        } else {
            let direction = if trend < 0.0 { "decreasing" } else { "increasing" };
            format!(
                "{} temporal trend detected (r={:.3}, p={:.3})",
                direction, trend, p_value
            )
        };

        SenseResult::new(self.name.clone(), trend, p_value, signal, description)
            .with_metadata("time_unit", self.time_unit.as_str())
            .with_metadata("data_points", context.timestamps.len())
    }
}
