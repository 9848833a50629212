//! Chi-square association between categorical-looking variables

use super::{classify_signal, finite_pairs, StatisticalSense};
use crate::brief::distinct_count;
use crate::relationship::ContingencyTable;
use crate::types::{SenseResult, VariableKey};

pub(crate) const NAME: &str = "chi_square";

const MIN_SAMPLES: usize = 4;
const MAX_CATEGORIES: usize = 20;
const MAX_UNIQUE_RATIO: f64 = 0.5;
const BANDS: [f64; 3] = [0.5, 0.3, 0.1];

/// Fewer than 20 distinct values, or fewer distinct values than half the sample
fn looks_categorical(data: &[f64]) -> bool {
    if data.is_empty() {
        return false;
    }
    let unique = distinct_count(data);
    unique < MAX_CATEGORIES || (unique as f64 / data.len() as f64) < MAX_UNIQUE_RATIO
}

#[derive(Debug, Clone)]
pub struct ChiSquareSense {
    alpha: f64,
}

impl ChiSquareSense {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl StatisticalSense for ChiSquareSense {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Tests association between categorical variables".to_string()
    }

    fn analyze(&self, x: &[f64], y: &[f64], _var_x: &VariableKey, _var_y: &VariableKey) -> SenseResult {
        let (x, y) = match finite_pairs(x, y) {
            Some(pairs) if pairs.0.len() >= MIN_SAMPLES => pairs,
            _ => return SenseResult::insufficient(NAME, "Insufficient data for chi-square analysis"),
        };
        if !looks_categorical(&x) || !looks_categorical(&y) {
            return SenseResult::insufficient(NAME, "Chi-square requires categorical data");
        }

        let table = ContingencyTable::from_pairs(&x, &y);
        if table.rows() < 2 || table.cols() < 2 {
            return SenseResult::insufficient(NAME, "Unable to create contingency table");
        }

        let test = table.test();
        let signal = classify_signal(test.cramers_v, test.p_value, self.alpha, BANDS);
        let description = if test.p_value > self.alpha {
            format!(
                "No significant categorical association (V={:.3}, p={:.3})",
                test.cramers_v, test.p_value
            )
        } else {
            format!(
                "Significant categorical association detected (V={:.3}, χ²={:.2}, p={:.3})",
                test.cramers_v, test.statistic, test.p_value
            )
        };

        SenseResult::new(NAME, test.cramers_v, test.p_value, signal, description)
            .with_metadata("chi_square_statistic", test.statistic)
            .with_metadata("degrees_of_freedom", test.degrees_of_freedom)
            .with_metadata("contingency_table_size", vec![table.rows(), table.cols()])
    }
}
