//! Categorical profile of low-cardinality fields

use crate::types::CategoricalStats;
use std::collections::HashMap;

/// Fields with fewer distinct values than this are profiled
const MAX_PROFILED_CARDINALITY: usize = 50;
/// ...as are fields whose distinct/total ratio is below this
const MAX_PROFILED_UNIQUE_RATIO: f64 = 0.3;

/// Hash key for a float; all zeros share one bucket
pub(crate) fn float_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Distinct values with their counts, in order of first appearance
pub(crate) fn value_frequencies(data: &[f64]) -> Vec<(f64, usize)> {
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut frequencies: Vec<(f64, usize)> = Vec::new();

    for &value in data {
        let slot = *index.entry(float_key(value)).or_insert_with(|| {
            frequencies.push((value, 0));
            frequencies.len() - 1
        });
        frequencies[slot].1 += 1;
    }
    frequencies
}

pub(crate) fn distinct_count(data: &[f64]) -> usize {
    let mut seen: HashMap<u64, ()> = HashMap::with_capacity(data.len());
    for &value in data {
        seen.insert(float_key(value), ());
    }
    seen.len()
}

/// Format with 6 significant digits, switching to exponent form outside [1e-4, 1e6)
pub(crate) fn format_significant(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:.5e}", value);
    let exponent = scientific
        .split_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0);

    if !(-4..6).contains(&exponent) {
        let mantissa = scientific.split_once('e').map(|(m, _)| m).unwrap_or("");
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (5 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Whether a field has low enough cardinality to be profiled
pub(crate) fn should_profile(finite: &[f64]) -> bool {
    if finite.is_empty() {
        return false;
    }
    let unique = distinct_count(finite);
    unique < MAX_PROFILED_CARDINALITY
        || (unique as f64 / finite.len() as f64) < MAX_PROFILED_UNIQUE_RATIO
}

/// Categorical section over finite values
///
/// The mode is the most frequent value; ties go to the value seen first.
pub fn compute_categorical(finite: &[f64]) -> CategoricalStats {
    let total = finite.len();
    if total == 0 {
        return CategoricalStats::default();
    }

    let frequencies = value_frequencies(finite);
    let cardinality = frequencies.len();

    let mut entropy = 0.0;
    let mut sum_squares = 0.0;
    for &(_, count) in &frequencies {
        let p = count as f64 / total as f64;
        if p > 0.0 {
            entropy -= p * p.log2();
        }
        sum_squares += p * p;
    }

    let (mode, mode_frequency) = frequencies
        .iter()
        .fold((f64::NAN, 0usize), |best, &(value, count)| {
            if count > best.1 {
                (value, count)
            } else {
                best
            }
        });

    let max_categories = MAX_PROFILED_CARDINALITY.min(total / 10);

    CategoricalStats {
        is_categorical: cardinality <= max_categories,
        cardinality,
        entropy,
        mode: format_significant(mode),
        mode_frequency,
        gini_index: 1.0 - sum_squares,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_field_profile() {
        let mut data = vec![1.0; 50];
        data.extend(vec![0.0; 50]);
        let stats = compute_categorical(&data);

        assert!(stats.is_categorical);
        assert_eq!(stats.cardinality, 2);
        assert!((stats.entropy - 1.0).abs() < 1e-12);
        assert!((stats.gini_index - 0.5).abs() < 1e-12);
        // Tie: 1.0 appeared first
        assert_eq!(stats.mode, "1");
        assert_eq!(stats.mode_frequency, 50);
    }

    #[test]
    fn test_mode_is_deterministic() {
        let data = [3.0, 2.0, 2.0, 3.0, 7.5, 7.5, 7.5];
        let stats = compute_categorical(&data);
        assert_eq!(stats.mode, "7.5");
        assert_eq!(stats.mode_frequency, 3);
        // Too few rows for 3 categories to count as categorical
        assert!(!stats.is_categorical);
    }

    #[test]
    fn test_should_profile() {
        let continuous: Vec<f64> = (0..200).map(|i| i as f64 * 0.37).collect();
        assert!(!should_profile(&continuous));
        let few_levels: Vec<f64> = (0..200).map(|i| (i % 4) as f64).collect();
        assert!(should_profile(&few_levels));
        assert!(!should_profile(&[]));
    }

    #[test]
    fn test_signed_zero_shares_bucket() {
        assert_eq!(distinct_count(&[0.0, -0.0, 1.0]), 2);
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(3.0), "3");
        assert_eq!(format_significant(2.5), "2.5");
        assert_eq!(format_significant(1.0 / 3.0), "0.333333");
        assert_eq!(format_significant(123456.7), "123457");
        assert_eq!(format_significant(1234567.0), "1.23457e+06");
        assert_eq!(format_significant(0.00001234), "1.234e-05");
        assert_eq!(format_significant(-42.125), "-42.125");
        assert_eq!(format_significant(0.0), "0");
    }
}
