//! Contingency tables and the chi-square test of independence

use crate::brief::format_significant;
use crate::distributions::chi_square_p_value;
use std::collections::HashMap;

/// Integer values are exact within this distance
const INTEGER_TOLERANCE: f64 = 1e-9;
/// Largest magnitude at which every integer is representable in an f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Category a numeric value falls into
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Integer(i64),
    /// Six significant digits
    Label(String),
}

impl CategoryKey {
    pub fn from_value(value: f64) -> Self {
        let rounded = value.round();
        if (value - rounded).abs() < INTEGER_TOLERANCE && rounded.abs() < MAX_EXACT_INTEGER {
            CategoryKey::Integer(rounded as i64)
        } else {
            CategoryKey::Label(format_significant(value))
        }
    }
}

/// Outcome of a chi-square test on a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    pub cramers_v: f64,
}

impl ChiSquareTest {
    fn degenerate() -> Self {
        Self {
            statistic: 0.0,
            degrees_of_freedom: 0,
            p_value: 1.0,
            cramers_v: 0.0,
        }
    }
}

/// Observed counts, rows indexed by x categories and columns by y categories
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    counts: Vec<Vec<usize>>,
    total: usize,
}

impl ContingencyTable {
    /// Cross-tabulate paired values; pairs with a non-finite side are skipped
    ///
    /// Rows and columns are ordered by first appearance.
    pub fn from_pairs(x: &[f64], y: &[f64]) -> Self {
        let mut row_index: HashMap<CategoryKey, usize> = HashMap::new();
        let mut col_index: HashMap<CategoryKey, usize> = HashMap::new();
        let mut cells: Vec<(usize, usize)> = Vec::with_capacity(x.len().min(y.len()));

        for (&a, &b) in x.iter().zip(y) {
            if !a.is_finite() || !b.is_finite() {
                continue;
            }
            let next_row = row_index.len();
            let row = *row_index.entry(CategoryKey::from_value(a)).or_insert(next_row);
            let next_col = col_index.len();
            let col = *col_index.entry(CategoryKey::from_value(b)).or_insert(next_col);
            cells.push((row, col));
        }

        let mut counts = vec![vec![0usize; col_index.len()]; row_index.len()];
        for &(row, col) in &cells {
            counts[row][col] += 1;
        }

        Self {
            counts,
            total: cells.len(),
        }
    }

    /// Table from explicit counts; ragged rows are padded with zeros
    pub fn from_counts(mut counts: Vec<Vec<usize>>) -> Self {
        let width = counts.iter().map(Vec::len).max().unwrap_or(0);
        for row in counts.iter_mut() {
            row.resize(width, 0);
        }
        let total = counts.iter().flatten().sum();
        Self { counts, total }
    }

    pub fn rows(&self) -> usize {
        self.counts.len()
    }

    pub fn cols(&self) -> usize {
        self.counts.first().map(Vec::len).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// (r - 1)(c - 1), 0 for tables with fewer than two rows or columns
    pub fn degrees_of_freedom(&self) -> usize {
        if self.rows() < 2 || self.cols() < 2 {
            return 0;
        }
        (self.rows() - 1) * (self.cols() - 1)
    }

    /// Pearson chi-square statistic, Yates-corrected for 2x2 tables
    pub fn chi_square(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        let n = self.total as f64;
        let row_sums: Vec<usize> = self.counts.iter().map(|row| row.iter().sum()).collect();
        let col_sums: Vec<usize> = (0..self.cols())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect();
        let yates = self.rows() == 2 && self.cols() == 2;

        let mut chi = 0.0;
        for (row, &row_sum) in self.counts.iter().zip(&row_sums) {
            for (&observed, &col_sum) in row.iter().zip(&col_sums) {
                let expected = (row_sum * col_sum) as f64 / n;
                if expected <= 0.0 {
                    continue;
                }
                let mut diff = (observed as f64 - expected).abs();
                if yates {
                    diff = (diff - 0.5).max(0.0);
                }
                chi += diff * diff / expected;
            }
        }
        chi
    }

    /// Chi-square test with Cramer's V = sqrt(chi2 / (n * min(r - 1, c - 1)))
    pub fn test(&self) -> ChiSquareTest {
        let df = self.degrees_of_freedom();
        if self.total == 0 || df == 0 {
            return ChiSquareTest::degenerate();
        }

        let statistic = self.chi_square();
        let p_value = chi_square_p_value(statistic, df as f64);
        let min_dim = (self.rows() - 1).min(self.cols() - 1) as f64;
        let cramers_v = (statistic / (self.total as f64 * min_dim)).sqrt().clamp(0.0, 1.0);

        ChiSquareTest {
            statistic,
            degrees_of_freedom: df,
            p_value,
            cramers_v: if cramers_v.is_finite() { cramers_v } else { 0.0 },
        }
    }
}

/// Strength label for Cramer's V, gated on significance
pub fn interpret_chi_square(cramers_v: f64, p_value: f64, alpha: f64) -> String {
    if p_value > alpha {
        return format!(
            "No significant categorical association (V={:.3}, p={:.3})",
            cramers_v, p_value
        );
    }

    let strength = if cramers_v > 0.5 {
        "very strong"
    } else if cramers_v > 0.3 {
        "strong"
    } else if cramers_v > 0.1 {
        "moderate"
    } else {
        "weak"
    };
    format!(
        "{} categorical association (Cramer's V={:.3}, p={:.3})",
        strength, cramers_v, p_value
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys() {
        assert_eq!(CategoryKey::from_value(3.0), CategoryKey::Integer(3));
        assert_eq!(CategoryKey::from_value(2.9999999999), CategoryKey::Integer(3));
        assert_eq!(CategoryKey::from_value(-1.0), CategoryKey::Integer(-1));
        assert_eq!(
            CategoryKey::from_value(0.25),
            CategoryKey::Label("0.25".to_string())
        );
        assert_eq!(
            CategoryKey::from_value(1.0 / 3.0),
            CategoryKey::from_value(0.3333333)
        );
    }

    #[test]
    fn test_proportional_margins_give_zero_chi_square() {
        let table = ContingencyTable::from_counts(vec![vec![10, 20, 30], vec![20, 40, 60]]);
        assert!(table.chi_square().abs() < 1e-12);
        let test = table.test();
        assert_eq!(test.degrees_of_freedom, 2);
        assert!((test.p_value - 1.0).abs() < 1e-9);
        assert_eq!(test.cramers_v, 0.0);
    }

    #[test]
    fn test_yates_correction_on_two_by_two() {
        let table = ContingencyTable::from_counts(vec![vec![10, 20], vec![30, 40]]);
        // Expected 12/18/28/42; corrected |O - E| = 1.5 everywhere
        let expected = 1.5f64.powi(2) * (1.0 / 12.0 + 1.0 / 18.0 + 1.0 / 28.0 + 1.0 / 42.0);
        assert!((table.chi_square() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_from_pairs_skips_non_finite() {
        let x = [1.0, 1.0, 2.0, f64::NAN, 2.0, 3.0];
        let y = [0.0, 1.0, 0.0, 1.0, f64::INFINITY, 1.0];
        let table = ContingencyTable::from_pairs(&x, &y);
        assert_eq!(table.total(), 4);
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.counts(), &[vec![1, 1], vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_perfect_association() {
        let x: Vec<f64> = (0..60).map(|i| (i % 3) as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 10.0).collect();
        let test = ContingencyTable::from_pairs(&x, &y).test();
        assert_eq!(test.degrees_of_freedom, 4);
        assert!((test.cramers_v - 1.0).abs() < 1e-12);
        assert!(test.p_value < 1e-10);
        assert!(interpret_chi_square(test.cramers_v, test.p_value, 0.05).starts_with("very strong"));
    }

    #[test]
    fn test_single_column_is_degenerate() {
        let table = ContingencyTable::from_pairs(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]);
        let test = table.test();
        assert_eq!(test.p_value, 1.0);
        assert_eq!(test.statistic, 0.0);
        assert_eq!(ContingencyTable::from_counts(Vec::new()).test().p_value, 1.0);
    }
}
