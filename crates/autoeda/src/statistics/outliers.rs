//! IQR-based outlier counting.

use crate::table::Table;
use crate::utils::{numeric_values, quantile_sorted, sort_floats};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fences and outlier count for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Values strictly outside the fences.
    pub count: usize,
}

impl ColumnOutliers {
    /// Compute fences over non-missing values. An empty column yields zeros.
    pub fn compute(column: &str, values: &[f64], multiplier: f64) -> Self {
        let mut sorted = values.to_vec();
        sort_floats(&mut sorted);

        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - multiplier * iqr;
        let upper_fence = q3 + multiplier * iqr;
        let count = sorted
            .iter()
            .filter(|v| **v < lower_fence || **v > upper_fence)
            .count();

        Self {
            column: column.to_string(),
            q1,
            q3,
            iqr,
            lower_fence,
            upper_fence,
            count,
        }
    }
}

pub(crate) fn outlier_breakdown(
    table: &Table,
    numeric: &[String],
    multiplier: f64,
) -> Vec<ColumnOutliers> {
    numeric
        .iter()
        .filter_map(|name| {
            match table.series(name).and_then(|s| Ok(numeric_values(s)?)) {
                Ok(values) => Some(ColumnOutliers::compute(name, &values, multiplier)),
                Err(e) => {
                    warn!("Skipping '{}' in outlier count: {}", name, e);
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn outlier_count(table: &Table, numeric: &[String], multiplier: f64) -> usize {
    outlier_breakdown(table, numeric, multiplier)
        .iter()
        .map(|c| c.count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_single_extreme_value() {
        let mut values = vec![10.0; 99];
        values.push(1000.0);
        let result = ColumnOutliers::compute("sales", &values, 1.5);
        assert_eq!(result.q1, 10.0);
        assert_eq!(result.q3, 10.0);
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_zero_variance_has_no_outliers() {
        let result = ColumnOutliers::compute("flat", &[5.0; 20], 1.5);
        assert_eq!(result.iqr, 0.0);
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_fence_boundaries_are_strict() {
        // q1 = 2.0, q3 = 4.0, iqr = 2.0, fences [-1.0, 7.0]
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 7.0, -1.0, 2.0, 4.0];
        let result = ColumnOutliers::compute("x", &values, 1.5);
        assert_eq!(result.q1, 2.0);
        assert_eq!(result.q3, 4.0);
        assert_eq!(result.lower_fence, -1.0);
        assert_eq!(result.upper_fence, 7.0);
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_empty_column() {
        let result = ColumnOutliers::compute("none", &[], 1.5);
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_count_sums_per_column() {
        let table = Table::new(
            df!(
                "a" => [1.0f64, 1.0, 1.0, 1.0, 50.0],
                "b" => [Some(2i64), Some(2), None, Some(2), Some(-40)],
                "c" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
            )
            .unwrap(),
        );
        let numeric: Vec<String> = ["a", "b", "c"].iter().map(|c| c.to_string()).collect();

        let breakdown = outlier_breakdown(&table, &numeric, 1.5);
        assert_eq!(
            breakdown.iter().map(|c| c.count).collect::<Vec<_>>(),
            vec![1, 1, 0]
        );
        assert_eq!(outlier_count(&table, &numeric, 1.5), 2);
    }

    #[test]
    fn test_unknown_column_skipped() {
        let table = Table::new(df!("a" => [1.0f64]).unwrap());
        assert_eq!(outlier_count(&table, &["missing".to_string()], 1.5), 0);
    }
}
