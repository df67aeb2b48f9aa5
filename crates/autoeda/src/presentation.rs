//! Chart-ready, read-only views over an analysis outcome.
//!
//! Nothing here draws. The view hands a rendering collaborator the data for
//! the standard diagnostic charts (histograms, box plots, category counts,
//! the missing-value heatmap, and the correlation heatmap) together with the
//! [`ChartTheme`] it should apply.

use crate::analysis::AnalysisOutcome;
use crate::config::ChartTheme;
use crate::error::Result;
use crate::loader::classification::distinct_non_null;
use crate::statistics::{ColumnOutliers, CorrelationMatrix};
use crate::table::Table;
use crate::utils::{
    is_numeric_dtype, missing_count, numeric_options, numeric_values, quantile_sorted,
    sort_floats, text_options,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Equal-width histogram. `edges` has one more element than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Five-number summary plus IQR fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub column: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub outliers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Column-major missing flags for the missing-value heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingMask {
    pub columns: Vec<String>,
    pub mask: Vec<Vec<bool>>,
}

/// Borrowed view used by chart renderers.
#[derive(Debug, Clone, Copy)]
pub struct PresentationView<'a> {
    outcome: &'a AnalysisOutcome,
}

impl<'a> PresentationView<'a> {
    pub fn new(outcome: &'a AnalysisOutcome) -> Self {
        Self { outcome }
    }

    pub fn table(&self) -> &'a Table {
        &self.outcome.dataset.table
    }

    pub fn theme(&self) -> &'a ChartTheme {
        &self.outcome.config().chart_theme
    }

    pub fn valid_numeric(&self) -> &'a [String] {
        &self.outcome.dataset.classification.valid_numeric
    }

    pub fn valid_categorical(&self) -> &'a [String] {
        &self.outcome.valid_categorical
    }

    /// `None` when fewer than two valid numeric columns exist.
    pub fn correlation_matrix(&self) -> Option<&'a CorrelationMatrix> {
        self.outcome.statistics.correlations.matrix.as_ref()
    }

    /// Non-missing values of a numeric column in row order.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<f64>> {
        Ok(numeric_values(self.table().series(column)?)?)
    }

    /// Equal-width histogram over the column's range with the configured
    /// bin count. A constant column is centered in a unit-wide range.
    pub fn histogram(&self, column: &str) -> Result<Histogram> {
        let values = self.numeric_values(column)?;
        let bins = self.outcome.config().histogram_bins.max(1);

        let (mut low, mut high) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        if values.is_empty() {
            low = 0.0;
            high = 1.0;
        } else if low == high {
            low -= 0.5;
            high += 0.5;
        }

        let width = (high - low) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| low + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in &values {
            // the last bin is closed on the right
            let idx = (((v - low) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Histogram {
            column: column.to_string(),
            edges,
            counts,
        })
    }

    pub fn box_plot(&self, column: &str) -> Result<BoxPlot> {
        let mut values = self.numeric_values(column)?;
        sort_floats(&mut values);

        let fences = ColumnOutliers::compute(column, &values, self.outcome.config().iqr_multiplier);

        Ok(BoxPlot {
            column: column.to_string(),
            min: values.first().copied().unwrap_or(0.0),
            q1: fences.q1,
            median: quantile_sorted(&values, 0.5),
            q3: fences.q3,
            max: values.last().copied().unwrap_or(0.0),
            lower_fence: fences.lower_fence,
            upper_fence: fences.upper_fence,
            outliers: fences.count,
        })
    }

    /// Categorical columns with few enough distinct values to chart.
    pub fn charted_categorical(&self) -> Vec<String> {
        let limit = self.outcome.config().chart_category_limit;
        self.outcome
            .dataset
            .classification
            .categorical
            .iter()
            .filter(|name| {
                let distinct = self
                    .table()
                    .series(name)
                    .and_then(|series| Ok(distinct_non_null(series)?));
                match distinct {
                    Ok(distinct) => distinct <= limit,
                    Err(e) => {
                        warn!("Skipping chart for '{}': {}", name, e);
                        false
                    }
                }
            })
            .cloned()
            .collect()
    }

    /// Value counts, most frequent first; ties keep first-seen order.
    pub fn category_frequencies(&self, column: &str) -> Result<Vec<CategoryCount>> {
        let values = text_options(self.table().series(column)?)?;

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values.into_iter().flatten() {
            let count = counts.entry(value.clone()).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }

        let mut frequencies: Vec<CategoryCount> = order
            .into_iter()
            .map(|value| {
                let count = counts.get(&value).copied().unwrap_or(0);
                CategoryCount { value, count }
            })
            .collect();
        frequencies.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(frequencies)
    }

    /// Per-column missing flags (null, or NaN in float columns).
    pub fn missing_mask(&self) -> Result<MissingMask> {
        let mut columns = Vec::with_capacity(self.table().width());
        let mut mask = Vec::with_capacity(self.table().width());

        for series in self.table().iter_series() {
            columns.push(series.name().to_string());
            let flags = if is_numeric_dtype(series.dtype()) {
                numeric_options(series)?.iter().map(Option::is_none).collect()
            } else {
                series.is_null().into_iter().map(|v| v.unwrap_or(true)).collect()
            };
            mask.push(flags);
        }

        Ok(MissingMask { columns, mask })
    }

    /// Number of missing entries per column, in table order.
    pub fn missing_counts(&self) -> Result<Vec<(String, usize)>> {
        self.table()
            .iter_series()
            .map(|series| Ok((series.name().to_string(), missing_count(series)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::config::AnalysisConfig;

    fn outcome(config: AnalysisConfig) -> AnalysisOutcome {
        let csv = b"price,rating,city,note\n\
                    1.0,4,A,x\n\
                    2.0,,B,y\n\
                    3.0,5,A,z\n\
                    10.0,3,C,\n\
                    4.0,4,A,w\n";
        Analyzer::new(config)
            .unwrap()
            .analyze_bytes(csv, "shop.csv")
            .unwrap()
    }

    fn permissive() -> AnalysisConfig {
        AnalysisConfig::builder()
            .min_rows(1)
            .min_columns(1)
            .histogram_bins(3)
            .chart_category_limit(3)
            .build()
            .unwrap()
    }

    #[test]
    fn test_histogram_counts_sum_to_non_missing() {
        let outcome = outcome(permissive());
        let view = outcome.presentation();

        let hist = view.histogram("price").unwrap();
        assert_eq!(hist.edges.len(), 4);
        assert_eq!(hist.counts, vec![3, 1, 1]);
        assert_eq!(hist.total(), 5);

        let hist = view.histogram("rating").unwrap();
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_histogram_constant_column() {
        let outcome = Analyzer::new(permissive())
            .unwrap()
            .analyze_bytes(b"v\n2.0\n2.0\n", "flat.csv")
            .unwrap();
        let hist = outcome.presentation().histogram("v").unwrap();
        assert_eq!(hist.edges.first(), Some(&1.5));
        assert_eq!(hist.edges.last(), Some(&2.5));
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn test_box_plot() {
        let outcome = outcome(permissive());
        let plot = outcome.presentation().box_plot("price").unwrap();
        assert_eq!(plot.min, 1.0);
        assert_eq!(plot.median, 3.0);
        assert_eq!(plot.max, 10.0);
        assert_eq!(plot.q1, 2.0);
        assert_eq!(plot.q3, 4.0);
        assert_eq!(plot.outliers, 1);
    }

    #[test]
    fn test_category_frequencies_and_charted_columns() {
        let outcome = outcome(permissive());
        let view = outcome.presentation();

        let freqs = view.category_frequencies("city").unwrap();
        assert_eq!(
            freqs,
            vec![
                CategoryCount { value: "A".into(), count: 3 },
                CategoryCount { value: "B".into(), count: 1 },
                CategoryCount { value: "C".into(), count: 1 },
            ]
        );
        // note has four distinct values, above the chart limit of three
        assert_eq!(view.charted_categorical(), vec!["city"]);
    }

    #[test]
    fn test_missing_mask() {
        let outcome = outcome(permissive());
        let mask = outcome.presentation().missing_mask().unwrap();
        assert_eq!(mask.columns, vec!["price", "rating", "city", "note"]);
        assert_eq!(mask.mask[1], vec![false, true, false, false, false]);
        assert_eq!(mask.mask[0].iter().filter(|m| **m).count(), 0);
        assert!(mask.mask[3][3]);
    }

    #[test]
    fn test_theme_and_views() {
        let outcome = outcome(permissive());
        let view = outcome.presentation();
        assert_eq!(view.theme().style, "whitegrid");
        assert_eq!(view.theme().correlation_palette, "coolwarm");
        assert_eq!(view.valid_numeric(), ["price", "rating"]);
        assert!(view.correlation_matrix().is_some());
        assert!(view.histogram("missing").is_err());
    }
}
