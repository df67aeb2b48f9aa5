//! Pairwise Pearson correlation with top-K extraction.

use crate::table::Table;
use crate::utils::{numeric_options, round_to};
use serde::{Deserialize, Serialize};
use tracing::warn;

const COEFFICIENT_DECIMALS: i32 = 4;

/// One entry of the top-K list. `column_a` precedes `column_b` in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub column_a: String,
    pub column_b: String,
    /// Signed coefficient rounded to four decimals.
    pub coefficient: f64,
}

impl CorrelationPair {
    /// `"a vs b"` label used in reports.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.column_a, self.column_b)
    }
}

/// Square symmetric Pearson matrix. Undefined coefficients are NaN and
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    #[serde(deserialize_with = "deserialize_coefficients")]
    pub values: Vec<Vec<f64>>,
}

fn deserialize_coefficients<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<Vec<Option<f64>>> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect())
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub top_pairs: Vec<CorrelationPair>,
    pub matrix: Option<CorrelationMatrix>,
}

impl CorrelationResult {
    pub fn is_empty(&self) -> bool {
        self.matrix.is_none()
    }
}

pub(crate) fn correlations(table: &Table, numeric: &[String], top_k: usize) -> CorrelationResult {
    let mut columns = Vec::with_capacity(numeric.len());
    let mut series_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(numeric.len());

    for name in numeric {
        match table.series(name).and_then(|s| Ok(numeric_options(s)?)) {
            Ok(values) => {
                columns.push(name.clone());
                series_values.push(values);
            }
            Err(e) => warn!("Skipping '{}' in correlations: {}", name, e),
        }
    }

    if columns.len() < 2 {
        return CorrelationResult::default();
    }

    let size = columns.len();
    let mut values = vec![vec![f64::NAN; size]; size];
    let mut candidates: Vec<(usize, usize, f64)> = Vec::new();

    for i in 0..size {
        values[i][i] = 1.0;
        for j in (i + 1)..size {
            let r = pearson(&series_values[i], &series_values[j]);
            values[i][j] = r;
            values[j][i] = r;
            if !r.is_nan() {
                candidates.push((i, j, r));
            }
        }
    }

    // stable: equal magnitudes keep row-major order
    candidates.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));

    let top_pairs = candidates
        .into_iter()
        .take(top_k)
        .map(|(i, j, r)| CorrelationPair {
            column_a: columns[i].clone(),
            column_b: columns[j].clone(),
            coefficient: round_to(r, COEFFICIENT_DECIMALS),
        })
        .collect();

    CorrelationResult {
        top_pairs,
        matrix: Some(CorrelationMatrix { columns, values }),
    }
}

/// Pearson coefficient over pairwise-complete observations.
///
/// NaN when fewer than two complete pairs remain or either side has zero
/// variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}
