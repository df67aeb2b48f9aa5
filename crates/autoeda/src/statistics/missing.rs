//! Missing-value percentages.

use crate::table::Table;
use crate::utils::{mean_or_zero, missing_count};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Missingness of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing_count: usize,
    /// Percentage in `[0, 100]`.
    pub missing_percentage: f64,
}

/// Columns with at least one missing entry, most incomplete first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingnessReport {
    pub entries: Vec<ColumnMissing>,
}

impl MissingnessReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Percentage for a column, if it has any missing values.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.missing_percentage)
    }

    /// Mean of the reported percentages; 0.0 when nothing is missing.
    pub fn average(&self) -> f64 {
        let values: Vec<f64> = self.entries.iter().map(|e| e.missing_percentage).collect();
        mean_or_zero(&values)
    }
}

pub(crate) fn missing_percentage(table: &Table) -> MissingnessReport {
    let rows = table.height();
    if rows == 0 {
        return MissingnessReport::default();
    }

    let mut entries: Vec<ColumnMissing> = table
        .iter_series()
        .filter_map(|series| match missing_count(series) {
            Ok(0) => None,
            Ok(count) => Some(ColumnMissing {
                column: series.name().to_string(),
                missing_count: count,
                missing_percentage: count as f64 / rows as f64 * 100.0,
            }),
            Err(e) => {
                warn!("Skipping missingness for '{}': {}", series.name(), e);
                None
            }
        })
        .collect();

    // stable: ties keep table order
    entries.sort_by(|a, b| b.missing_percentage.total_cmp(&a.missing_percentage));

    MissingnessReport { entries }
}
