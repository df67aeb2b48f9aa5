use crate::analysis::AnalysisOutcome;
use crate::statistics::{CorrelationPair, ModeReport};
use serde::{Deserialize, Serialize};

/// Flat statistics bundle, the only input to narrative generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub dataset_name: String,
    pub rows: usize,
    pub columns: usize,
    pub average_missing_percentage: f64,
    pub total_outliers: usize,
    pub top_correlations: Vec<CorrelationPair>,
    pub modes: ModeReport,
}

impl ReportMetadata {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let (rows, columns) = outcome.dataset.table.shape();
        Self {
            dataset_name: outcome.dataset.name().to_string(),
            rows,
            columns,
            average_missing_percentage: outcome.statistics.missing.average(),
            total_outliers: outcome.statistics.total_outliers,
            top_correlations: outcome.statistics.correlations.top_pairs.clone(),
            modes: outcome.statistics.modes.clone(),
        }
    }

    /// Dataset name up to its first dot, used for output file names.
    pub fn stem(&self) -> &str {
        match self.dataset_name.split('.').next() {
            Some(stem) if !stem.is_empty() => stem,
            _ => "dataset",
        }
    }

    /// `"(rows, columns)"`.
    pub fn shape_label(&self) -> String {
        format!("({}, {})", self.rows, self.columns)
    }

    /// `{a vs b: r, ...}` in ranking order.
    pub fn correlations_label(&self) -> String {
        let entries: Vec<String> = self
            .top_correlations
            .iter()
            .map(|pair| format!("{}: {}", pair.label(), pair.coefficient))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    /// `{column: value, ...}` in column order.
    pub fn modes_label(&self) -> String {
        let entries: Vec<String> = self
            .modes
            .entries
            .iter()
            .map(|mode| format!("{}: {}", mode.column, mode.value))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}
