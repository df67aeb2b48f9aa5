//! Minimum-size validation.

use crate::config::{AnalysisConfig, ValidationPolicy};
use crate::error::{AnalysisError, Result, SizeViolation, ValidationFailure};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Size thresholds a table must meet before it is analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRules {
    pub min_rows: usize,
    pub min_columns: usize,
}

impl From<&AnalysisConfig> for SizeRules {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            min_rows: config.min_rows,
            min_columns: config.min_columns,
        }
    }
}

/// Outcome of checking a table against [`SizeRules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows: usize,
    pub columns: usize,
    pub violations: Vec<SizeViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert into the failure carried by [`AnalysisError::ValidationFailed`].
    pub fn into_failure(self) -> Option<ValidationFailure> {
        if self.is_valid() {
            return None;
        }
        Some(ValidationFailure {
            rows: self.rows,
            columns: self.columns,
            violations: self.violations,
        })
    }
}

/// Check a table against the size rules. Every violated dimension is listed.
pub fn validate(table: &Table, rules: SizeRules) -> ValidationReport {
    let (rows, columns) = table.shape();
    let mut violations = Vec::new();

    if rows < rules.min_rows {
        violations.push(SizeViolation::TooFewRows {
            actual: rows,
            min: rules.min_rows,
        });
    }
    if columns < rules.min_columns {
        violations.push(SizeViolation::TooFewColumns {
            actual: columns,
            min: rules.min_columns,
        });
    }

    ValidationReport {
        rows,
        columns,
        violations,
    }
}

/// Apply the configured policy to a validation report.
///
/// Under [`ValidationPolicy::Gate`] any violation is an error; under
/// [`ValidationPolicy::Warn`] violations are logged and the caller proceeds.
pub fn enforce(report: ValidationReport, policy: ValidationPolicy) -> Result<()> {
    let Some(failure) = report.into_failure() else {
        return Ok(());
    };

    match policy {
        ValidationPolicy::Gate => Err(AnalysisError::ValidationFailed(failure)),
        ValidationPolicy::Warn => {
            for violation in &failure.violations {
                warn!("Dataset below minimum size: {}; continuing", violation);
            }
            Ok(())
        }
    }
}
