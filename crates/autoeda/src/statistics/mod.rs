//! Summary statistics over a classified table.
//!
//! [`StatisticsEngine`] borrows a [`Table`] together with its numeric and
//! categorical column lists and computes four independent metrics:
//!
//! - missing-value percentages per column
//! - the mode of each low-cardinality categorical column
//! - the Pearson correlation matrix and its strongest pairs
//! - the total number of IQR outliers
//!
//! Every method is a pure function of the borrowed snapshot. None of them
//! return errors: a column that cannot be read is logged and skipped, and
//! degenerate inputs produce empty or zero results.

pub mod correlation;
pub mod missing;
pub mod modes;
pub mod outliers;

pub use correlation::{CorrelationMatrix, CorrelationPair, CorrelationResult, pearson};
pub use missing::{ColumnMissing, MissingnessReport};
pub use modes::{ColumnMode, ModeReport};
pub use outliers::ColumnOutliers;

use crate::config::AnalysisConfig;
use crate::loader::LoadedDataset;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tunables for the statistics engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsOptions {
    /// Categorical columns with more distinct values than this get no mode.
    pub mode_cardinality_limit: usize,
    /// Number of strongest correlation pairs to report.
    pub top_correlations: usize,
    /// Fence width in IQR units.
    pub iqr_multiplier: f64,
}

impl Default for StatisticsOptions {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for StatisticsOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            mode_cardinality_limit: config.mode_cardinality_limit,
            top_correlations: config.top_correlations,
            iqr_multiplier: config.iqr_multiplier,
        }
    }
}

/// All four statistics for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub missing: MissingnessReport,
    pub modes: ModeReport,
    pub correlations: CorrelationResult,
    pub outliers: Vec<ColumnOutliers>,
    pub total_outliers: usize,
}

/// Stateless statistics over a borrowed table snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsEngine<'a> {
    table: &'a Table,
    numeric: &'a [String],
    categorical: &'a [String],
    options: StatisticsOptions,
}

impl<'a> StatisticsEngine<'a> {
    /// `numeric` should be the valid (non-identifier) numeric columns.
    pub fn new(table: &'a Table, numeric: &'a [String], categorical: &'a [String]) -> Self {
        Self {
            table,
            numeric,
            categorical,
            options: StatisticsOptions::default(),
        }
    }

    /// Engine over a loaded dataset's valid numeric and categorical columns.
    pub fn for_dataset(dataset: &'a LoadedDataset) -> Self {
        Self::new(
            &dataset.table,
            &dataset.classification.valid_numeric,
            &dataset.classification.categorical,
        )
    }

    pub fn with_options(mut self, options: StatisticsOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &StatisticsOptions {
        &self.options
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn numeric(&self) -> &'a [String] {
        self.numeric
    }

    pub fn categorical(&self) -> &'a [String] {
        self.categorical
    }

    /// Missing percentage for every column with at least one missing entry,
    /// highest first.
    pub fn missing_percentage(&self) -> MissingnessReport {
        missing::missing_percentage(self.table)
    }

    /// Most frequent value per categorical column within the cardinality limit.
    pub fn categorical_modes(&self) -> ModeReport {
        modes::categorical_modes(
            self.table,
            self.categorical,
            self.options.mode_cardinality_limit,
        )
    }

    /// Categorical columns that qualify for a mode.
    pub fn valid_categorical(&self) -> Vec<String> {
        modes::low_cardinality_columns(
            self.table,
            self.categorical,
            self.options.mode_cardinality_limit,
        )
    }

    /// Pearson matrix over the numeric columns and the top-K strongest pairs.
    pub fn correlations(&self) -> CorrelationResult {
        correlation::correlations(self.table, self.numeric, self.options.top_correlations)
    }

    /// Total IQR outliers across numeric columns.
    pub fn outlier_count(&self) -> usize {
        outliers::outlier_count(self.table, self.numeric, self.options.iqr_multiplier)
    }

    pub fn outlier_breakdown(&self) -> Vec<ColumnOutliers> {
        outliers::outlier_breakdown(self.table, self.numeric, self.options.iqr_multiplier)
    }

    /// Run every statistic.
    pub fn summarize(&self) -> StatisticsSummary {
        info!("Computing statistics...");
        let missing = self.missing_percentage();
        let modes = self.categorical_modes();
        let correlations = self.correlations();
        let outliers = self.outlier_breakdown();
        let total_outliers = outliers.iter().map(|c| c.count).sum();

        info!(
            "Statistics: {} columns with missing values, {} modes, {} correlation pairs, {} outliers",
            missing.len(),
            modes.len(),
            correlations.top_pairs.len(),
            total_outliers
        );

        StatisticsSummary {
            missing,
            modes,
            correlations,
            outliers,
            total_outliers,
        }
    }
}

static_assertions::assert_impl_all!(StatisticsEngine<'static>: Send, Sync);
static_assertions::assert_impl_all!(StatisticsSummary: Send, Sync);
