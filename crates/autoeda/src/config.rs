//! Configuration types for the analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup. Every heuristic threshold used by the
//! loader and the statistics engine lives here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default minimum number of rows for a dataset to be analysed.
pub const DEFAULT_MIN_ROWS: usize = 2000;

/// Default minimum number of columns for a dataset to be analysed.
pub const DEFAULT_MIN_COLUMNS: usize = 10;

/// Default name fragments that mark a numeric column as a likely identifier.
pub const DEFAULT_IDENTIFIER_KEYWORDS: [&str; 4] = ["id", "code", "codigo", "index"];

/// Default cell tokens read as missing, in addition to empty fields.
pub const DEFAULT_NULL_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// What to do when a loaded table is below the minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValidationPolicy {
    /// Refuse to analyse undersized tables
    #[default]
    Gate,
    /// Log a warning and analyse anyway
    Warn,
}

/// Visual theme handed to the chart-rendering collaborator.
///
/// This is a plain value carried in [`AnalysisConfig`]; nothing in the crate
/// installs it globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartTheme {
    /// Overall plot style (grid, background).
    pub style: String,
    /// Diverging palette for the correlation heatmap (centered at zero).
    pub correlation_palette: String,
    /// Palette for categorical frequency bars.
    pub categorical_palette: String,
    /// Palette for the missing-value heatmap.
    pub missing_palette: String,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            style: "whitegrid".to_string(),
            correlation_palette: "coolwarm".to_string(),
            categorical_palette: "viridis".to_string(),
            missing_palette: "viridis".to_string(),
        }
    }
}

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use autoeda::config::{AnalysisConfig, ValidationPolicy};
///
/// let config = AnalysisConfig::builder()
///     .min_rows(500)
///     .validation_policy(ValidationPolicy::Warn)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum number of rows.
    /// Default: 2000
    pub min_rows: usize,

    /// Minimum number of columns.
    /// Default: 10
    pub min_columns: usize,

    /// Whether undersized tables are rejected or only warned about.
    /// Default: Gate
    pub validation_policy: ValidationPolicy,

    /// Field delimiter of the input file.
    /// Default: b','
    pub delimiter: u8,

    /// Number of rows used for schema inference. `None` scans the whole file.
    /// Default: None
    pub infer_schema_rows: Option<usize>,

    /// Cell tokens read as missing in every column. Empty fields are always
    /// missing.
    /// Default: "NA", "N/A", "null", "NaN", "None", ... (see [`DEFAULT_NULL_VALUES`])
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,

    /// Case-insensitive name fragments suggesting an identifier column.
    /// Default: ["id", "code", "codigo", "index"]
    pub identifier_keywords: Vec<String>,

    /// Distinct-to-row ratio above which a keyword-named numeric column is
    /// treated as an identifier (0.0 - 1.0).
    /// Default: 0.9
    pub identifier_uniqueness_ratio: f64,

    /// Categorical columns with more distinct values than this are skipped
    /// when computing modes.
    /// Default: 50
    pub mode_cardinality_limit: usize,

    /// Number of strongest correlation pairs to report.
    /// Default: 5
    pub top_correlations: usize,

    /// IQR multiplier for the outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Number of histogram bins prepared for numeric distributions.
    /// Default: 30
    pub histogram_bins: usize,

    /// Categorical columns with more distinct values than this get no
    /// frequency chart.
    /// Default: 20
    pub chart_category_limit: usize,

    /// Theme for the chart-rendering collaborator.
    pub chart_theme: ChartTheme,

    /// Output directory for generated reports.
    /// Default: "reports"
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_rows: DEFAULT_MIN_ROWS,
            min_columns: DEFAULT_MIN_COLUMNS,
            validation_policy: ValidationPolicy::default(),
            delimiter: b',',
            infer_schema_rows: None,
            null_values: default_null_values(),
            identifier_keywords: default_identifier_keywords(),
            identifier_uniqueness_ratio: 0.9,
            mode_cardinality_limit: 50,
            top_correlations: 5,
            iqr_multiplier: 1.5,
            histogram_bins: 30,
            chart_category_limit: 20,
            chart_theme: ChartTheme::default(),
            output_dir: PathBuf::from("reports"),
        }
    }
}

fn default_null_values() -> Vec<String> {
    DEFAULT_NULL_VALUES.iter().map(|v| v.to_string()).collect()
}

fn default_identifier_keywords() -> Vec<String> {
    DEFAULT_IDENTIFIER_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.identifier_uniqueness_ratio) {
            return Err(ConfigValidationError::InvalidRatio {
                field: "identifier_uniqueness_ratio".to_string(),
                value: self.identifier_uniqueness_ratio,
            });
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::ZeroValue("histogram_bins".to_string()));
        }

        if self.delimiter == b'\n' || self.delimiter == b'"' {
            return Err(ConfigValidationError::InvalidDelimiter(self.delimiter as char));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid ratio for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidRatio { field: String, value: f64 },

    #[error("Invalid IQR multiplier: {0} (must be a non-negative number)")]
    InvalidMultiplier(f64),

    #[error("'{0}' must be at least 1")]
    ZeroValue(String),

    #[error("Invalid delimiter: {0:?}")]
    InvalidDelimiter(char),
}

impl From<ConfigValidationError> for crate::error::AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    min_rows: Option<usize>,
    min_columns: Option<usize>,
    validation_policy: Option<ValidationPolicy>,
    delimiter: Option<u8>,
    infer_schema_rows: Option<usize>,
    null_values: Option<Vec<String>>,
    identifier_keywords: Option<Vec<String>>,
    identifier_uniqueness_ratio: Option<f64>,
    mode_cardinality_limit: Option<usize>,
    top_correlations: Option<usize>,
    iqr_multiplier: Option<f64>,
    histogram_bins: Option<usize>,
    chart_category_limit: Option<usize>,
    chart_theme: Option<ChartTheme>,
    output_dir: Option<PathBuf>,
}

impl AnalysisConfigBuilder {
    /// Set the minimum number of rows.
    pub fn min_rows(mut self, rows: usize) -> Self {
        self.min_rows = Some(rows);
        self
    }

    /// Set the minimum number of columns.
    pub fn min_columns(mut self, columns: usize) -> Self {
        self.min_columns = Some(columns);
        self
    }

    /// Choose between rejecting and warning on undersized tables.
    pub fn validation_policy(mut self, policy: ValidationPolicy) -> Self {
        self.validation_policy = Some(policy);
        self
    }

    /// Set the field delimiter (e.g. `b';'`).
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Limit schema inference to the first `rows` rows.
    pub fn infer_schema_rows(mut self, rows: usize) -> Self {
        self.infer_schema_rows = Some(rows);
        self
    }

    /// Replace the tokens read as missing. An empty list leaves only empty
    /// fields as missing.
    pub fn null_values<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the identifier name fragments.
    pub fn identifier_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Set the distinct-to-row ratio for keyword-named identifiers.
    ///
    /// # Arguments
    /// * `ratio` - Value between 0.0 and 1.0 (e.g., 0.9 = 90%)
    pub fn identifier_uniqueness_ratio(mut self, ratio: f64) -> Self {
        self.identifier_uniqueness_ratio = Some(ratio);
        self
    }

    /// Set the cardinality above which categorical columns get no mode.
    pub fn mode_cardinality_limit(mut self, limit: usize) -> Self {
        self.mode_cardinality_limit = Some(limit);
        self
    }

    /// Set how many correlation pairs are reported.
    pub fn top_correlations(mut self, k: usize) -> Self {
        self.top_correlations = Some(k);
        self
    }

    /// Set the IQR multiplier for outlier fences.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the cardinality above which categorical columns are not charted.
    pub fn chart_category_limit(mut self, limit: usize) -> Self {
        self.chart_category_limit = Some(limit);
        self
    }

    /// Set the chart theme.
    pub fn chart_theme(mut self, theme: ChartTheme) -> Self {
        self.chart_theme = Some(theme);
        self
    }

    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let config = AnalysisConfig {
            min_rows: self.min_rows.unwrap_or(DEFAULT_MIN_ROWS),
            min_columns: self.min_columns.unwrap_or(DEFAULT_MIN_COLUMNS),
            validation_policy: self.validation_policy.unwrap_or_default(),
            delimiter: self.delimiter.unwrap_or(b','),
            infer_schema_rows: self.infer_schema_rows,
            null_values: self.null_values.unwrap_or_else(default_null_values),
            identifier_keywords: self
                .identifier_keywords
                .unwrap_or_else(default_identifier_keywords),
            identifier_uniqueness_ratio: self.identifier_uniqueness_ratio.unwrap_or(0.9),
            mode_cardinality_limit: self.mode_cardinality_limit.unwrap_or(50),
            top_correlations: self.top_correlations.unwrap_or(5),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            histogram_bins: self.histogram_bins.unwrap_or(30),
            chart_category_limit: self.chart_category_limit.unwrap_or(20),
            chart_theme: self.chart_theme.unwrap_or_default(),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("reports")),
        };

        config.validate()?;
        Ok(config)
    }
}
