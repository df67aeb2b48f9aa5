//! Dataset loading, size validation, and column classification.
//!
//! [`DatasetLoader`] turns a delimited file (or an in-memory upload) into an
//! immutable [`Table`], checks it against the minimum-size rules, and splits
//! its columns into numeric and categorical sets with identifier-like numeric
//! columns excluded.
//!
//! # Example
//!
//! ```rust,ignore
//! use autoeda::{AnalysisConfig, DatasetLoader};
//!
//! let loader = DatasetLoader::new(AnalysisConfig::default());
//! let dataset = loader.load_and_validate("data/sales.csv".as_ref())?;
//! println!("valid numeric: {:?}", dataset.classification.valid_numeric);
//! ```

pub mod classification;
mod csv;
pub mod validation;

pub use classification::{
    ColumnClassification, ColumnKind, ExcludedColumn, IdentifierRule, IdentifierRules, classify,
    has_key_header, is_named_identifier, is_sequential_key,
};
pub use validation::{SizeRules, ValidationReport, enforce, validate};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::table::Table;
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{debug, info};

/// A loaded table together with its size check and column classification.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub table: Table,
    pub validation: ValidationReport,
    pub classification: ColumnClassification,
}

impl LoadedDataset {
    /// Dataset identifier, falling back to `"dataset"` for unnamed tables.
    pub fn name(&self) -> &str {
        self.table.name().unwrap_or("dataset")
    }
}

/// Loads delimited data and prepares it for analysis.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    config: AnalysisConfig,
}

impl DatasetLoader {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Read a delimited file with a header row into a named table.
    ///
    /// The table name is the file name. Nothing is validated here beyond
    /// parseability.
    pub fn load(&self, path: &Path) -> Result<Table> {
        info!("Loading dataset from {}", path.display());
        let frame = csv::read_path(path, &self.config)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.finish_load(frame, name)
    }

    /// Read delimited text from memory (for example an uploaded file).
    pub fn load_bytes(&self, bytes: &[u8], name: &str) -> Result<Table> {
        info!("Loading dataset '{}' from {} bytes", name, bytes.len());
        let frame = csv::read_bytes(bytes, name, &self.config)?;
        self.finish_load(frame, name.to_string())
    }

    fn finish_load(&self, frame: DataFrame, name: String) -> Result<Table> {
        if frame.width() == 0 {
            return Err(AnalysisError::load_failed(name, "no columns found"));
        }
        debug!("Loaded '{}' with shape {:?}", name, frame.shape());
        Ok(Table::with_name(frame, name))
    }

    /// Check the table against the configured minimum size.
    pub fn validate(&self, table: &Table) -> ValidationReport {
        validate(table, SizeRules::from(&self.config))
    }

    /// Classify columns using the configured identifier heuristics.
    pub fn classify(&self, table: &Table) -> ColumnClassification {
        classify(table, &IdentifierRules::from(&self.config))
    }

    /// Load, validate, and classify in one step.
    ///
    /// Under the default gating policy an undersized table is returned as
    /// [`AnalysisError::ValidationFailed`] and never classified.
    pub fn load_and_validate(&self, path: &Path) -> Result<LoadedDataset> {
        let table = self.load(path)?;
        self.prepare(table)
    }

    /// In-memory counterpart of [`DatasetLoader::load_and_validate`].
    pub fn load_bytes_and_validate(&self, bytes: &[u8], name: &str) -> Result<LoadedDataset> {
        let table = self.load_bytes(bytes, name)?;
        self.prepare(table)
    }

    /// Validate and classify an already loaded table.
    pub fn prepare(&self, table: Table) -> Result<LoadedDataset> {
        let validation = self.validate(&table);
        enforce(validation.clone(), self.config.validation_policy)?;
        info!(
            "Dataset '{}' accepted: {} rows x {} columns",
            table.name().unwrap_or("dataset"),
            validation.rows,
            validation.columns
        );

        let classification = self.classify(&table);
        Ok(LoadedDataset {
            table,
            validation,
            classification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationPolicy;

    fn small_config() -> AnalysisConfig {
        AnalysisConfig::builder()
            .min_rows(2)
            .min_columns(2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_load_bytes_names_table() {
        let loader = DatasetLoader::new(small_config());
        let table = loader.load_bytes(b"a,b\n1,x\n2,y\n", "upload.csv").unwrap();
        assert_eq!(table.name(), Some("upload.csv"));
        assert_eq!(table.shape(), (2, 2));
    }

    #[test]
    fn test_load_empty_input_fails() {
        let loader = DatasetLoader::new(small_config());
        let err = loader.load_bytes(b"", "empty.csv").unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_load_and_validate_rejects_small_table() {
        let loader = DatasetLoader::default();
        let err = loader
            .load_bytes_and_validate(b"a,b\n1,x\n2,y\n", "tiny.csv")
            .unwrap_err();
        let failure = err.validation_failure().unwrap();
        assert!(failure.rows_violated());
        assert!(failure.columns_violated());
    }

    #[test]
    fn test_warn_policy_classifies_small_table() {
        let config = AnalysisConfig::builder()
            .validation_policy(ValidationPolicy::Warn)
            .build()
            .unwrap();
        let loader = DatasetLoader::new(config);
        let dataset = loader
            .load_bytes_and_validate(b"id,price,city\n1,9.5,A\n2,3.0,B\n", "tiny.csv")
            .unwrap();

        assert!(!dataset.validation.is_valid());
        assert_eq!(dataset.classification.numeric, vec!["id", "price"]);
        assert_eq!(dataset.classification.valid_numeric, vec!["price"]);
        assert_eq!(dataset.classification.categorical, vec!["city"]);
        assert_eq!(dataset.name(), "tiny.csv");
    }
}
