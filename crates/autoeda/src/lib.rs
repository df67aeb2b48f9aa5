//! Automated Exploratory Data Analysis Library
//!
//! Load a delimited dataset, check that it is large enough to analyse, sort
//! its columns into numeric and categorical, and compute the summary
//! statistics a first look at any table needs. Built on Polars.
//!
//! # Overview
//!
//! - **Loading**: CSV parsing with quoted fields and `NA`/`null`-style missing tokens
//! - **Validation**: minimum row/column gate (or warn-and-proceed policy)
//! - **Classification**: numeric vs categorical, identifier columns excluded
//! - **Statistics**: missingness, categorical modes, Pearson correlations,
//!   IQR outlier counts
//! - **Presentation**: chart-ready histograms, box plots, category counts,
//!   missing-value mask, correlation matrix
//! - **Reporting**: JSON export and an optional LLM-written narrative
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use autoeda::{AnalysisConfig, Analyzer};
//!
//! let outcome = Analyzer::new(AnalysisConfig::default())?
//!     .analyze_path("data/sales.csv".as_ref())?;
//!
//! let stats = &outcome.statistics;
//! println!("Average missing: {:.2}%", stats.missing.average());
//! println!("Outliers: {}", stats.total_outliers);
//! for pair in &stats.correlations.top_pairs {
//!     println!("{}: {}", pair.label(), pair.coefficient);
//! }
//! ```
//!
//! # Using the pieces directly
//!
//! ```rust,ignore
//! use autoeda::{DatasetLoader, StatisticsEngine};
//!
//! let loader = DatasetLoader::default();
//! let dataset = loader.load_and_validate("data/sales.csv".as_ref())?;
//! let engine = StatisticsEngine::for_dataset(&dataset);
//!
//! let modes = engine.categorical_modes();
//! let outliers = engine.outlier_count();
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use autoeda::{AnalysisConfig, ValidationPolicy};
//!
//! let config = AnalysisConfig::builder()
//!     .min_rows(500)
//!     .validation_policy(ValidationPolicy::Warn)
//!     .delimiter(b';')
//!     .identifier_keywords(["id", "key", "sku"])
//!     .build()?;
//! ```

pub mod ai;
pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod presentation;
pub mod reporting;
pub mod statistics;
pub mod table;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{AnalysisOutcome, Analyzer};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ChartTheme, ConfigValidationError, ValidationPolicy,
};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt, SizeViolation, ValidationFailure};
pub use loader::{
    ColumnClassification, ColumnKind, DatasetLoader, ExcludedColumn, IdentifierRule, LoadedDataset,
    ValidationReport,
};
pub use presentation::{BoxPlot, CategoryCount, Histogram, MissingMask, PresentationView};
pub use reporting::{AnalysisReport, NarrativeReport, ReportGenerator, ReportMetadata};
pub use statistics::{
    ColumnMissing, ColumnMode, ColumnOutliers, CorrelationMatrix, CorrelationPair,
    CorrelationResult, MissingnessReport, ModeReport, StatisticsEngine, StatisticsOptions,
    StatisticsSummary,
};
pub use table::Table;
