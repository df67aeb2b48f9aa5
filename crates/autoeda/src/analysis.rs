//! End-to-end analysis of one dataset.
//!
//! [`Analyzer`] runs load → validate → classify → statistics and returns an
//! [`AnalysisOutcome`], which is the single hand-off point for chart data
//! ([`PresentationView`]) and narrative reporting ([`ReportMetadata`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use autoeda::{AnalysisConfig, Analyzer};
//!
//! let outcome = Analyzer::new(AnalysisConfig::default())?
//!     .analyze_path("data/sales.csv".as_ref())?;
//!
//! println!("outliers: {}", outcome.statistics.total_outliers);
//! ```

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::{DatasetLoader, LoadedDataset};
use crate::presentation::PresentationView;
use crate::reporting::{AnalysisReport, ReportMetadata};
use crate::statistics::{StatisticsEngine, StatisticsOptions, StatisticsSummary};
use crate::table::Table;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// Runs the analysis pipeline with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Analyzer {
    loader: DatasetLoader,
}

static_assertions::assert_impl_all!(Analyzer: Send, Sync);

impl Analyzer {
    /// Create an analyzer. The configuration is validated first.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loader: DatasetLoader::new(config),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.loader.config()
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// Analyze a delimited file.
    pub fn analyze_path(&self, path: &Path) -> Result<AnalysisOutcome> {
        let table = self.loader.load(path)?;
        self.analyze_table(table)
    }

    /// Analyze delimited text held in memory.
    pub fn analyze_bytes(&self, bytes: &[u8], name: &str) -> Result<AnalysisOutcome> {
        let table = self.loader.load_bytes(bytes, name)?;
        self.analyze_table(table)
    }

    /// Validate, classify, and compute statistics for an already loaded table.
    pub fn analyze_table(&self, table: Table) -> Result<AnalysisOutcome> {
        let start_time = Instant::now();
        let dataset = match self.loader.prepare(table) {
            Ok(dataset) => dataset,
            Err(e) => {
                error!("Analysis stopped: {}", e);
                return Err(e);
            }
        };

        let engine = StatisticsEngine::for_dataset(&dataset)
            .with_options(StatisticsOptions::from(self.config()));
        let statistics = engine.summarize();
        let valid_categorical = engine.valid_categorical();

        info!(
            "Analysis of '{}' completed in {} ms",
            dataset.name(),
            start_time.elapsed().as_millis()
        );

        Ok(AnalysisOutcome {
            dataset,
            statistics,
            valid_categorical,
            config: self.config().clone(),
        })
    }
}

/// Everything computed for one dataset.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub dataset: LoadedDataset,
    pub statistics: StatisticsSummary,
    /// Categorical columns within the mode cardinality limit.
    pub valid_categorical: Vec<String>,
    config: AnalysisConfig,
}

impl AnalysisOutcome {
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Engine over the same snapshot, for recomputing individual metrics.
    pub fn engine(&self) -> StatisticsEngine<'_> {
        StatisticsEngine::for_dataset(&self.dataset)
            .with_options(StatisticsOptions::from(&self.config))
    }

    /// Flat bundle handed to narrative generation.
    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata::from_outcome(self)
    }

    /// Read-only chart data.
    pub fn presentation(&self) -> PresentationView<'_> {
        PresentationView::new(self)
    }

    /// JSON analysis report for this outcome.
    pub fn report(&self, input_file: impl Into<String>) -> AnalysisReport {
        AnalysisReport::from_outcome(self, input_file)
    }

    /// Directory reports for this outcome are written to.
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Build the JSON report and save it under [`Self::output_dir`].
    pub fn write_report(&self, input_file: impl Into<String>) -> Result<PathBuf> {
        self.report(input_file).write_to_file(self.output_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationPolicy;

    const CSV: &[u8] = b"id,price,qty,city\n1,10.0,1,A\n2,12.0,2,B\n3,11.0,3,A\n4,90.0,4,C\n";

    fn permissive() -> Analyzer {
        Analyzer::new(
            AnalysisConfig::builder()
                .min_rows(1)
                .min_columns(1)
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_analyze_bytes() {
        let outcome = permissive().analyze_bytes(CSV, "shop.csv").unwrap();

        assert_eq!(outcome.dataset.name(), "shop.csv");
        // id and qty are both gap-free runs; only id has a key-like header
        assert_eq!(outcome.dataset.classification.valid_numeric, vec!["price", "qty"]);
        assert_eq!(outcome.valid_categorical, vec!["city"]);
        assert_eq!(outcome.statistics.modes.get("city"), Some("A"));
        assert_eq!(outcome.statistics.correlations.top_pairs.len(), 1);
    }

    #[test]
    fn test_null_tokens_counted_as_missing() {
        let csv = b"price,qty,city\n1.5,3,A\nNA,4,B\n2.5,null,A\n3.5,7,N/A\n";
        let outcome = permissive().analyze_bytes(csv, "tokens.csv").unwrap();
        let classification = &outcome.dataset.classification;

        assert_eq!(classification.valid_numeric, vec!["price", "qty"]);
        assert_eq!(classification.categorical, vec!["city"]);

        let missing = &outcome.statistics.missing;
        assert_eq!(missing.len(), 3);
        for column in ["price", "qty", "city"] {
            assert_eq!(missing.get(column), Some(25.0));
        }
        assert_eq!(outcome.statistics.modes.get("city"), Some("A"));
    }

    #[test]
    fn test_unterminated_quote_fails_to_load() {
        let err = permissive()
            .analyze_bytes(b"a,b\n1,\"x\n2,y\n", "broken.csv")
            .unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_write_report_uses_configured_output_dir() {
        let dir = std::env::temp_dir().join(format!("autoeda-outdir-{}", std::process::id()));
        let analyzer = Analyzer::new(
            AnalysisConfig::builder()
                .min_rows(1)
                .min_columns(1)
                .output_dir(&dir)
                .build()
                .unwrap(),
        )
        .unwrap();
        let outcome = analyzer.analyze_bytes(CSV, "shop.csv").unwrap();

        assert_eq!(outcome.output_dir(), dir.as_path());
        let path = outcome.write_report("shop.csv").unwrap();
        assert_eq!(path, dir.join("shop_analysis.json"));
        assert!(path.is_file());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_gate_stops_before_statistics() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let err = analyzer.analyze_bytes(CSV, "shop.csv").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_warn_policy_proceeds() {
        let config = AnalysisConfig::builder()
            .validation_policy(ValidationPolicy::Warn)
            .build()
            .unwrap();
        let outcome = Analyzer::new(config)
            .unwrap()
            .analyze_bytes(CSV, "shop.csv")
            .unwrap();
        assert!(!outcome.dataset.validation.is_valid());
    }

    #[test]
    fn test_engine_reproduces_summary() {
        let outcome = permissive().analyze_bytes(CSV, "shop.csv").unwrap();
        assert_eq!(outcome.engine().summarize(), outcome.statistics);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.identifier_uniqueness_ratio = 2.0;
        let err = Analyzer::new(config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
