use super::metadata::ReportMetadata;
use crate::analysis::AnalysisOutcome;
use crate::error::{Result, ResultExt};
use crate::loader::{ColumnClassification, ValidationReport};
use crate::statistics::StatisticsSummary;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Complete analysis result for JSON output.
///
/// Used for both `--json` (stdout) and `--emit-report` (file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path or name of the analysed input
    pub input_file: String,
    pub summary: ReportMetadata,
    pub validation: ValidationReport,
    pub classification: ColumnClassification,
    pub valid_categorical: Vec<String>,
    pub statistics: StatisticsSummary,
}

impl AnalysisReport {
    pub fn from_outcome(outcome: &AnalysisOutcome, input_file: impl Into<String>) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.into(),
            summary: ReportMetadata::from_outcome(outcome),
            validation: outcome.dataset.validation.clone(),
            classification: outcome.dataset.classification.clone(),
            valid_categorical: outcome.valid_categorical.clone(),
            statistics: outcome.statistics.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `<output_dir>/<stem>_analysis.json`.
    pub fn write_to_file(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;

        let report_path = output_dir.join(format!("{}_analysis.json", self.summary.stem()));
        self.save(&report_path)
            .context(format!("Failed to save {}", report_path.display()))?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_json_pretty()?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::config::AnalysisConfig;

    fn outcome() -> AnalysisOutcome {
        let config = AnalysisConfig::builder()
            .min_rows(1)
            .min_columns(1)
            .build()
            .unwrap();
        Analyzer::new(config)
            .unwrap()
            .analyze_bytes(b"a,b,c\n1.0,2.0,x\n2.0,4.5,y\n3.0,5.0,x\n", "tiny.csv")
            .unwrap()
    }

    #[test]
    fn test_report_json_shape() {
        let report = outcome().report("data/tiny.csv");
        let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        assert_eq!(json["input_file"], "data/tiny.csv");
        assert_eq!(json["summary"]["rows"], 3);
        assert_eq!(json["summary"]["modes"]["entries"][0]["value"], "x");
        assert_eq!(json["classification"]["valid_numeric"][0], "a");
        assert!(json["statistics"]["correlations"]["matrix"].is_object());
        assert!(json["generated_at"].is_string());
    }

    #[test]
    fn test_write_to_file() {
        let dir = std::env::temp_dir().join(format!("autoeda-json-{}", std::process::id()));
        let report = outcome().report("tiny.csv");

        let path = report.write_to_file(&dir).unwrap();
        assert_eq!(path, dir.join("tiny_analysis.json"));

        let saved: AnalysisReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.summary, report.summary);

        fs::remove_dir_all(&dir).ok();
    }
}
