use super::metadata::ReportMetadata;
use crate::ai::AIProvider;
use crate::error::{AnalysisError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Narrative text returned by the provider and where it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeReport {
    pub text: String,
    pub path: PathBuf,
    pub provider: String,
    pub model: Option<String>,
}

/// Turns [`ReportMetadata`] into a Markdown narrative via an [`AIProvider`].
pub struct ReportGenerator {
    provider: Arc<dyn AIProvider>,
    output_dir: PathBuf,
}

static_assertions::assert_impl_all!(ReportGenerator: Send, Sync);

impl ReportGenerator {
    pub fn new(provider: Arc<dyn AIProvider>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Prompt sent to the provider. Contains every metadata field.
    pub fn build_prompt(metadata: &ReportMetadata) -> String {
        format!(
            "Act as a senior data scientist. Analyze the dataset '{}'.\n\n\
            STATISTICAL METADATA:\n\
            - Shape (rows, columns): {}\n\
            - Average missing values: {:.2}%\n\
            - Outliers detected (IQR): {}\n\
            - Top correlations (signed Pearson): {}\n\
            - Most frequent categories: {}\n\n\
            REPORT STRUCTURE (Markdown):\n\
            1. Executive summary (overall health of the data).\n\
            2. 3 key findings (interpret the correlations, outliers and business modes).\n\
            3. 3 cleaning and preprocessing recommendations.\n",
            metadata.dataset_name,
            metadata.shape_label(),
            metadata.average_missing_percentage,
            metadata.total_outliers,
            metadata.correlations_label(),
            metadata.modes_label(),
        )
    }

    /// Path the narrative for this dataset is written to.
    pub fn report_path(&self, metadata: &ReportMetadata) -> PathBuf {
        self.output_dir.join(format!("report_{}.md", metadata.stem()))
    }

    /// Ask the provider for a narrative and save it as Markdown.
    ///
    /// Provider failures are returned as
    /// [`AnalysisError::ReportGenerationFailed`] and never retried.
    pub fn generate(&self, metadata: &ReportMetadata) -> Result<NarrativeReport> {
        info!(
            "Generating narrative report with {} ({})",
            self.provider.name(),
            self.provider.model().unwrap_or("default model")
        );

        let prompt = Self::build_prompt(metadata);
        let text = self.provider.generate_text(&prompt).map_err(|e| {
            error!("{} request failed: {}", self.provider.name(), e);
            AnalysisError::ReportGenerationFailed(format!("{}: {}", self.provider.name(), e))
        })?;

        let path = self.report_path(metadata);
        self.write_markdown(&path, &text)
            .context("Failed to save narrative report")?;
        info!("Report saved: {}", path.display());

        Ok(NarrativeReport {
            text,
            path,
            provider: self.provider.name().to_string(),
            model: self.provider.model().map(str::to_string),
        })
    }

    fn write_markdown(&self, path: &Path, text: &str) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let mut file = File::create(path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{ColumnMode, CorrelationPair, ModeReport};
    use anyhow::anyhow;
    use std::sync::Mutex;

    struct Recording {
        prompts: Mutex<Vec<String>>,
    }

    impl AIProvider for Recording {
        fn generate_text(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts
                .lock()
                .map_err(|_| anyhow!("poisoned"))?
                .push(prompt.to_string());
            Ok("# Report\n\nAll good.".to_string())
        }

        fn name(&self) -> &str {
            "Recording"
        }

        fn model(&self) -> Option<&str> {
            Some("stub-1")
        }
    }

    struct Failing;

    impl AIProvider for Failing {
        fn generate_text(&self, _prompt: &str) -> anyhow::Result<String> {
            Err(anyhow!("request timed out"))
        }

        fn name(&self) -> &str {
            "Failing"
        }
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            dataset_name: "churn.csv".to_string(),
            rows: 2500,
            columns: 12,
            average_missing_percentage: 1.5,
            total_outliers: 42,
            top_correlations: vec![CorrelationPair {
                column_a: "tenure".to_string(),
                column_b: "charges".to_string(),
                coefficient: -0.6543,
            }],
            modes: ModeReport {
                entries: vec![ColumnMode {
                    column: "plan".to_string(),
                    value: "basic".to_string(),
                    frequency: 1200,
                }],
            },
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("autoeda-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_prompt_contains_all_metadata() {
        let prompt = ReportGenerator::build_prompt(&metadata());
        assert!(prompt.contains("churn.csv"));
        assert!(prompt.contains("(2500, 12)"));
        assert!(prompt.contains("1.50%"));
        assert!(prompt.contains("42"));
        assert!(prompt.contains("tenure vs charges: -0.6543"));
        assert!(prompt.contains("plan: basic"));
    }

    #[test]
    fn test_generate_writes_markdown() {
        let dir = temp_dir("narrative");
        let provider = Arc::new(Recording {
            prompts: Mutex::new(Vec::new()),
        });
        let generator = ReportGenerator::new(provider.clone(), &dir);

        let report = generator.generate(&metadata()).unwrap();

        assert_eq!(report.path, dir.join("report_churn.md"));
        assert_eq!(fs::read_to_string(&report.path).unwrap(), report.text);
        assert_eq!(report.model.as_deref(), Some("stub-1"));
        assert_eq!(provider.prompts.lock().unwrap().len(), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_provider_failure_is_recoverable() {
        let dir = temp_dir("failing");
        let generator = ReportGenerator::new(Arc::new(Failing), &dir);

        let err = generator.generate(&metadata()).unwrap_err();
        assert_eq!(err.error_code(), "REPORT_GENERATION_FAILED");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("timed out"));
        assert!(!dir.join("report_churn.md").exists());
    }
}
