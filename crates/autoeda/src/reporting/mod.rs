//! Report generation module.
//!
//! - [`ReportMetadata`] is the flat statistics bundle handed to narrative
//!   generation.
//! - [`ReportGenerator`] builds the prompt, calls an [`AIProvider`], and saves
//!   the narrative as Markdown.
//! - [`AnalysisReport`] is the full JSON export used by `--json` and
//!   `--emit-report`.
//!
//! # Example
//!
//! ```rust,ignore
//! use autoeda::reporting::ReportGenerator;
//! use std::path::Path;
//!
//! // JSON export
//! let report = outcome.report("data/sales.csv");
//! report.write_to_file(Path::new("reports"))?;
//!
//! // Narrative
//! let generator = ReportGenerator::new(provider, "reports");
//! let narrative = generator.generate(&outcome.metadata())?;
//! println!("{}", narrative.text);
//! ```
//!
//! [`AIProvider`]: crate::ai::AIProvider

mod generator;
mod metadata;
mod report;

pub use generator::{NarrativeReport, ReportGenerator};
pub use metadata::ReportMetadata;
pub use report::AnalysisReport;
