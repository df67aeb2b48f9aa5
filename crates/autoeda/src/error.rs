//! Custom error types for the analysis pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Load failures
//! and validation failures are distinct variants so callers can tell a file
//! that could not be parsed apart from a well-formed table that is too small
//! to analyse.
//!
//! Errors are serializable as `{ code, message }` so they can be handed to a
//! frontend or emitted in JSON output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input could not be parsed as tabular data.
    #[error("Failed to load '{source_name}': {reason}")]
    LoadFailed { source_name: String, reason: String },

    /// A structurally valid table failed the minimum-size policy.
    #[error("Dataset rejected: {0}")]
    ValidationFailed(ValidationFailure),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// AI client error.
    #[error("AI client error: {0}")]
    AiClientError(String),

    /// Narrative report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (for AI client, only with "ai" feature).
    #[cfg(feature = "ai")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Build a load failure for the given source.
    pub fn load_failed(source_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        AnalysisError::LoadFailed {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::AiClientError(_) => "AI_CLIENT_ERROR",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "ai")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// The validation failure carried by this error, if any.
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::ValidationFailed(failure) => Some(failure),
            Self::WithContext { source, .. } => source.validation_failure(),
            _ => None,
        }
    }

    /// Check if this error is recoverable (the process can keep serving
    /// other requests, and the user can act on the message).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ValidationFailed(_)
            | Self::InvalidConfig(_)
            | Self::AiClientError(_)
            | Self::ReportGenerationFailed(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// A single minimum-size threshold that a table did not meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(tag = "dimension", rename_all = "snake_case")]
pub enum SizeViolation {
    TooFewRows { actual: usize, min: usize },
    TooFewColumns { actual: usize, min: usize },
}

impl fmt::Display for SizeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewRows { actual, min } => {
                write!(f, "{actual} rows (minimum {min})")
            }
            Self::TooFewColumns { actual, min } => {
                write!(f, "{actual} columns (minimum {min})")
            }
        }
    }
}

/// Details of a failed minimum-size validation.
///
/// Every violated dimension is listed, so a table that is both too short and
/// too narrow reports both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ValidationFailure {
    pub rows: usize,
    pub columns: usize,
    pub violations: Vec<SizeViolation>,
}

impl ValidationFailure {
    pub fn rows_violated(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, SizeViolation::TooFewRows { .. }))
    }

    pub fn columns_violated(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, SizeViolation::TooFewColumns { .. }))
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "too small: {}", parts.join(", "))
    }
}

/// Serialize implementation for frontend/JSON consumers.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
