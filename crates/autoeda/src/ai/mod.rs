//! AI module for LLM-written narrative reports.
//!
//! # Feature Flag
//!
//! The concrete providers require the `ai` feature flag (on by default).
//! The [`AIProvider`] trait is always available for custom implementations.
//!
//! ```toml
//! # Enable AI support (default)
//! autoeda = { version = "0.1", features = ["ai"] }
//!
//! # Disable AI support for smaller binary
//! autoeda = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use autoeda::ai::GeminiProvider;
//! use autoeda::reporting::ReportGenerator;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(GeminiProvider::new("your-api-key")?);
//! let generator = ReportGenerator::new(provider, "reports");
//! let narrative = generator.generate(&outcome.metadata())?;
//! ```

// Provider trait is always available (for custom implementations)
mod provider;
pub use provider::AIProvider;

// Concrete providers require the "ai" feature
#[cfg(feature = "ai")]
mod gemini;

#[cfg(feature = "ai")]
pub use gemini::{
    DEFAULT_MODEL, GeminiConfig, GeminiConfigBuilder, GeminiProvider, SUPPORTED_MODELS,
};
