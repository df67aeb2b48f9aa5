//! Text-generation provider trait.
//!
//! Narrative reports are produced by an external LLM service. The
//! [`AIProvider`] trait hides which one, so the report generator can be
//! exercised with any backend (or a stub in tests).
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/ai/` (e.g., `openai.rs`)
//! 2. Implement [`AIProvider`] for your provider struct
//! 3. Export the provider in `src/ai/mod.rs`
//!
//! # Example
//!
//! ```rust,ignore
//! use autoeda::ai::{AIProvider, GeminiProvider};
//!
//! let provider = GeminiProvider::new("your-api-key")?;
//! let text = provider.generate_text("Summarize this dataset: ...")?;
//! ```

use anyhow::Result;

/// Trait for services that turn a prompt into free text.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage across threads.
///
/// # Error Handling
///
/// Implementations should return meaningful errors via `anyhow::Result`.
/// Callers treat any failure as recoverable and do not retry.
pub trait AIProvider: Send + Sync {
    /// Send a prompt and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, is blocked by the
    /// service, or the response carries no text.
    fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Get the provider name for logging and debugging.
    fn name(&self) -> &str;

    /// Get the model being used by this provider.
    ///
    /// Returns `None` if the provider doesn't expose model information.
    fn model(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl AIProvider for Echo {
        fn generate_text(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_uppercase())
        }

        fn name(&self) -> &str {
            "Echo"
        }
    }

    #[test]
    fn test_default_model_is_none() {
        let provider = Echo;
        assert_eq!(provider.model(), None);
        assert_eq!(provider.generate_text("hi").unwrap(), "HI");
    }

    #[test]
    fn test_trait_object() {
        let provider: Box<dyn AIProvider> = Box::new(Echo);
        assert_eq!(provider.name(), "Echo");
    }
}
