//! Google Gemini AI provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the [`AIProvider`]
//! trait for Google's Gemini API (<https://ai.google.dev/>).

use std::time::Duration;

use super::AIProvider;
use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Gemini API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

/// Default model for narrative reports.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Models offered by the CLI.
pub const SUPPORTED_MODELS: [&str; 4] = [
    "gemini-2.5-flash",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default temperature for model responses.
const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Default max tokens for responses.
const DEFAULT_MAX_TOKENS: u32 = 2048;

// Gemini API request structures
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

// Gemini API response structures
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate. Blocked or empty responses
    /// yield an error.
    fn into_text(self) -> Result<String> {
        let candidate = self
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .ok_or_else(|| anyhow!("No response content from Gemini API"))?;

        if let Some(reason) = &candidate.finish_reason
            && (reason == "SAFETY" || reason == "BLOCKED")
        {
            return Err(anyhow!("Gemini response blocked ({})", reason));
        }

        let text: String = candidate
            .content
            .and_then(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(anyhow!("No response content from Gemini API"));
        }
        Ok(text)
    }
}

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// The model to use (e.g., "gemini-2.5-flash", "gemini-1.5-pro").
    pub model: String,
    /// Temperature for response generation (0.0 - 2.0).
    pub temperature: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Base URL for the API (useful for proxies or custom endpoints).
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl GeminiConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }
}

/// Builder for [`GeminiConfig`].
#[derive(Default)]
pub struct GeminiConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl GeminiConfigBuilder {
    /// Set the model to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature (0.0 - 2.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set a custom base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        GeminiConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        }
    }
}

/// Google Gemini provider for narrative report generation.
///
/// Requests are bounded by the configured timeout; a timed-out or failed
/// request is returned as an error and never retried.
///
/// # Example
///
/// ```rust,ignore
/// use autoeda::ai::{GeminiProvider, GeminiConfig};
///
/// // Simple usage with defaults
/// let provider = GeminiProvider::new("your-api-key")?;
///
/// // With custom configuration
/// let config = GeminiConfig::builder()
///     .model("gemini-1.5-pro")
///     .timeout_secs(120)
///     .build();
/// let provider = GeminiProvider::with_config("your-api-key", config)?;
/// ```
pub struct GeminiProvider {
    api_key: String,
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be
    /// created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GeminiConfig::default())
    }

    /// Create a new Gemini provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be
    /// created.
    pub fn with_config(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(anyhow!("Gemini API key is missing"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                role: "user".to_owned(),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        }
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(prompt);

        // Build URL: {base_url}{model}:generateContent?key={api_key}
        let url = format!(
            "{}{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.api_key
        );

        debug!("Calling Gemini model {}", self.config.model);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Gemini API error {}: {}",
                response.status(),
                response.text()?
            ));
        }

        let result: GeminiResponse = response.json()?;
        result.into_text()
    }
}

impl AIProvider for GeminiProvider {
    fn generate_text(&self, prompt: &str) -> Result<String> {
        self.call_api(prompt)
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    // -------------------------------------------------------------------------
    // GeminiResponse parsing tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_valid_response() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "Executive summary"}]},
                    "finishReason": "STOP"
                }]
            }"#,
        );
        assert_eq!(response.into_text().unwrap(), "Executive summary");
    }

    #[test]
    fn test_parse_response_multiple_parts_concatenated() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "First part. "}, {"text": "Second part."}]},
                    "finishReason": "STOP"
                }]
            }"#,
        );
        assert_eq!(response.into_text().unwrap(), "First part. Second part.");
    }

    #[test]
    fn test_parse_response_with_empty_candidates() {
        assert!(parse(r#"{"candidates": []}"#).into_text().is_err());
        assert!(parse(r#"{"candidates": null}"#).into_text().is_err());
    }

    #[test]
    fn test_parse_response_missing_content() {
        let response = parse(r#"{"candidates": [{"content": null, "finishReason": "STOP"}]}"#);
        assert!(response.into_text().is_err());

        let response =
            parse(r#"{"candidates": [{"content": {"parts": null}, "finishReason": "STOP"}]}"#);
        assert!(response.into_text().is_err());
    }

    #[test]
    fn test_parse_response_safety_blocked() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [{"text": "partial"}]}, "finishReason": "SAFETY"}]}"#,
        );
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_malformed_json() {
        let result: std::result::Result<GeminiResponse, _> =
            serde_json::from_str(r#"{"candidates": "not an array"}"#);
        assert!(result.is_err());
    }

    // -------------------------------------------------------------------------
    // Request tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_request_uses_camel_case_fields() {
        let provider = GeminiProvider::new("test-key").unwrap();
        let json = serde_json::to_value(provider.build_request("hello")).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], DEFAULT_MAX_TOKENS);
    }

    // -------------------------------------------------------------------------
    // Config builder tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_builder_defaults() {
        let config = GeminiConfig::builder().build();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_builder_custom_values() {
        let config = GeminiConfig::builder()
            .model("gemini-1.5-pro")
            .temperature(0.5)
            .max_tokens(4000)
            .timeout_secs(120)
            .base_url("https://custom.api.com/")
            .build();

        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.base_url, "https://custom.api.com/");
    }

    // -------------------------------------------------------------------------
    // Provider trait implementation tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(GeminiProvider::new("  ").is_err());
    }

    #[test]
    fn test_provider_name_and_model() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "Gemini");
        assert_eq!(provider.model(), Some(DEFAULT_MODEL));

        let config = GeminiConfig::builder().model("gemini-1.5-flash").build();
        let provider = GeminiProvider::with_config("test-key", config).unwrap();
        assert_eq!(provider.model(), Some("gemini-1.5-flash"));
        assert!(SUPPORTED_MODELS.contains(&provider.config().model.as_str()));
    }
}
