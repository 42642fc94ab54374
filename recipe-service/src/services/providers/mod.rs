//! AI provider abstractions and implementations.
//!
//! Trait-based seam so the backends (OpenAI, mock) can be swapped without
//! touching the handlers. Providers are constructed once at startup and
//! carried in `AppState` as `Arc<dyn ...>`.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Generation parameters for text requests.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<u32>,

    /// Constrain the response to a single JSON object.
    pub json_output: bool,
}

/// Parameters for image requests.
#[derive(Debug, Clone)]
pub struct ImageParams {
    pub size: String,
    pub quality: String,
    pub style: String,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            style: "natural".to_string(),
        }
    }
}

/// Trait for text/JSON generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a completion for a system/user instruction pair.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}

/// Trait for image generation providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate one image and return its result URL.
    async fn generate(&self, prompt: &str, params: &ImageParams)
        -> Result<String, ProviderError>;
}
