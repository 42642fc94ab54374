//! Mock provider implementations for testing.

use super::{GenerationParams, ImageParams, ImageProvider, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A flat-instruction recipe document the mock text provider returns by
/// default.
pub const DEFAULT_RECIPE_JSON: &str = r#"{
    "@context": "http://schema.org",
    "@type": "Recipe",
    "name": "Mock Flatbread",
    "author": {"@type": "Person", "name": "Remy"},
    "description": "A flatbread that exists only in tests.",
    "datePublished": "2024-01-01T00:00:00.000Z",
    "recipeYield": "2",
    "prepTime": "PT10M",
    "cookTime": "PT5M",
    "recipeIngredient": ["1 cup flour", "1/2 cup water", "pinch of salt"],
    "recipeInstructions": [
        {"@type": "HowToStep", "text": "Mix the flour, water and salt."},
        {"@type": "HowToStep", "text": "Cook on a hot griddle."}
    ],
    "recipeCategory": ["Bread"],
    "recipeCuisine": ["Test Kitchen"],
    "keywords": "mock, flatbread",
    "image": []
}"#;

/// Mock text provider. Counts calls so tests can assert the external model
/// was never invoked.
pub struct MockTextProvider {
    enabled: bool,
    response: String,
    calls: AtomicUsize,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            response: DEFAULT_RECIPE_JSON.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            enabled: true,
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        _system: &str,
        _user: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        Ok(self.response.clone())
    }
}

/// Mock image provider.
pub struct MockImageProvider {
    enabled: bool,
    url: String,
    calls: AtomicUsize,
}

impl MockImageProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            url: "https://images.example/mock-dish.png".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: url.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(
        &self,
        _prompt: &str,
        _params: &ImageParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock image provider not enabled".to_string(),
            ));
        }

        Ok(self.url.clone())
    }
}
