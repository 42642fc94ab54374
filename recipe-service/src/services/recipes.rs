//! Recipe generation: prompt construction, the provider call, and strict
//! parse-and-validate of the model response.

use crate::config::InstructionStyle;
use crate::models::Recipe;
use crate::services::providers::{GenerationParams, ProviderError};
use crate::startup::AppState;
use chrono::{SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("model response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned an incomplete recipe: {0}")]
    Invalid(String),
}

/// System instruction template. `%AUTHOR%` and `%TIMESTAMP%` are filled per
/// request; `%INSTRUCTIONS%` selects one of the two instruction shapes.
const SYSTEM_TEMPLATE: &str = r#"You are a helpful cooking assistant. Return recipes in the following JSON format:
{
  "@context": "http://schema.org",
  "@type": "Recipe",
  "name": "Recipe Name",
  "author": {
    "@type": "Person",
    "name": "%AUTHOR%"
  },
  "description": "Brief description",
  "datePublished": "%TIMESTAMP%",
  "recipeYield": "4",
  "prepTime": "PTxM",
  "cookTime": "PTxM",
  "recipeIngredient": ["ingredient 1", "ingredient 2"],
  "recipeInstructions": %INSTRUCTIONS%,
  "recipeCategory": ["category 1", "category 2"],
  "recipeCuisine": ["cuisine 1", "cuisine 2"],
  "keywords": "keywords",
  "image": []
}"#;

const FLAT_INSTRUCTIONS: &str = r#"[
    {
      "@type": "HowToStep",
      "text": "Step description"
    }
  ]"#;

const SECTIONED_INSTRUCTIONS: &str = r#"[
    {
      "@type": "HowToSection",
      "name": "Preparation",
      "itemListElement": [
        {
          "@type": "HowToStep",
          "text": "Step description"
        }
      ]
    },
    {
      "@type": "HowToSection",
      "name": "Cooking",
      "itemListElement": [
        {
          "@type": "HowToStep",
          "text": "Step description"
        }
      ]
    }
  ]"#;

const SECTIONED_SUFFIX: &str = "\nSplit the instructions into a preparation phase and a cooking phase, using exactly the two named sections shown.";

fn system_prompt(style: InstructionStyle, author: &str, published_at: &str) -> String {
    let instructions = match style {
        InstructionStyle::Flat => FLAT_INSTRUCTIONS,
        InstructionStyle::Sectioned => SECTIONED_INSTRUCTIONS,
    };

    let mut prompt = SYSTEM_TEMPLATE
        .replace("%AUTHOR%", author)
        .replace("%TIMESTAMP%", published_at)
        .replace("%INSTRUCTIONS%", instructions);

    if style == InstructionStyle::Sectioned {
        prompt.push_str(SECTIONED_SUFFIX);
    }

    prompt
}

/// Generate a recipe document for a free-text query.
///
/// Single attempt, no retry: a provider failure, unparseable JSON, or a
/// document missing required fields all surface immediately.
pub async fn generate(state: &AppState, query: &str) -> Result<Recipe, GenerationError> {
    let published_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let prompts = &state.config.prompts;

    let system = system_prompt(prompts.instruction_style, &prompts.author_name, &published_at);
    let user = format!("Please provide a recipe for: {query}");

    let params = GenerationParams {
        json_output: true,
        ..Default::default()
    };
    let raw = state.text_provider.generate(&system, &user, &params).await?;

    let mut recipe: Recipe = serde_json::from_str(&raw)?;

    // The prompt asks the model to echo the stamp; if it dropped the field,
    // the generation time still ends up on the document.
    if recipe.date_published.is_none() {
        recipe.date_published = Some(published_at);
    }

    recipe
        .check_renderable()
        .map_err(GenerationError::Invalid)?;

    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, ModelSettings, OpenAiSettings, PromptSettings};
    use crate::services::providers::mock::{MockImageProvider, MockTextProvider};
    use recipe_core::config::Config;
    use std::sync::Arc;

    fn test_state(text: Arc<MockTextProvider>) -> AppState {
        AppState {
            config: AppConfig {
                common: Config { port: 0 },
                openai: OpenAiSettings {
                    api_key: "test-api-key".to_string(),
                    base_url: "https://api.openai.com".to_string(),
                },
                models: ModelSettings {
                    provider: "mock".to_string(),
                    text_model: "gpt-4o-mini".to_string(),
                    image_model: "dall-e-3".to_string(),
                },
                prompts: PromptSettings {
                    author_name: "Remy".to_string(),
                    instruction_style: InstructionStyle::Sectioned,
                },
            },
            text_provider: text,
            image_provider: Arc::new(MockImageProvider::new(true)),
        }
    }

    #[tokio::test]
    async fn generates_a_renderable_recipe() {
        let state = test_state(Arc::new(MockTextProvider::new(true)));

        let recipe = generate(&state, "flatbread").await.unwrap();
        assert_eq!(recipe.name, "Mock Flatbread");
        assert!(!recipe.recipe_ingredient.is_empty());
        assert!(recipe.date_published.is_some());
    }

    #[tokio::test]
    async fn stamps_date_published_when_the_model_omits_it() {
        let state = test_state(Arc::new(MockTextProvider::with_response(
            r#"{"name": "Bare", "recipeIngredient": ["x"],
                "recipeInstructions": [{"text": "Cook."}]}"#,
        )));

        let recipe = generate(&state, "bare").await.unwrap();
        assert!(recipe.date_published.is_some());
    }

    #[tokio::test]
    async fn rejects_unparseable_output() {
        let state = test_state(Arc::new(MockTextProvider::with_response("not json")));

        let result = generate(&state, "anything").await;
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[tokio::test]
    async fn rejects_incomplete_documents() {
        let state = test_state(Arc::new(MockTextProvider::with_response(
            r#"{"name": "No Ingredients", "recipeIngredient": [],
                "recipeInstructions": [{"text": "Cook."}]}"#,
        )));

        let result = generate(&state, "anything").await;
        assert!(matches!(result, Err(GenerationError::Invalid(_))));
    }

    #[tokio::test]
    async fn surfaces_provider_failures() {
        let state = test_state(Arc::new(MockTextProvider::new(false)));

        let result = generate(&state, "anything").await;
        assert!(matches!(result, Err(GenerationError::Provider(_))));
    }

    #[test]
    fn sectioned_prompt_names_both_phases() {
        let prompt = system_prompt(InstructionStyle::Sectioned, "Remy", "2024-01-01T00:00:00Z");
        assert!(prompt.contains(r#""name": "Preparation""#));
        assert!(prompt.contains(r#""name": "Cooking""#));
        assert!(prompt.contains(r#""name": "Remy""#));
        assert!(prompt.contains("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn flat_prompt_has_no_sections() {
        let prompt = system_prompt(InstructionStyle::Flat, "Remy", "2024-01-01T00:00:00Z");
        assert!(!prompt.contains("HowToSection"));
        assert!(prompt.contains("HowToStep"));
    }
}
