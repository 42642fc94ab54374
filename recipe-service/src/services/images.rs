//! Dish image generation from a recipe document.

use crate::models::Recipe;
use crate::services::providers::ImageParams;
use crate::services::recipes::GenerationError;
use crate::startup::AppState;

fn image_prompt(recipe: &Recipe) -> Result<String, GenerationError> {
    let document = serde_json::to_string(recipe)?;
    Ok(format!(
        "A professional, appetizing photo of {}. Food photography style, on a beautiful plate, \
         well-lit, high resolution, showing the finished dish. Also use the rest of the recipe \
         data: {} to generate the image",
        recipe.name, document
    ))
}

/// Generate a single square dish photo and return its URL.
///
/// The whole serialised document rides along in the prompt as grounding
/// context. No retry, no caching of the returned URL.
pub async fn generate(state: &AppState, recipe: &Recipe) -> Result<String, GenerationError> {
    let prompt = image_prompt(recipe)?;
    let url = state
        .image_provider
        .generate(&prompt, &ImageParams::default())
        .await?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_name_and_document() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"name": "Shakshuka", "recipeIngredient": ["eggs", "tomatoes"],
                "recipeInstructions": [{"text": "Simmer."}]}"#,
        )
        .unwrap();

        let prompt = image_prompt(&recipe).unwrap();
        assert!(prompt.contains("photo of Shakshuka"));
        assert!(prompt.contains(r#""recipeIngredient":["eggs","tomatoes"]"#));
    }
}
