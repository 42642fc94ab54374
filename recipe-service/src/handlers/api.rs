//! JSON API endpoints for recipe and image generation.

use crate::models::Recipe;
use crate::services::recipes::GenerationError;
use crate::services::{images, recipes};
use crate::startup::AppState;
use crate::transport;
use axum::{extract::State, Json};
use recipe_core::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRecipeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "query is required"))]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateRecipeResponse {
    pub recipe: Recipe,
    /// URL-safe transport token for the display route.
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(rename = "recipeData")]
    pub recipe_data: Option<Recipe>,
}

#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

fn upstream(message: &'static str, cause: GenerationError) -> AppError {
    tracing::error!(error = %cause, "{}", message);
    AppError::Upstream(anyhow::anyhow!(message))
}

/// Combined generation: recipe first, then the dish photo, whose URL is
/// spliced into the document before it is returned. An image failure aborts
/// the whole request; there is no recipe-without-image fallback.
pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRecipeRequest>,
) -> Result<Json<GenerateRecipeResponse>, AppError> {
    payload.validate()?;

    let mut recipe = recipes::generate(&state, &payload.query)
        .await
        .map_err(|e| upstream("Failed to generate recipe", e))?;

    let image_url = images::generate(&state, &recipe)
        .await
        .map_err(|e| upstream("Failed to generate recipe", e))?;
    recipe.image = Some(vec![image_url]);

    let token =
        transport::encode_recipe(&recipe).map_err(|e| AppError::InternalError(e.into()))?;

    Ok(Json(GenerateRecipeResponse { recipe, token }))
}

/// Standalone image generation for an already-generated recipe document.
pub async fn generate_image(
    State(state): State<AppState>,
    Json(payload): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, AppError> {
    let recipe = payload
        .recipe_data
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("recipeData is required")))?;

    let image_url = images::generate(&state, &recipe)
        .await
        .map_err(|e| upstream("Failed to generate image", e))?;

    Ok(Json(GenerateImageResponse { image_url }))
}
