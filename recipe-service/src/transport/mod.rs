//! URL-safe transport token for carrying a recipe document between the
//! search submission and the display page, avoiding any server-side storage.
//!
//! The token is unsigned: it is trusted as produced by this process within
//! one request chain, and the display route treats any decode failure as
//! "go back to the search page".

use crate::models::Recipe;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("token does not contain a recipe document: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn encode_recipe(recipe: &Recipe) -> Result<String, TokenError> {
    let json = serde_json::to_vec(recipe)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_recipe(token: &str) -> Result<Recipe, TokenError> {
    let json = URL_SAFE_NO_PAD.decode(token)?;
    Ok(serde_json::from_slice(&json)?)
}
