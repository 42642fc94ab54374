//! Server-rendered pages: the search form and the recipe display route.

use crate::render;
use crate::transport;
use askama::Template;
use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use recipe_core::error::AppError;
use serde::Deserialize;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

pub async fn index() -> impl IntoResponse {
    IndexTemplate {}
}

#[derive(Debug, Deserialize)]
pub struct DisplayParams {
    pub query: Option<String>,
    pub recipe: Option<String>,
}

#[derive(Template)]
#[template(path = "recipe.html")]
pub struct RecipeTemplate {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub content: String,
    pub json_ld: String,
}

/// Display route. A missing parameter, an undecodable token or a document
/// that cannot be rendered all send the visitor back to the search page;
/// none of them is a user-facing error.
pub async fn show_recipe(Query(params): Query<DisplayParams>) -> Response {
    let has_query = params
        .query
        .as_deref()
        .is_some_and(|q| !q.trim().is_empty());
    let Some(token) = params.recipe.as_deref().filter(|t| !t.is_empty()) else {
        return Redirect::to("/").into_response();
    };
    if !has_query {
        return Redirect::to("/").into_response();
    }

    let recipe = match transport::decode_recipe(token) {
        Ok(recipe) => recipe,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid recipe token, redirecting to search");
            return Redirect::to("/").into_response();
        }
    };

    if let Err(reason) = recipe.check_renderable() {
        tracing::warn!(%reason, "Recipe document not renderable, redirecting to search");
        return Redirect::to("/").into_response();
    }

    match render::render_recipe(&recipe) {
        Ok(rendered) => RecipeTemplate {
            title: rendered.title,
            description: rendered.description,
            image_url: rendered.image_url,
            content: rendered.html,
            json_ld: rendered.json_ld,
        }
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render recipe");
            AppError::InternalError(e.into()).into_response()
        }
    }
}
