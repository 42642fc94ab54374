//! Pure rendering of a recipe document: markdown assembly, markdown-to-HTML
//! conversion, and the JSON-LD payload for search engines.

use crate::models::{Recipe, RecipeInstructions};
use pulldown_cmark::{html, Event, Parser};

/// Everything the display template needs, derived from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRecipe {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub html: String,
    pub json_ld: String,
}

/// Render a recipe document. Pure: the same document always produces the
/// same output.
pub fn render_recipe(recipe: &Recipe) -> Result<RenderedRecipe, serde_json::Error> {
    let markdown = recipe_markdown(recipe);
    Ok(RenderedRecipe {
        title: recipe.name.clone(),
        description: recipe.description.clone().unwrap_or_default(),
        image_url: recipe.first_image().map(String::from),
        html: markdown_to_html(&markdown),
        json_ld: serde_json::to_string(recipe)?,
    })
}

/// Reformat an ISO-8601 duration for display: strip the leading `PT` and
/// expand a trailing `M` to " minutes".
///
/// This is a string transform, not a duration parser: values without a
/// trailing `M` (e.g. "PT1H") pass through unchanged, a known limitation
/// carried over deliberately.
pub fn format_duration(value: &str) -> String {
    let trimmed = value.strip_prefix("PT").unwrap_or(value);
    match trimmed.strip_suffix('M') {
        Some(minutes) => format!("{minutes} minutes"),
        None => trimmed.to_string(),
    }
}

/// RFC3339 publish timestamps render as M/D/YYYY; anything unparseable
/// passes through as-is.
fn format_published_date(value: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(value) {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => value.to_string(),
    }
}

fn push_numbered_steps<'a, I>(out: &mut String, texts: I)
where
    I: Iterator<Item = &'a str>,
{
    let mut any = false;
    for (index, text) in texts.enumerate() {
        out.push_str(&format!("{}. {text}\n", index + 1));
        any = true;
    }
    if any {
        out.push('\n');
    }
}

/// Assemble the intermediate markdown document with its fixed section order:
/// title, description, byline, timing block, ingredients, instructions,
/// metadata trailer.
pub fn recipe_markdown(recipe: &Recipe) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", recipe.name));

    if let Some(description) = &recipe.description {
        md.push_str(&format!("{description}\n\n"));
    }

    if let Some(author) = &recipe.author {
        md.push_str(&format!("By {}\n\n", author.name));
    }

    md.push_str("## Preparation Time\n\n");
    if let Some(prep_time) = &recipe.prep_time {
        md.push_str(&format!("- Prep Time: {}\n", format_duration(prep_time)));
    }
    if let Some(cook_time) = &recipe.cook_time {
        md.push_str(&format!("- Cook Time: {}\n", format_duration(cook_time)));
    }
    if let Some(recipe_yield) = &recipe.recipe_yield {
        md.push_str(&format!("- Servings: {recipe_yield}\n"));
    }
    md.push('\n');

    md.push_str("## Ingredients\n\n");
    for ingredient in &recipe.recipe_ingredient {
        md.push_str(&format!("- {ingredient}\n"));
    }
    md.push('\n');

    md.push_str("## Instructions\n\n");
    match &recipe.recipe_instructions {
        RecipeInstructions::Flat(steps) => {
            push_numbered_steps(&mut md, steps.iter().map(|s| s.text.as_str()));
        }
        RecipeInstructions::Sectioned(_) => {
            // Sections are located by exact name; a missing section renders
            // as an empty list, not an error.
            for phase in ["Preparation", "Cooking"] {
                md.push_str(&format!("### {phase}\n\n"));
                let steps = recipe
                    .recipe_instructions
                    .section(phase)
                    .map(|s| s.item_list_element.as_slice())
                    .unwrap_or_default();
                push_numbered_steps(&mut md, steps.iter().map(|s| s.text.as_str()));
            }
        }
    }

    md.push_str("---\n\n");
    if let Some(cuisines) = &recipe.recipe_cuisine {
        md.push_str(&format!("Cuisine: {}\n\n", cuisines.join(", ")));
    }
    if let Some(categories) = &recipe.recipe_category {
        md.push_str(&format!("Category: {}\n\n", categories.join(", ")));
    }
    if let Some(published) = &recipe.date_published {
        md.push_str(&format!(
            "Published: {}\n",
            format_published_date(published)
        ));
    }

    md
}

/// Convert markdown to HTML. Raw HTML events are demoted to text so that
/// model-authored markup is escaped rather than injected into the page.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
