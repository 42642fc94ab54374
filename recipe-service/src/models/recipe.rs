//! The schema.org-style Recipe document.
//!
//! This is the single domain entity: produced by the generator, carried
//! through the transport token, consumed by the renderer and emitted
//! verbatim as JSON-LD. Fields the service never interprets (`@context`,
//! `nutrition`, `aggregateRating`, ...) are preserved through the flattened
//! `extra` map so a document survives an encode/decode round trip intact.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<RecipeYield>,

    /// ISO-8601 duration, e.g. "PT30M".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,

    #[serde(default)]
    pub recipe_ingredient: Vec<String>,

    pub recipe_instructions: RecipeInstructions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_category: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_cuisine: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Result URLs attached after image generation completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<String>>,

    /// Pass-through fields the service never interprets.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Recipe {
    /// Required-field check shared by the generator boundary and the display
    /// route. A document failing this is rejected, not rendered half-empty.
    pub fn check_renderable(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("recipe is missing a name".to_string());
        }
        if self.recipe_ingredient.is_empty() {
            return Err("recipe has no ingredients".to_string());
        }
        if self.recipe_instructions.is_empty() {
            return Err("recipe has no instructions".to_string());
        }
        Ok(())
    }

    pub fn first_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .and_then(|urls| urls.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Serving count: either a plain string ("4") or a schema.org
/// QuantitativeValue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeYield {
    Text(String),
    Quantity(YieldQuantity),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldQuantity {
    pub value: serde_json::Number,
    pub unit_text: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Display for RecipeYield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeYield::Text(text) => f.write_str(text),
            RecipeYield::Quantity(q) => write!(f, "{} {}", q.value, q.unit_text),
        }
    }
}

/// The two instruction shapes that coexist across generator versions.
///
/// Shape detection happens here, once, at deserialisation: a document whose
/// instructions match neither shape fails to decode instead of reaching the
/// renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeInstructions {
    Sectioned(Vec<InstructionSection>),
    Flat(Vec<InstructionStep>),
}

impl RecipeInstructions {
    pub fn is_empty(&self) -> bool {
        match self {
            RecipeInstructions::Flat(steps) => steps.is_empty(),
            RecipeInstructions::Sectioned(sections) => {
                sections.iter().all(|s| s.item_list_element.is_empty())
            }
        }
    }

    /// Look up a section by exact name. Flat documents have no sections.
    pub fn section(&self, name: &str) -> Option<&InstructionSection> {
        match self {
            RecipeInstructions::Flat(_) => None,
            RecipeInstructions::Sectioned(sections) => {
                sections.iter().find(|s| s.name == name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionSection {
    pub name: String,
    pub item_list_element: Vec<InstructionStep>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Recipe {
        serde_json::from_str(json).expect("recipe should parse")
    }

    #[test]
    fn parses_flat_instructions() {
        let recipe = parse(
            r#"{
                "name": "Toast",
                "recipeIngredient": ["bread"],
                "recipeInstructions": [
                    {"@type": "HowToStep", "text": "Toast the bread."}
                ]
            }"#,
        );

        match &recipe.recipe_instructions {
            RecipeInstructions::Flat(steps) => {
                assert_eq!(steps.len(), 1);
                assert_eq!(steps[0].text, "Toast the bread.");
            }
            other => panic!("expected flat instructions, got {other:?}"),
        }
    }

    #[test]
    fn parses_sectioned_instructions() {
        let recipe = parse(
            r#"{
                "name": "Soup",
                "recipeIngredient": ["water"],
                "recipeInstructions": [
                    {
                        "@type": "HowToSection",
                        "name": "Preparation",
                        "itemListElement": [{"text": "Chop."}]
                    },
                    {
                        "@type": "HowToSection",
                        "name": "Cooking",
                        "itemListElement": [{"text": "Boil."}]
                    }
                ]
            }"#,
        );

        let prep = recipe
            .recipe_instructions
            .section("Preparation")
            .expect("preparation section");
        assert_eq!(prep.item_list_element[0].text, "Chop.");
        assert!(recipe.recipe_instructions.section("Plating").is_none());
    }

    #[test]
    fn rejects_instructions_matching_neither_shape() {
        let result = serde_json::from_str::<Recipe>(
            r#"{
                "name": "Broken",
                "recipeIngredient": ["x"],
                "recipeInstructions": "just wing it"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let json = r#"{
            "@context": "http://schema.org",
            "@type": "Recipe",
            "name": "Salad",
            "recipeIngredient": ["lettuce"],
            "recipeInstructions": [{"text": "Toss."}],
            "nutrition": {"@type": "NutritionInformation", "calories": "120 kcal"},
            "suitableForDiet": ["VeganDiet"]
        }"#;
        let recipe = parse(json);
        assert_eq!(
            recipe.extra.get("@type").and_then(|v| v.as_str()),
            Some("Recipe")
        );

        let reparsed = parse(&serde_json::to_string(&recipe).unwrap());
        assert_eq!(recipe, reparsed);
        assert!(reparsed.extra.contains_key("nutrition"));
    }

    #[test]
    fn yield_accepts_both_shapes() {
        let text = parse(
            r#"{"name": "A", "recipeYield": "4", "recipeIngredient": ["x"],
                "recipeInstructions": [{"text": "Cook."}]}"#,
        );
        assert_eq!(text.recipe_yield.unwrap().to_string(), "4");

        let quantity = parse(
            r#"{"name": "B",
                "recipeYield": {"@type": "QuantitativeValue", "value": 6, "unitText": "servings"},
                "recipeIngredient": ["x"],
                "recipeInstructions": [{"text": "Cook."}]}"#,
        );
        assert_eq!(quantity.recipe_yield.unwrap().to_string(), "6 servings");
    }

    #[test]
    fn check_renderable_requires_name_ingredients_and_steps() {
        let no_name = parse(
            r#"{"name": "  ", "recipeIngredient": ["x"],
                "recipeInstructions": [{"text": "Cook."}]}"#,
        );
        assert!(no_name.check_renderable().is_err());

        let no_ingredients = parse(
            r#"{"name": "A", "recipeIngredient": [],
                "recipeInstructions": [{"text": "Cook."}]}"#,
        );
        assert!(no_ingredients.check_renderable().is_err());

        let empty_sections = parse(
            r#"{"name": "A", "recipeIngredient": ["x"],
                "recipeInstructions": [
                    {"name": "Preparation", "itemListElement": []}
                ]}"#,
        );
        assert!(empty_sections.check_renderable().is_err());

        let ok = parse(
            r#"{"name": "A", "recipeIngredient": ["x"],
                "recipeInstructions": [{"text": "Cook."}]}"#,
        );
        assert!(ok.check_renderable().is_ok());
    }
}
