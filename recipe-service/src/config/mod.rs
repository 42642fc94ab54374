use recipe_core::config as core_config;
use recipe_core::error::AppError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiSettings,
    pub models: ModelSettings,
    pub prompts: PromptSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Provider backend: "openai" or "mock" (tests).
    pub provider: String,
    /// Model for recipe JSON generation (e.g. gpt-4o-mini).
    pub text_model: String,
    /// Model for dish photography (e.g. dall-e-3).
    pub image_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptSettings {
    /// Author name stamped into every generated recipe document.
    pub author_name: String,
    pub instruction_style: InstructionStyle,
}

/// Shape the model is asked to use for `recipeInstructions`.
///
/// Both shapes remain accepted on the way back in; this only selects the
/// prompt variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionStyle {
    /// One flat list of steps.
    Flat,
    /// Two named sections, "Preparation" and "Cooking".
    Sectioned,
}

impl InstructionStyle {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "flat" => Ok(InstructionStyle::Flat),
            "sectioned" => Ok(InstructionStyle::Sectioned),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "RECIPE_INSTRUCTION_STYLE must be 'flat' or 'sectioned', got '{}'",
                other
            ))),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AppConfig {
            common: common_config,
            openai: OpenAiSettings {
                api_key: get_env("OPENAI_API_KEY", None, is_prod)?,
                base_url: get_env("OPENAI_BASE_URL", Some("https://api.openai.com"), is_prod)?,
            },
            models: ModelSettings {
                provider: get_env("RECIPE_PROVIDER", Some("openai"), is_prod)?,
                text_model: get_env("RECIPE_TEXT_MODEL", Some("gpt-4o-mini"), is_prod)?,
                image_model: get_env("RECIPE_IMAGE_MODEL", Some("dall-e-3"), is_prod)?,
            },
            prompts: PromptSettings {
                author_name: get_env("RECIPE_AUTHOR_NAME", Some("Remy"), is_prod)?,
                instruction_style: InstructionStyle::parse(&get_env(
                    "RECIPE_INSTRUCTION_STYLE",
                    Some("sectioned"),
                    is_prod,
                )?)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
