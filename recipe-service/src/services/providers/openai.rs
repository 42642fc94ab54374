//! OpenAI provider implementations.
//!
//! Text generation via the chat completions API with a JSON response
//! constraint; image generation via the images API.

use super::{GenerationParams, ImageParams, ImageProvider, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

fn build_client() -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {e}")))
}

/// OpenAI chat-completions text provider.
pub struct OpenAiTextProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiTextProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = build_client()?;
        Ok(Self { config, client })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl TextProvider for OpenAiTextProvider {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            response_format: params.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!("{status}: {body}")));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Malformed completion: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderError::ApiError("Model returned no content".to_string()))
    }
}

/// OpenAI images provider.
pub struct OpenAiImageProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiImageProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = build_client()?;
        Ok(Self { config, client })
    }
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
    style: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<String, ProviderError> {
        let request = ImageRequest {
            model: &self.config.model,
            prompt,
            n: 1,
            size: &params.size,
            quality: &params.quality,
            style: &params.style,
        };

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!("{status}: {body}")));
        }

        let images: ImageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Malformed image response: {e}")))?;

        images
            .data
            .into_iter()
            .next()
            .and_then(|datum| datum.url)
            .ok_or_else(|| ProviderError::ApiError("No image returned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn config(base_url: String, model: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: "fake_api_key".to_string(),
            base_url,
            model: model.to_string(),
        }
    }

    #[tokio::test]
    async fn text_generate_extracts_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "{\"name\": \"Pasta\"}"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let provider =
            OpenAiTextProvider::new(config(server.url(), "gpt-4o-mini")).unwrap();
        let params = GenerationParams {
            json_output: true,
            ..Default::default()
        };

        let result = provider
            .generate("You are a cooking assistant.", "pasta", &params)
            .await
            .unwrap();
        assert_eq!(result, "{\"name\": \"Pasta\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn text_generate_surfaces_api_errors() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "rate limited"}"#)
            .create_async()
            .await;

        let provider =
            OpenAiTextProvider::new(config(server.url(), "gpt-4o-mini")).unwrap();

        let result = provider
            .generate("system", "user", &GenerationParams::default())
            .await;
        assert!(matches!(result, Err(ProviderError::ApiError(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn text_generate_rejects_empty_content() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"content": ""}}]}"#)
            .create_async()
            .await;

        let provider =
            OpenAiTextProvider::new(config(server.url(), "gpt-4o-mini")).unwrap();

        let result = provider
            .generate("system", "user", &GenerationParams::default())
            .await;
        assert!(matches!(result, Err(ProviderError::ApiError(_))));
    }

    #[tokio::test]
    async fn image_generate_returns_first_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/images/generations")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": [{"url": "https://img.example/dish.png"}]}"#,
            )
            .create_async()
            .await;

        let provider = OpenAiImageProvider::new(config(server.url(), "dall-e-3")).unwrap();

        let url = provider
            .generate("a photo of pasta", &ImageParams::default())
            .await
            .unwrap();
        assert_eq!(url, "https://img.example/dish.png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn image_generate_rejects_missing_url() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/images/generations")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let provider = OpenAiImageProvider::new(config(server.url(), "dall-e-3")).unwrap();

        let result = provider
            .generate("a photo of pasta", &ImageParams::default())
            .await;
        assert!(matches!(result, Err(ProviderError::ApiError(_))));
    }
}
