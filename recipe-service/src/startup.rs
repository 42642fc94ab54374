//! Application startup and lifecycle management.

use crate::config::AppConfig;
use crate::handlers;
use crate::services::providers::mock::{MockImageProvider, MockTextProvider};
use crate::services::providers::openai::{OpenAiConfig, OpenAiImageProvider, OpenAiTextProvider};
use crate::services::providers::{ImageProvider, ProviderError, TextProvider};
use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use recipe_core::error::AppError;
use recipe_core::middleware::tracing::request_id_middleware;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Constructed once at startup; the provider
/// handles are the only way handlers reach the external AI service.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub text_provider: Arc<dyn TextProvider>,
    pub image_provider: Arc<dyn ImageProvider>,
}

/// Health check endpoint for liveness probes.
async fn health_check(State(_state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "recipe-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/recipe", get(handlers::pages::show_recipe))
        .route("/health", get(health_check))
        .route("/api/generate-recipe", post(handlers::api::generate_recipe))
        .route("/api/generate-image", post(handlers::api::generate_image))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn provider_config(config: &AppConfig, model: &str) -> OpenAiConfig {
    OpenAiConfig {
        api_key: config.openai.api_key.clone(),
        base_url: config.openai.base_url.clone(),
        model: model.to_string(),
    }
}

fn build_providers(
    config: &AppConfig,
) -> Result<(Arc<dyn TextProvider>, Arc<dyn ImageProvider>), ProviderError> {
    match config.models.provider.as_str() {
        "openai" => {
            let text =
                OpenAiTextProvider::new(provider_config(config, &config.models.text_model))?;
            let image =
                OpenAiImageProvider::new(provider_config(config, &config.models.image_model))?;

            tracing::info!(
                text_model = %config.models.text_model,
                image_model = %config.models.image_model,
                "Initialized OpenAI providers"
            );

            Ok((Arc::new(text), Arc::new(image)))
        }
        "mock" => {
            tracing::info!("Initialized mock providers");
            Ok((
                Arc::new(MockTextProvider::new(true)),
                Arc::new(MockImageProvider::new(true)),
            ))
        }
        other => Err(ProviderError::NotConfigured(format!(
            "Unknown provider '{other}', expected 'openai' or 'mock'"
        ))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        let (text_provider, image_provider) = build_providers(&config)
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        let state = AppState {
            config: config.clone(),
            text_provider,
            image_provider,
        };

        // Port 0 binds a random port, used by the integration tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
