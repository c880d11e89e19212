//! HTTP surface of the gateway
//!
//! Three OpenAI-shaped routes, each dispatching through the provider registry.
//! Error payloads are a single `{"error": "..."}` envelope.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use modelgate_core::{
    chat::ChatRequest, embeddings::EmbeddingRequest, images::ImageRequest, Error,
};
use modelgate_routing::ProviderRegistry;
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ProviderRegistry>,
}

/// Build the gateway router.
pub fn router(registry: Arc<ProviderRegistry>) -> Router {
    Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/embeddings", post(embeddings))
        .route("/v1/images/generations", post(image_generations))
        .with_state(AppState { registry })
}

/// Gateway error with its HTTP mapping.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            // Malformed or unroutable requests are the caller's fault.
            Error::Serialization(_) | Error::InvalidProvider(_) | Error::Config(_) => {
                StatusCode::BAD_REQUEST
            }
            // A declared capability gap, not a failure.
            Error::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
            Error::Provider(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "Request failed");
        }

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

// Bodies deserialize through serde_json::Value so that unknown provider names
// surface as the gateway's own 400 envelope rather than the extractor's.

async fn chat_completions(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let request: ChatRequest = serde_json::from_value(body).map_err(Error::from)?;
    let response = state.registry.complete(request).await?;
    Ok(Json(response).into_response())
}

async fn embeddings(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let request: EmbeddingRequest = serde_json::from_value(body).map_err(Error::from)?;
    let response = state.registry.embed(request).await?;
    Ok(Json(response).into_response())
}

async fn image_generations(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let request: ImageRequest = serde_json::from_value(body).map_err(Error::from)?;
    let response = state.registry.generate_images(request).await?;
    Ok(Json(response).into_response())
}
