//! OpenAI egress adapter

use crate::{
    client::{create_client, with_retry, HttpClientConfig},
    resolve_model, EgressError, Result,
};
use async_trait::async_trait;
use modelgate_core::{
    chat::{ChatRequest, ChatResponse, Choice, Message, Role, Usage},
    embeddings::{EmbeddingInput, EmbeddingItem, EmbeddingRequest, EmbeddingResponse},
    images::{ImageData, ImageRequest, ImageResponse, ImageResponseFormat},
    provider::{LlmProvider, ProviderCapabilities},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// OpenAI adapter configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for bearer authentication
    pub api_key: String,

    /// Base URL for the OpenAI API (default: https://api.openai.com)
    pub base_url: String,

    /// Default chat model when the request omits one
    pub chat_model: Option<String>,

    /// Default embeddings model when the request omits one
    pub embeddings_model: Option<String>,

    /// Default image generation model when the request omits one
    pub image_model: Option<String>,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: None,
            embeddings_model: None,
            image_model: None,
            client_config: HttpClientConfig::default(),
        }
    }

    /// Set the base URL (for custom endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-capability default models
    pub fn with_default_models(
        mut self,
        chat: Option<String>,
        embeddings: Option<String>,
        image: Option<String>,
    ) -> Self {
        self.chat_model = chat;
        self.embeddings_model = embeddings;
        self.image_model = image;
        self
    }
}

/// OpenAI adapter
pub struct OpenAiConnector {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiConnector {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = create_client(&config.client_config)?;
        Ok(Self { config, client })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(format!("{}{}", self.config.base_url, path))
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(EgressError::Provider {
                status_code: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| EgressError::Parse(format!("Failed to parse OpenAI response: {}", e)))
    }
}

#[async_trait]
impl LlmProvider for OpenAiConnector {
    async fn complete(&self, request: ChatRequest) -> modelgate_core::Result<ChatResponse> {
        debug!("Sending chat completion request to OpenAI");

        let provider = request.provider;
        let body = ChatBody {
            model: resolve_model(request.model.as_deref(), self.config.chat_model.as_deref()),
            messages: request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            seed: request.seed,
            stream: false,
        };

        let upstream: UpstreamChatResponse = self
            .post_json("/v1/chat/completions", &body)
            .await
            .map_err(|e| {
                error!(error = %e, "OpenAI chat completion failed");
                modelgate_core::Error::from(e)
            })?;

        Ok(from_chat_response(upstream, provider, body.model))
    }

    async fn embed(&self, request: EmbeddingRequest) -> modelgate_core::Result<EmbeddingResponse> {
        debug!("Sending embeddings request to OpenAI");

        let provider = request.provider;
        let body = EmbeddingsBody {
            model: resolve_model(
                request.model.as_deref(),
                self.config.embeddings_model.as_deref(),
            ),
            input: request.input,
        };

        let max_retries = self.config.client_config.max_retries;
        let upstream: UpstreamEmbeddingsResponse =
            with_retry(max_retries, || self.post_json("/v1/embeddings", &body))
                .await
                .map_err(|e| {
                    error!(error = %e, "OpenAI embeddings failed");
                    modelgate_core::Error::from(e)
                })?;

        Ok(from_embeddings_response(upstream, provider, body.model))
    }

    async fn generate_images(
        &self,
        request: ImageRequest,
    ) -> modelgate_core::Result<ImageResponse> {
        debug!("Sending image generation request to OpenAI");

        let provider = request.provider;
        let model = resolve_model(request.model.as_deref(), self.config.image_model.as_deref())
            .ok_or_else(|| {
                modelgate_core::Error::Config(
                    "no image generation model supplied or configured for openai".to_string(),
                )
            })?;

        let body = ImagesBody {
            model: model.clone(),
            prompt: request.prompt,
            n: request.n,
            // OpenAI takes a single size string rather than separate dimensions.
            size: format!("{}x{}", request.width, request.height),
            response_format: request.response_format,
        };

        let upstream: UpstreamImagesResponse = self
            .post_json("/v1/images/generations", &body)
            .await
            .map_err(|e| {
                error!(error = %e, "OpenAI image generation failed");
                modelgate_core::Error::from(e)
            })?;

        Ok(ImageResponse {
            provider,
            model,
            created: upstream.created,
            data: upstream
                .data
                .into_iter()
                .map(|item| ImageData {
                    url: item.url,
                    b64_json: item.b64_json,
                })
                .collect(),
        })
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            chat: true,
            embeddings: true,
            images: true,
        }
    }
}

// OpenAI wire types

#[derive(Debug, Clone, Serialize)]
struct ChatBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamChatResponse {
    id: String,
    object: String,
    created: i64,
    model: String,
    choices: Vec<UpstreamChoice>,
    usage: Option<UpstreamUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamChoice {
    index: u32,
    message: UpstreamMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamUsage {
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: Option<u32>,
    total_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct EmbeddingsBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    input: EmbeddingInput,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamEmbeddingsResponse {
    object: String,
    data: Vec<UpstreamEmbeddingItem>,
    model: String,
    usage: Option<UpstreamUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamEmbeddingItem {
    object: String,
    embedding: Vec<f32>,
    index: u32,
}

#[derive(Debug, Clone, Serialize)]
struct ImagesBody {
    model: String,
    prompt: String,
    n: u32,
    size: String,
    response_format: ImageResponseFormat,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamImagesResponse {
    created: i64,
    data: Vec<UpstreamImageItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamImageItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

// Normalization

fn parse_role(role: &str) -> Role {
    match role {
        "system" => Role::System,
        "user" => Role::User,
        _ => Role::Assistant,
    }
}

fn from_usage(usage: UpstreamUsage) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
    }
}

fn from_chat_response(
    resp: UpstreamChatResponse,
    provider: modelgate_core::ProviderId,
    resolved_model: Option<String>,
) -> ChatResponse {
    let model = resolved_model.unwrap_or_else(|| resp.model.clone());

    ChatResponse {
        id: resp.id,
        object: resp.object,
        created: resp.created,
        provider,
        model,
        choices: resp
            .choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                message: Message {
                    role: parse_role(&choice.message.role),
                    content: choice.message.content.unwrap_or_default(),
                },
                finish_reason: choice.finish_reason,
            })
            .collect(),
        usage: resp.usage.map(from_usage),
    }
}

fn from_embeddings_response(
    resp: UpstreamEmbeddingsResponse,
    provider: modelgate_core::ProviderId,
    resolved_model: Option<String>,
) -> EmbeddingResponse {
    let model = resolved_model.unwrap_or_else(|| resp.model.clone());

    EmbeddingResponse {
        object: resp.object,
        data: resp
            .data
            .into_iter()
            .map(|item| EmbeddingItem {
                object: item.object,
                embedding: item.embedding,
                index: item.index,
            })
            .collect(),
        provider,
        model,
        usage: resp.usage.map(from_usage),
    }
}
