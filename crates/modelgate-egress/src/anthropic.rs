//! Anthropic egress adapter
//!
//! Chat-only in the observed configuration: embeddings and image generation
//! are designed capability gaps and surface the typed unsupported error.

use crate::{
    client::{create_client, HttpClientConfig},
    resolve_model, EgressError, Result,
};
use async_trait::async_trait;
use modelgate_core::{
    chat::{ChatRequest, ChatResponse, Choice, Message, Role, Usage},
    embeddings::{EmbeddingRequest, EmbeddingResponse},
    images::{ImageRequest, ImageResponse},
    provider::{Capability, LlmProvider, ProviderCapabilities},
    synthetic,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Anthropic adapter configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the Anthropic API (default: https://api.anthropic.com)
    pub base_url: String,

    /// Anthropic API version (default: 2023-06-01)
    pub api_version: String,

    /// Default chat model when the request omits one
    pub chat_model: Option<String>,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            chat_model: None,
            client_config: HttpClientConfig::default(),
        }
    }

    /// Set the base URL (for custom endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the default chat model
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = Some(model.into());
        self
    }
}

/// Anthropic adapter
pub struct AnthropicConnector {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicConnector {
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let client = create_client(&config.client_config)?;
        Ok(Self { config, client })
    }

    async fn send_messages(&self, body: &MessagesBody) -> Result<UpstreamMessagesResponse> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
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
            .json::<UpstreamMessagesResponse>()
            .await
            .map_err(|e| EgressError::Parse(format!("Failed to parse Anthropic response: {}", e)))
    }
}

#[async_trait]
impl LlmProvider for AnthropicConnector {
    async fn complete(&self, request: ChatRequest) -> modelgate_core::Result<ChatResponse> {
        debug!("Sending chat completion request to Anthropic");

        let provider = request.provider;
        let body = to_messages_body(&request, self.config.chat_model.as_deref());

        let upstream = self.send_messages(&body).await.map_err(|e| {
            error!(error = %e, "Anthropic chat completion failed");
            modelgate_core::Error::from(e)
        })?;

        Ok(from_messages_response(upstream, provider, body.model))
    }

    async fn embed(&self, request: EmbeddingRequest) -> modelgate_core::Result<EmbeddingResponse> {
        Err(modelgate_core::Error::Unsupported {
            provider: request.provider,
            capability: Capability::Embeddings,
        })
    }

    async fn generate_images(
        &self,
        request: ImageRequest,
    ) -> modelgate_core::Result<ImageResponse> {
        Err(modelgate_core::Error::Unsupported {
            provider: request.provider,
            capability: Capability::Images,
        })
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            chat: true,
            embeddings: false,
            images: false,
        }
    }
}

// Anthropic wire types

#[derive(Debug, Clone, Serialize)]
struct MessagesBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamMessagesResponse {
    id: String,
    #[serde(rename = "type")]
    type_: String,
    role: String,
    content: Vec<UpstreamContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: UpstreamUsage,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamUsage {
    input_tokens: u32,
    output_tokens: u32,
}

// Conversion functions

fn to_messages_body(req: &ChatRequest, default_model: Option<&str>) -> MessagesBody {
    // Anthropic takes the system prompt as a top-level parameter, not a
    // conversation turn.
    let system = req
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.clone())
        .reduce(|mut acc, text| {
            acc.push('\n');
            acc.push_str(&text);
            acc
        });

    let messages = req
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| WireMessage {
            role: match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => unreachable!("system messages filtered above"),
            }
            .to_string(),
            content: m.content.clone(),
        })
        .collect();

    MessagesBody {
        model: resolve_model(req.model.as_deref(), default_model),
        messages,
        // max_tokens is mandatory on this API.
        max_tokens: req.max_tokens.unwrap_or(4096),
        system,
        temperature: req.temperature,
        top_p: req.top_p,
        stream: false,
    }
}

fn from_messages_response(
    resp: UpstreamMessagesResponse,
    provider: modelgate_core::ProviderId,
    resolved_model: Option<String>,
) -> ChatResponse {
    let role = match resp.role.as_str() {
        "user" => Role::User,
        _ => Role::Assistant,
    };

    // Flatten content blocks into an indexed choice list, preserving order.
    let choices = resp
        .content
        .into_iter()
        .enumerate()
        .map(|(index, block)| Choice {
            index: index as u32,
            message: Message {
                role,
                content: block.text.unwrap_or_default(),
            },
            finish_reason: resp.stop_reason.clone(),
        })
        .collect();

    ChatResponse {
        // Upstream supplies the id; only the timestamp is synthesized.
        id: resp.id,
        object: resp.type_,
        created: synthetic::unix_timestamp(),
        provider,
        model: resolved_model.unwrap_or(resp.model),
        choices,
        usage: Some(Usage {
            prompt_tokens: resp.usage.input_tokens,
            completion_tokens: None,
            total_tokens: resp.usage.input_tokens + resp.usage.output_tokens,
        }),
    }
}
