//! Canonical chat completion schema

use crate::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Canonical chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Backend provider that should serve this request.
    pub provider: ProviderId,

    /// Model identifier; when absent the adapter substitutes its configured
    /// default.
    #[serde(default)]
    pub model: Option<String>,

    /// Ordered conversation history.
    pub messages: Vec<Message>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: Option<f32>,

    /// Maximum number of tokens to generate.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling threshold.
    #[serde(default)]
    pub top_p: Option<f32>,

    /// Random seed.
    #[serde(default)]
    pub seed: Option<i64>,
}

fn default_temperature() -> Option<f32> {
    Some(1.0)
}

/// Token accounting in the canonical shape.
///
/// `completion_tokens` is omitted for providers that only report a combined
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,

    pub total_tokens: u32,
}

/// A single choice in a chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    pub finish_reason: Option<String>,
}

/// Canonical chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Upstream-provided id, or a synthesized `chatcmpl-<uuid>` when the
    /// upstream returns none.
    pub id: String,

    /// Object-type tag, e.g. `chat.completion`.
    pub object: String,

    /// Creation time as unix seconds.
    pub created: i64,

    /// Always the provider the caller asked for, never upstream-supplied.
    pub provider: ProviderId,

    /// Resolved model identifier; never empty.
    pub model: String,

    pub choices: Vec<Choice>,

    /// Omitted entirely when the upstream reports no usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}
