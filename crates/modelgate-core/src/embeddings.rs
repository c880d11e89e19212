//! Canonical embedding schema

use crate::chat::Usage;
use crate::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Embedding input: either a single text or an ordered batch of texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// View the input as an ordered list of texts.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            EmbeddingInput::Single(text) => vec![text.as_str()],
            EmbeddingInput::Batch(texts) => texts.iter().map(String::as_str).collect(),
        }
    }
}

/// Canonical embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub provider: ProviderId,

    #[serde(default)]
    pub model: Option<String>,

    pub input: EmbeddingInput,
}

/// One embedding vector with its position in the input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingItem {
    pub object: String,
    pub embedding: Vec<f32>,
    pub index: u32,
}

/// Canonical embedding response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub object: String,

    /// Items in input order, indices dense from 0.
    pub data: Vec<EmbeddingItem>,

    pub provider: ProviderId,

    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}
