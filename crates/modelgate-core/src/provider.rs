//! Provider identifiers and the capability trait

use crate::{
    chat::{ChatRequest, ChatResponse},
    embeddings::{EmbeddingRequest, EmbeddingResponse},
    error::{Error, Result},
    images::{ImageRequest, ImageResponse},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of backend providers the gateway can route to.
///
/// Using an enum instead of a free-form string means an unknown provider is
/// rejected at the schema boundary, before any adapter is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    SageMaker,
    Anthropic,
}

impl ProviderId {
    /// All known provider identifiers.
    pub const ALL: [ProviderId; 3] = [
        ProviderId::OpenAi,
        ProviderId::SageMaker,
        ProviderId::Anthropic,
    ];

    /// Wire name of the provider, as it appears in requests and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::SageMaker => "sagemaker",
            ProviderId::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(ProviderId::OpenAi),
            "sagemaker" => Ok(ProviderId::SageMaker),
            "anthropic" => Ok(ProviderId::Anthropic),
            other => Err(Error::InvalidProvider(other.to_string())),
        }
    }
}

/// One of the three gateway capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Chat,
    Embeddings,
    Images,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Chat => "chat completions",
            Capability::Embeddings => "embeddings",
            Capability::Images => "image generation",
        };
        f.write_str(name)
    }
}

/// Which capabilities a given adapter actually implements.
#[derive(Debug, Clone, Copy)]
pub struct ProviderCapabilities {
    pub chat: bool,
    pub embeddings: bool,
    pub images: bool,
}

impl ProviderCapabilities {
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Chat => self.chat,
            Capability::Embeddings => self.embeddings,
            Capability::Images => self.images,
        }
    }
}

/// Per-provider adapter interface.
///
/// Every adapter translates the canonical request into its upstream call
/// convention, performs exactly one upstream call, and normalizes the result
/// back into the canonical schema. Operations a provider does not offer must
/// return [`Error::Unsupported`] rather than an empty result.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Non-streaming chat completion.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Text embeddings.
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse>;

    /// Image generation.
    async fn generate_images(&self, request: ImageRequest) -> Result<ImageResponse>;

    /// Which capabilities this adapter implements.
    fn capabilities(&self) -> ProviderCapabilities;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_round_trip() {
        for id in ProviderId::ALL {
            assert_eq!(ProviderId::from_str(id.as_str()).unwrap(), id);
        }
    }

    #[test]
    fn test_provider_id_rejects_unknown() {
        let err = ProviderId::from_str("invalid-name").unwrap_err();
        match err {
            Error::InvalidProvider(name) => assert_eq!(name, "invalid-name"),
            other => panic!("expected InvalidProvider, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_id_serde_lowercase() {
        let json = serde_json::to_string(&ProviderId::SageMaker).unwrap();
        assert_eq!(json, r#""sagemaker""#);

        let parsed: ProviderId = serde_json::from_str(r#""anthropic""#).unwrap();
        assert_eq!(parsed, ProviderId::Anthropic);

        assert!(serde_json::from_str::<ProviderId>(r#""azure""#).is_err());
    }

    #[test]
    fn test_capabilities_lookup() {
        let caps = ProviderCapabilities {
            chat: true,
            embeddings: false,
            images: true,
        };
        assert!(caps.supports(Capability::Chat));
        assert!(!caps.supports(Capability::Embeddings));
        assert!(caps.supports(Capability::Images));
    }
}
