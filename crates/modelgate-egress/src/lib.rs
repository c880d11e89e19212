//! Modelgate Egress Adapters
//!
//! This crate provides the per-provider adapters behind the
//! [`LlmProvider`](modelgate_core::LlmProvider) capability trait:
//! - OpenAI adapter (chat, embeddings, images)
//! - Anthropic adapter (chat only)
//! - SageMaker managed-inference adapter (chat, embeddings, images)

pub mod anthropic;
pub mod client;
pub mod openai;
pub mod s3;
pub mod sagemaker;

use thiserror::Error;

/// Errors raised while talking to an upstream provider.
///
/// These never cross the crate boundary as-is: the `From` impl below collapses
/// them into the opaque core provider error so upstream SDK/HTTP error types
/// stay internal to this crate.
#[derive(Debug, Error)]
pub enum EgressError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned error status {status_code}: {message}")]
    Provider { status_code: u16, message: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid image payload: {0}")]
    ImagePayload(String),
}

pub type Result<T> = std::result::Result<T, EgressError>;

impl From<EgressError> for modelgate_core::Error {
    fn from(err: EgressError) -> Self {
        match err {
            EgressError::Config(msg) => modelgate_core::Error::Config(msg),
            other => modelgate_core::Error::Provider(other.to_string()),
        }
    }
}

/// Resolve the model for a request: the caller's value when present and
/// non-empty, otherwise the adapter's configured default.
///
/// Returns `None` when neither is available; adapters then forward the request
/// without a model and surface whatever error the upstream raises.
pub(crate) fn resolve_model(requested: Option<&str>, default: Option<&str>) -> Option<String> {
    match requested {
        Some(model) if !model.is_empty() => Some(model.to_string()),
        _ => default.filter(|d| !d.is_empty()).map(str::to_string),
    }
}
