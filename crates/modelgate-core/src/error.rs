//! Error types for Modelgate Core

use crate::provider::{Capability, ProviderId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid provider name {0}")]
    InvalidProvider(String),

    #[error("{capability} is not supported by provider '{provider}'")]
    Unsupported {
        provider: ProviderId,
        capability: Capability,
    },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
