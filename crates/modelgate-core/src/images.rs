//! Canonical image generation schema

use crate::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// How generated images are returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    Url,
    B64Json,
}

impl Default for ImageResponseFormat {
    fn default() -> Self {
        ImageResponseFormat::Url
    }
}

/// Canonical image generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub provider: ProviderId,

    #[serde(default)]
    pub model: Option<String>,

    pub prompt: String,

    /// Number of images to generate.
    pub n: u32,

    pub width: u32,

    pub height: u32,

    #[serde(default)]
    pub seed: Option<i64>,

    #[serde(default)]
    pub response_format: ImageResponseFormat,
}

/// One generated image. Exactly one of the two fields is populated; the other
/// is omitted from serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
}

impl ImageData {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            b64_json: None,
        }
    }

    pub fn b64_json(data: impl Into<String>) -> Self {
        Self {
            url: None,
            b64_json: Some(data.into()),
        }
    }
}

/// Canonical image generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub provider: ProviderId,
    pub model: String,
    pub created: i64,
    pub data: Vec<ImageData>,
}
