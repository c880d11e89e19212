//! Gateway configuration from environment variables

use modelgate_egress::s3::DEFAULT_IMAGE_URL_TTL_SECS;

/// OpenAI provider settings.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub chat_model: Option<String>,
    pub embeddings_model: Option<String>,
    pub image_model: Option<String>,
}

/// Anthropic provider settings.
#[derive(Debug, Clone)]
pub struct AnthropicSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub chat_model: Option<String>,
}

/// SageMaker provider settings.
///
/// AWS credentials come from the ambient credential chain; only the region,
/// endpoint names, and image hosting details are configured here.
#[derive(Debug, Clone)]
pub struct SageMakerSettings {
    pub region: String,
    pub chat_model: Option<String>,
    pub embeddings_model: Option<String>,
    pub image_model: Option<String>,
    pub bucket: Option<String>,
    pub image_url_ttl_secs: u64,
}

/// Full gateway configuration.
///
/// Providers without credentials stay `None` and are not registered; requests
/// naming them fail with a configuration error instead of reaching upstream.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub openai: Option<OpenAiSettings>,
    pub anthropic: Option<AnthropicSettings>,
    pub sagemaker: SageMakerSettings,
}

impl GatewayConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an injectable lookup, for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let openai = get("OPENAI_API_KEY").map(|api_key| OpenAiSettings {
            api_key,
            base_url: get("OPENAI_BASE_URL"),
            chat_model: get("OPENAI_CHAT_COMPLETIONS_MODEL"),
            embeddings_model: get("OPENAI_EMBEDDINGS_MODEL"),
            image_model: get("OPENAI_IMAGE_CREATION_MODEL"),
        });

        let anthropic = get("ANTHROPIC_API_KEY").map(|api_key| AnthropicSettings {
            api_key,
            base_url: get("ANTHROPIC_BASE_URL"),
            chat_model: get("ANTHROPIC_CHAT_COMPLETIONS_MODEL"),
        });

        let sagemaker = SageMakerSettings {
            region: get("AWS_REGION_NAME").unwrap_or_else(|| "us-east-1".to_string()),
            chat_model: get("SM_CHAT_COMPLETIONS_MODEL"),
            embeddings_model: get("SM_EMBEDDINGS_MODEL"),
            image_model: get("SM_IMAGE_CREATION_MODEL"),
            bucket: get("S3_BUCKET_NAME"),
            image_url_ttl_secs: get("IMAGE_URL_TTL_IN_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_IMAGE_URL_TTL_SECS),
        };

        Self {
            openai,
            anthropic,
            sagemaker,
        }
    }
}
