//! SageMaker managed-inference egress adapter
//!
//! Unlike the two direct API providers, SageMaker endpoints return bare
//! generation lists with no response id, timestamp, or usage accounting, so
//! this adapter does the heaviest normalization: synthetic ids/timestamps,
//! dense index assignment, and image hosting through object storage.

use crate::{
    resolve_model,
    s3::{ImageStore, S3ImageStore, DEFAULT_IMAGE_URL_TTL_SECS},
    EgressError, Result,
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sagemakerruntime::error::DisplayErrorContext;
use aws_smithy_types::Blob;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use modelgate_core::{
    chat::{ChatRequest, ChatResponse, Choice, Message, Role},
    embeddings::{EmbeddingItem, EmbeddingRequest, EmbeddingResponse},
    images::{ImageData, ImageRequest, ImageResponse, ImageResponseFormat},
    provider::{LlmProvider, ProviderCapabilities},
    synthetic,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

// Fixed diffusion parameters the managed image endpoints expect.
const NUM_INFERENCE_STEPS: u32 = 50;
const GUIDANCE_SCALE: f32 = 7.5;

const ACCEPT_EULA: &str = "accept_eula=true";

/// Invokes a hosted model endpoint by name.
///
/// A trait seam so the adapter can be tested against recorded payloads
/// instead of a live SageMaker runtime.
#[async_trait]
pub trait EndpointInvoker: Send + Sync {
    async fn invoke(
        &self,
        endpoint: &str,
        body: Vec<u8>,
        content_type: &str,
        accept: Option<&str>,
    ) -> Result<Vec<u8>>;
}

/// Real invoker backed by the SageMaker runtime API.
pub struct SageMakerRuntimeInvoker {
    client: aws_sdk_sagemakerruntime::Client,
}

impl SageMakerRuntimeInvoker {
    pub fn new(client: aws_sdk_sagemakerruntime::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EndpointInvoker for SageMakerRuntimeInvoker {
    async fn invoke(
        &self,
        endpoint: &str,
        body: Vec<u8>,
        content_type: &str,
        accept: Option<&str>,
    ) -> Result<Vec<u8>> {
        let output = self
            .client
            .invoke_endpoint()
            .endpoint_name(endpoint)
            .body(Blob::new(body))
            .content_type(content_type)
            .custom_attributes(ACCEPT_EULA)
            .set_accept(accept.map(str::to_string))
            .send()
            .await
            .map_err(|e| EgressError::Provider {
                status_code: 500,
                message: format!("InvokeEndpoint failed: {}", DisplayErrorContext(&e)),
            })?;

        Ok(output
            .body()
            .map(|blob| blob.as_ref().to_vec())
            .unwrap_or_default())
    }
}

/// SageMaker adapter configuration
#[derive(Debug, Clone)]
pub struct SageMakerConfig {
    /// AWS region of the hosted endpoints (default: us-east-1)
    pub region: String,

    /// Default chat completions endpoint name
    pub chat_model: Option<String>,

    /// Default embeddings endpoint name
    pub embeddings_model: Option<String>,

    /// Default image generation endpoint name
    pub image_model: Option<String>,

    /// Bucket for hosted image URLs; `url`-format image responses require it
    pub bucket: Option<String>,

    /// Lifetime of hosted image URLs, in seconds
    pub image_url_ttl_secs: u64,
}

impl Default for SageMakerConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            chat_model: None,
            embeddings_model: None,
            image_model: None,
            bucket: None,
            image_url_ttl_secs: DEFAULT_IMAGE_URL_TTL_SECS,
        }
    }
}

/// SageMaker adapter
pub struct SageMakerConnector {
    config: SageMakerConfig,
    invoker: Arc<dyn EndpointInvoker>,
    image_store: Option<Arc<dyn ImageStore>>,
}

impl SageMakerConnector {
    /// Construct against the real SageMaker runtime, with credentials and
    /// region resolved from the process environment.
    pub async fn new(config: SageMakerConfig) -> Result<Self> {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let invoker: Arc<dyn EndpointInvoker> = Arc::new(SageMakerRuntimeInvoker::new(
            aws_sdk_sagemakerruntime::Client::new(&aws_config),
        ));

        let image_store: Option<Arc<dyn ImageStore>> = config.bucket.clone().map(|bucket| {
            Arc::new(S3ImageStore::new(
                aws_sdk_s3::Client::new(&aws_config),
                bucket,
                config.image_url_ttl_secs,
            )) as Arc<dyn ImageStore>
        });

        Ok(Self::with_parts(config, invoker, image_store))
    }

    /// Construct from explicit parts (dependency injection for tests).
    pub fn with_parts(
        config: SageMakerConfig,
        invoker: Arc<dyn EndpointInvoker>,
        image_store: Option<Arc<dyn ImageStore>>,
    ) -> Self {
        Self {
            config,
            invoker,
            image_store,
        }
    }

    async fn invoke_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
        content_type: &str,
        accept: Option<&str>,
    ) -> Result<R> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| EgressError::Parse(format!("Failed to encode payload: {}", e)))?;

        let raw = self
            .invoker
            .invoke(endpoint, payload, content_type, accept)
            .await?;

        serde_json::from_slice(&raw)
            .map_err(|e| EgressError::Parse(format!("Failed to parse endpoint response: {}", e)))
    }

    async fn image_item(
        &self,
        response_format: ImageResponseFormat,
        base64_image: String,
    ) -> Result<ImageData> {
        match response_format {
            ImageResponseFormat::B64Json => Ok(ImageData::b64_json(base64_image)),
            ImageResponseFormat::Url => {
                let store = self.image_store.as_ref().ok_or_else(|| {
                    EgressError::Config(
                        "url response format requires a configured image bucket".to_string(),
                    )
                })?;
                let png = png_bytes(&base64_image)?;
                let url = store.store_png(png).await?;
                Ok(ImageData::url(url))
            }
        }
    }
}

#[async_trait]
impl LlmProvider for SageMakerConnector {
    async fn complete(&self, request: ChatRequest) -> modelgate_core::Result<ChatResponse> {
        debug!("Invoking SageMaker chat completions endpoint");

        let provider = request.provider;
        let model = resolve_model(request.model.as_deref(), self.config.chat_model.as_deref())
            .unwrap_or_default();
        let payload = chat_payload(&request);

        let generations: Vec<UpstreamGeneration> = self
            .invoke_json(&model, &payload, "application/json", None)
            .await
            .map_err(|e| {
                error!(error = %e, "SageMaker chat completion failed");
                modelgate_core::Error::from(e)
            })?;

        Ok(ChatResponse {
            // Bare generation lists carry no id or timestamp; synthesize both.
            id: synthetic::completion_id(),
            object: "chat.completion".to_string(),
            created: synthetic::unix_timestamp(),
            provider,
            model,
            choices: generations
                .into_iter()
                .enumerate()
                .map(|(index, item)| Choice {
                    index: index as u32,
                    message: Message {
                        role: parse_role(&item.generation.role),
                        content: item.generation.content,
                    },
                    finish_reason: None,
                })
                .collect(),
            // The endpoint reports no token counts; never synthesize zeros.
            usage: None,
        })
    }

    async fn embed(&self, request: EmbeddingRequest) -> modelgate_core::Result<EmbeddingResponse> {
        debug!("Invoking SageMaker embeddings endpoint");

        let provider = request.provider;
        let model = resolve_model(
            request.model.as_deref(),
            self.config.embeddings_model.as_deref(),
        )
        .unwrap_or_default();

        // The endpoint takes the bare input array as its body, not a JSON
        // object, with a text-oriented content type.
        let texts = request.input.texts();
        let upstream: UpstreamEmbeddings = self
            .invoke_json(&model, &texts, "application/x-text", None)
            .await
            .map_err(|e| {
                error!(error = %e, "SageMaker embeddings failed");
                modelgate_core::Error::from(e)
            })?;

        Ok(EmbeddingResponse {
            object: "list".to_string(),
            data: upstream
                .embedding
                .into_iter()
                .enumerate()
                .map(|(index, embedding)| EmbeddingItem {
                    object: "embedding".to_string(),
                    embedding,
                    index: index as u32,
                })
                .collect(),
            provider,
            model,
            usage: None,
        })
    }

    async fn generate_images(
        &self,
        request: ImageRequest,
    ) -> modelgate_core::Result<ImageResponse> {
        debug!("Invoking SageMaker image generation endpoint");

        let provider = request.provider;
        let response_format = request.response_format;
        let model = resolve_model(request.model.as_deref(), self.config.image_model.as_deref())
            .unwrap_or_default();
        let payload = image_payload(&request);

        let upstream: UpstreamGeneratedImages = self
            .invoke_json(
                &model,
                &payload,
                "application/json",
                Some("application/json;jpeg"),
            )
            .await
            .map_err(|e| {
                error!(error = %e, "SageMaker image generation failed");
                modelgate_core::Error::from(e)
            })?;

        let mut data = Vec::with_capacity(upstream.generated_images.len());
        for base64_image in upstream.generated_images {
            let item = self
                .image_item(response_format, base64_image)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to prepare generated image");
                    modelgate_core::Error::from(e)
                })?;
            data.push(item);
        }

        Ok(ImageResponse {
            provider,
            model,
            created: synthetic::unix_timestamp(),
            data,
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

// Wire types

#[derive(Debug, Clone, Serialize)]
struct ChatPayload {
    inputs: Vec<Vec<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<GenerationParameters>,
}

#[derive(Debug, Clone, Serialize)]
struct GenerationParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

impl GenerationParameters {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_new_tokens.is_none() && self.top_p.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamGeneration {
    generation: UpstreamGenerationMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamGenerationMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamGeneratedImages {
    generated_images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamEmbeddings {
    embedding: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize)]
struct ImagePayload {
    prompt: String,
    width: u32,
    height: u32,
    num_images_per_prompt: u32,
    num_inference_steps: u32,
    guidance_scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
}

// Conversion functions

fn chat_payload(req: &ChatRequest) -> ChatPayload {
    let parameters = GenerationParameters {
        temperature: req.temperature,
        max_new_tokens: req.max_tokens,
        top_p: req.top_p,
    };

    ChatPayload {
        inputs: vec![req.messages.clone()],
        parameters: (!parameters.is_empty()).then_some(parameters),
    }
}

fn image_payload(req: &ImageRequest) -> ImagePayload {
    ImagePayload {
        prompt: req.prompt.clone(),
        width: req.width,
        height: req.height,
        num_images_per_prompt: req.n,
        num_inference_steps: NUM_INFERENCE_STEPS,
        guidance_scale: GUIDANCE_SCALE,
        seed: req.seed,
    }
}

fn parse_role(role: &str) -> Role {
    match role {
        "system" => Role::System,
        "user" => Role::User,
        _ => Role::Assistant,
    }
}

/// Decode a base64 image and re-encode it as PNG for hosting.
fn png_bytes(base64_image: &str) -> Result<Vec<u8>> {
    let raw = BASE64
        .decode(base64_image)
        .map_err(|e| EgressError::ImagePayload(format!("Invalid base64 image: {}", e)))?;

    let decoded = image::load_from_memory(&raw)
        .map_err(|e| EgressError::ImagePayload(format!("Unreadable image data: {}", e)))?;

    let mut out = Vec::new();
    decoded
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| EgressError::ImagePayload(format!("PNG encoding failed: {}", e)))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_core::embeddings::EmbeddingInput;
    use modelgate_core::ProviderId;
    use std::sync::Mutex;

    // 1x1 transparent PNG.
    const TINY_PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    #[derive(Debug, Clone)]
    struct RecordedInvocation {
        endpoint: String,
        body: Vec<u8>,
        content_type: String,
        accept: Option<String>,
    }

    /// Records every invocation and replies with a canned body.
    struct StubInvoker {
        response: Vec<u8>,
        calls: Mutex<Vec<RecordedInvocation>>,
    }

    impl StubInvoker {
        fn returning(response: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                response: serde_json::to_vec(&response).unwrap(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<RecordedInvocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EndpointInvoker for StubInvoker {
        async fn invoke(
            &self,
            endpoint: &str,
            body: Vec<u8>,
            content_type: &str,
            accept: Option<&str>,
        ) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(RecordedInvocation {
                endpoint: endpoint.to_string(),
                body,
                content_type: content_type.to_string(),
                accept: accept.map(str::to_string),
            });
            Ok(self.response.clone())
        }
    }

    /// Records uploads and replies with a fixed URL.
    struct StubStore {
        url: String,
        uploads: Mutex<Vec<Vec<u8>>>,
    }

    impl StubStore {
        fn returning(url: &str) -> Arc<Self> {
            Arc::new(Self {
                url: url.to_string(),
                uploads: Mutex::new(Vec::new()),
            })
        }

        fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageStore for StubStore {
        async fn store_png(&self, bytes: Vec<u8>) -> Result<String> {
            self.uploads.lock().unwrap().push(bytes);
            Ok(self.url.clone())
        }
    }

    fn connector(
        invoker: Arc<StubInvoker>,
        store: Option<Arc<StubStore>>,
    ) -> SageMakerConnector {
        let config = SageMakerConfig {
            chat_model: Some("llama-2-7b-chat".to_string()),
            embeddings_model: Some("all-minilm".to_string()),
            image_model: Some("sdxl".to_string()),
            bucket: Some("generated-images".to_string()),
            ..SageMakerConfig::default()
        };
        SageMakerConnector::with_parts(
            config,
            invoker,
            store.map(|s| s as Arc<dyn ImageStore>),
        )
    }

    fn chat_request(messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            provider: ProviderId::SageMaker,
            model: None,
            messages,
            temperature: Some(0.5),
            max_tokens: Some(256),
            top_p: None,
            seed: None,
        }
    }

    #[test]
    fn test_chat_payload_shape() {
        let request = chat_request(vec![
            Message::new(Role::System, "Be brief."),
            Message::new(Role::User, "Hello"),
        ]);

        let json = serde_json::to_value(chat_payload(&request)).unwrap();
        assert_eq!(json["inputs"][0][0]["role"], "system");
        assert_eq!(json["inputs"][0][1]["content"], "Hello");
        assert_eq!(json["parameters"]["temperature"], 0.5);
        assert_eq!(json["parameters"]["max_new_tokens"], 256);
        assert!(json["parameters"].get("top_p").is_none());
    }

    #[test]
    fn test_chat_payload_omits_empty_parameters() {
        let mut request = chat_request(vec![Message::new(Role::User, "Hello")]);
        request.temperature = None;
        request.max_tokens = None;
        request.top_p = None;

        let json = serde_json::to_value(chat_payload(&request)).unwrap();
        assert!(json.get("parameters").is_none());
    }

    #[test]
    fn test_image_payload_fixed_parameters() {
        let request = ImageRequest {
            provider: ProviderId::SageMaker,
            model: None,
            prompt: "a lighthouse".to_string(),
            n: 3,
            width: 512,
            height: 768,
            seed: Some(42),
            response_format: ImageResponseFormat::Url,
        };

        let json = serde_json::to_value(image_payload(&request)).unwrap();
        assert_eq!(json["num_images_per_prompt"], 3);
        assert_eq!(json["num_inference_steps"], 50);
        assert_eq!(json["guidance_scale"], 7.5);
        assert_eq!(json["width"], 512);
        assert_eq!(json["height"], 768);
        assert_eq!(json["seed"], 42);
    }

    #[tokio::test]
    async fn test_complete_normalizes_generation_list() {
        let invoker = StubInvoker::returning(serde_json::json!([
            {"generation": {"role": "assistant", "content": "first"}},
            {"generation": {"role": "assistant", "content": "second"}},
            {"generation": {"role": "assistant", "content": "third"}}
        ]));
        let connector = connector(invoker.clone(), None);

        let response = connector
            .complete(chat_request(vec![Message::new(Role::User, "Hello")]))
            .await
            .unwrap();

        assert_eq!(response.provider, ProviderId::SageMaker);
        assert_eq!(response.model, "llama-2-7b-chat");
        assert!(response.id.starts_with("chatcmpl-"));
        assert_eq!(response.object, "chat.completion");
        assert!(response.usage.is_none());

        assert_eq!(response.choices.len(), 3);
        for (i, choice) in response.choices.iter().enumerate() {
            assert_eq!(choice.index, i as u32);
        }
        assert_eq!(response.choices[1].message.content, "second");

        let calls = invoker.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].endpoint, "llama-2-7b-chat");
        assert_eq!(calls[0].content_type, "application/json");
        assert_eq!(calls[0].accept, None);
    }

    #[tokio::test]
    async fn test_complete_prefers_request_model() {
        let invoker = StubInvoker::returning(serde_json::json!([]));
        let connector = connector(invoker.clone(), None);

        let mut request = chat_request(vec![Message::new(Role::User, "Hello")]);
        request.model = Some("llama-2-70b-chat".to_string());

        let response = connector.complete(request).await.unwrap();
        assert_eq!(response.model, "llama-2-70b-chat");
        assert_eq!(invoker.calls()[0].endpoint, "llama-2-70b-chat");
    }

    #[tokio::test]
    async fn test_complete_is_deterministic_except_id_and_created() {
        let invoker = StubInvoker::returning(serde_json::json!([
            {"generation": {"role": "assistant", "content": "same"}}
        ]));
        let connector = connector(invoker, None);

        let a = connector
            .complete(chat_request(vec![Message::new(Role::User, "Hello")]))
            .await
            .unwrap();
        let b = connector
            .complete(chat_request(vec![Message::new(Role::User, "Hello")]))
            .await
            .unwrap();

        assert_eq!(a.choices, b.choices);
        assert_eq!(a.model, b.model);
        assert_eq!(a.provider, b.provider);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_embed_builds_indexed_items() {
        let invoker = StubInvoker::returning(serde_json::json!({
            "embedding": [[0.1, 0.2], [0.3, 0.4]]
        }));
        let connector = connector(invoker.clone(), None);

        let response = connector
            .embed(EmbeddingRequest {
                provider: ProviderId::SageMaker,
                model: None,
                input: EmbeddingInput::Batch(vec!["a".to_string(), "b".to_string()]),
            })
            .await
            .unwrap();

        assert_eq!(response.object, "list");
        assert_eq!(response.provider, ProviderId::SageMaker);
        assert_eq!(response.model, "all-minilm");
        assert!(response.usage.is_none());

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].object, "embedding");
        assert_eq!(response.data[0].embedding, vec![0.1, 0.2]);
        assert_eq!(response.data[0].index, 0);
        assert_eq!(response.data[1].embedding, vec![0.3, 0.4]);
        assert_eq!(response.data[1].index, 1);

        // Body is the bare input array with a text-oriented content type.
        let calls = invoker.calls();
        assert_eq!(calls[0].content_type, "application/x-text");
        let body: serde_json::Value = serde_json::from_slice(&calls[0].body).unwrap();
        assert_eq!(body, serde_json::json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_embed_wraps_single_input() {
        let invoker = StubInvoker::returning(serde_json::json!({"embedding": [[1.0]]}));
        let connector = connector(invoker.clone(), None);

        connector
            .embed(EmbeddingRequest {
                provider: ProviderId::SageMaker,
                model: None,
                input: EmbeddingInput::Single("only".to_string()),
            })
            .await
            .unwrap();

        let body: serde_json::Value =
            serde_json::from_slice(&invoker.calls()[0].body).unwrap();
        assert_eq!(body, serde_json::json!(["only"]));
    }

    #[tokio::test]
    async fn test_generate_images_b64_passthrough_skips_upload() {
        let invoker = StubInvoker::returning(serde_json::json!({
            "generated_images": ["QUJD"]
        }));
        let store = StubStore::returning("https://unused.example.com");
        let connector = connector(invoker.clone(), Some(store.clone()));

        let response = connector
            .generate_images(ImageRequest {
                provider: ProviderId::SageMaker,
                model: None,
                prompt: "a boat".to_string(),
                n: 1,
                width: 512,
                height: 512,
                seed: None,
                response_format: ImageResponseFormat::B64Json,
            })
            .await
            .unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0], ImageData::b64_json("QUJD"));
        assert_eq!(store.upload_count(), 0);

        assert_eq!(
            invoker.calls()[0].accept,
            Some("application/json;jpeg".to_string())
        );
    }

    #[tokio::test]
    async fn test_generate_images_url_uploads_png() {
        let invoker = StubInvoker::returning(serde_json::json!({
            "generated_images": [TINY_PNG_B64]
        }));
        let store = StubStore::returning("https://bucket.s3.amazonaws.com/abc.png?sig=1");
        let connector = connector(invoker, Some(store.clone()));

        let response = connector
            .generate_images(ImageRequest {
                provider: ProviderId::SageMaker,
                model: None,
                prompt: "a boat".to_string(),
                n: 1,
                width: 512,
                height: 512,
                seed: None,
                response_format: ImageResponseFormat::Url,
            })
            .await
            .unwrap();

        assert_eq!(
            response.data[0],
            ImageData::url("https://bucket.s3.amazonaws.com/abc.png?sig=1")
        );
        assert_eq!(store.upload_count(), 1);

        // Uploaded bytes carry the PNG signature.
        let uploads = store.uploads.lock().unwrap();
        assert_eq!(&uploads[0][..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn test_generate_images_url_without_bucket_is_config_error() {
        let invoker = StubInvoker::returning(serde_json::json!({
            "generated_images": [TINY_PNG_B64]
        }));
        let connector = connector(invoker, None);

        let err = connector
            .generate_images(ImageRequest {
                provider: ProviderId::SageMaker,
                model: None,
                prompt: "a boat".to_string(),
                n: 1,
                width: 512,
                height: 512,
                seed: None,
                response_format: ImageResponseFormat::Url,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, modelgate_core::Error::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_upstream_payload_is_opaque_provider_error() {
        let invoker = StubInvoker::returning(serde_json::json!({"unexpected": true}));
        let connector = connector(invoker, None);

        let err = connector
            .complete(chat_request(vec![Message::new(Role::User, "Hello")]))
            .await
            .unwrap_err();

        assert!(matches!(err, modelgate_core::Error::Provider(_)));
    }

    #[test]
    fn test_png_bytes_round_trip() {
        let png = png_bytes(TINY_PNG_B64).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_png_bytes_rejects_garbage() {
        assert!(png_bytes("not base64!!!").is_err());
        // Valid base64, not an image.
        assert!(png_bytes("QUJD").is_err());
    }
}
