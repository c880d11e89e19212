//! Provider registry and request dispatcher

use modelgate_core::{
    chat::{ChatRequest, ChatResponse},
    embeddings::{EmbeddingRequest, EmbeddingResponse},
    error::{Error, Result},
    images::{ImageRequest, ImageResponse},
    provider::{LlmProvider, ProviderId},
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Maps provider identifiers to adapter instances.
///
/// Adapters are constructed once at startup and shared; resolution is a plain
/// map lookup with no pooling or caching on top.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter for a provider.
    pub fn register(&mut self, id: ProviderId, provider: Arc<dyn LlmProvider>) -> &mut Self {
        self.providers.insert(id, provider);
        self
    }

    /// Providers currently registered.
    pub fn registered(&self) -> Vec<ProviderId> {
        let mut ids: Vec<_> = self.providers.keys().copied().collect();
        ids.sort_by_key(|id| id.as_str());
        ids
    }

    /// Look up the adapter for a provider.
    ///
    /// A known provider without a registered adapter (missing credentials) is
    /// a configuration error; it never reaches an upstream call.
    pub fn resolve(&self, id: ProviderId) -> Result<Arc<dyn LlmProvider>> {
        self.providers
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::Config(format!("Provider '{}' is not configured", id)))
    }

    /// Parse a provider name and look up its adapter.
    ///
    /// Unknown names fail with the invalid-provider error before any adapter
    /// is consulted.
    pub fn resolve_name(&self, name: &str) -> Result<Arc<dyn LlmProvider>> {
        self.resolve(ProviderId::from_str(name)?)
    }

    /// Dispatch a chat completion to the adapter named by the request.
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        debug!(provider = %request.provider, "Dispatching chat completion");
        self.resolve(request.provider)?.complete(request).await
    }

    /// Dispatch an embedding request to the adapter named by the request.
    pub async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        debug!(provider = %request.provider, "Dispatching embeddings");
        self.resolve(request.provider)?.embed(request).await
    }

    /// Dispatch an image generation to the adapter named by the request.
    pub async fn generate_images(&self, request: ImageRequest) -> Result<ImageResponse> {
        debug!(provider = %request.provider, "Dispatching image generation");
        self.resolve(request.provider)?
            .generate_images(request)
            .await
    }
}
