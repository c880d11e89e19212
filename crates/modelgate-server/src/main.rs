//! Modelgate server
//!
//! An OpenAI-shaped gateway in front of multiple LLM providers. Requests name
//! their provider; the gateway dispatches to the matching adapter and returns
//! one canonical response schema regardless of upstream.
//!
//! Usage:
//! ```bash
//! OPENAI_API_KEY=sk-... modelgate-server --port 8080
//! ```
//!
//! Test with:
//! ```bash
//! curl http://localhost:8080/v1/chat/completions \
//!   -H "Content-Type: application/json" \
//!   -d '{
//!     "provider": "openai",
//!     "model": "gpt-4o-mini",
//!     "messages": [{"role": "user", "content": "Hello!"}]
//!   }'
//! ```

mod config;
mod routes;

use clap::Parser;
use config::GatewayConfig;
use modelgate_core::provider::ProviderId;
use modelgate_egress::{
    anthropic::{AnthropicConfig, AnthropicConnector},
    openai::{OpenAiConfig, OpenAiConnector},
    sagemaker::{SageMakerConfig, SageMakerConnector},
};
use modelgate_routing::ProviderRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Modelgate - multi-provider LLM gateway
#[derive(Parser)]
#[command(name = "modelgate-server")]
#[command(about = "OpenAI-shaped gateway for multiple LLM providers", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "MODELGATE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "8080", env = "MODELGATE_PORT")]
    port: u16,
}

/// Build the provider registry from configuration.
async fn build_registry(config: &GatewayConfig) -> anyhow::Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    if let Some(openai) = &config.openai {
        let mut provider_config = OpenAiConfig::new(&openai.api_key).with_default_models(
            openai.chat_model.clone(),
            openai.embeddings_model.clone(),
            openai.image_model.clone(),
        );
        if let Some(base_url) = &openai.base_url {
            provider_config = provider_config.with_base_url(base_url);
        }
        registry.register(
            ProviderId::OpenAi,
            Arc::new(OpenAiConnector::new(provider_config)?),
        );
        info!("OpenAI provider enabled");
    }

    if let Some(anthropic) = &config.anthropic {
        let mut provider_config = AnthropicConfig::new(&anthropic.api_key);
        if let Some(base_url) = &anthropic.base_url {
            provider_config = provider_config.with_base_url(base_url);
        }
        if let Some(model) = &anthropic.chat_model {
            provider_config = provider_config.with_chat_model(model);
        }
        registry.register(
            ProviderId::Anthropic,
            Arc::new(AnthropicConnector::new(provider_config)?),
        );
        info!("Anthropic provider enabled");
    }

    let sagemaker_config = SageMakerConfig {
        region: config.sagemaker.region.clone(),
        chat_model: config.sagemaker.chat_model.clone(),
        embeddings_model: config.sagemaker.embeddings_model.clone(),
        image_model: config.sagemaker.image_model.clone(),
        bucket: config.sagemaker.bucket.clone(),
        image_url_ttl_secs: config.sagemaker.image_url_ttl_secs,
    };
    registry.register(
        ProviderId::SageMaker,
        Arc::new(SageMakerConnector::new(sagemaker_config).await?),
    );
    info!(region = %config.sagemaker.region, "SageMaker provider enabled");

    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Initializing Modelgate gateway");

    let config = GatewayConfig::from_env();
    if config.openai.is_none() {
        warn!("OPENAI_API_KEY not set - openai requests will fail");
    }
    if config.anthropic.is_none() {
        warn!("ANTHROPIC_API_KEY not set - anthropic requests will fail");
    }

    let registry = Arc::new(build_registry(&config).await?);
    let app = routes::router(registry);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Modelgate gateway listening on http://{}", addr);
    info!("  - POST http://{}/v1/chat/completions", addr);
    info!("  - POST http://{}/v1/embeddings", addr);
    info!("  - POST http://{}/v1/images/generations", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
