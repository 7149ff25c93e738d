use claims_qa_service::{api, Args, CompletionProvider, DocumentStore, OpenAIProvider};
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let service_config = args.service_config()?;

    let provider = OpenAIProvider::new(args.provider_config());
    tracing::info!(model = %provider.get_model_info(), "model provider configured");

    let store = Arc::new(DocumentStore::new());
    let state = api::AppState::new(Arc::new(provider), store);
    let app = api::create_api(state, &service_config);

    let listener = TcpListener::bind(service_config.addr).await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", service_config.addr, e))?;

    tracing::info!(addr = %service_config.addr, "claims service ready to accept connections");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
