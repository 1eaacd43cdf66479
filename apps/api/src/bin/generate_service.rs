use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use obslog_api::config::GenerateConfig;
use obslog_api::generation;
use obslog_api::llm_client::OpenAiClient;
use obslog_api::state::GenerateState;
use obslog_api::store_client::StoreClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = GenerateConfig::from_env()?;
    obslog_api::init_tracing(&config.rust_log);

    info!("Starting generate-service v{}", env!("CARGO_PKG_VERSION"));

    let store = StoreClient::new(config.store_base_url.clone())?;
    info!("Store client targeting {}", config.store_base_url);

    let completion = OpenAiClient::new(config.openai_api_key.clone(), config.openai_model.clone())?;
    info!("Completion client initialized (model: {})", completion.model());

    let state = GenerateState {
        store,
        completion: Arc::new(completion),
    };

    let app = generation::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
