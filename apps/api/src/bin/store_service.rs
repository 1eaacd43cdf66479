use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use obslog_api::config::StoreConfig;
use obslog_api::db::{ensure_schema, Storage};
use obslog_api::state::StoreState;
use obslog_api::store;

#[tokio::main]
async fn main() -> Result<()> {
    let config = StoreConfig::from_env()?;
    obslog_api::init_tracing(&config.rust_log);

    info!("Starting store-service v{}", env!("CARGO_PKG_VERSION"));

    let storage = Storage::new(config.database_url.clone());
    ensure_schema(&storage)
        .await
        .map_err(|e| anyhow::anyhow!("schema bootstrap failed: {e}"))?;

    let state = StoreState { storage };

    let app = store::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
