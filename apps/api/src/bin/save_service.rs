use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use obslog_api::config::SaveConfig;
use obslog_api::save;
use obslog_api::state::SaveState;
use obslog_api::store_client::StoreClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = SaveConfig::from_env()?;
    obslog_api::init_tracing(&config.rust_log);

    info!("Starting save-service v{}", env!("CARGO_PKG_VERSION"));

    let store = StoreClient::new(config.store_base_url.clone())?;
    info!("Store client targeting {}", config.store_base_url);

    let state = SaveState { store };

    let app = save::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
