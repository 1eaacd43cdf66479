//! Shared library for the observation-log pipeline's three services:
//! keyword store, save proxy, and narrative generator.

pub mod category;
pub mod config;
pub mod db;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod save;
pub mod state;
pub mod store;
pub mod store_client;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes structured logging for a service binary.
pub fn init_tracing(rust_log: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("obslog_api={rust_log}"))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
