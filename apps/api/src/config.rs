use anyhow::{Context, Result};

/// Configuration for the keyword store service.
/// Loaded from environment variables; fails at startup if required ones are missing.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(StoreConfig {
            database_url: require_env("DATABASE_URL")?,
            port: port_from_env("STORE_PORT", 8002)?,
            rust_log: rust_log_from_env(),
        })
    }
}

/// Configuration for the save proxy service.
#[derive(Debug, Clone)]
pub struct SaveConfig {
    pub store_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl SaveConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(SaveConfig {
            store_base_url: require_env("STORE_BASE_URL")?,
            port: port_from_env("SAVE_PORT", 8001)?,
            rust_log: rust_log_from_env(),
        })
    }
}

/// Configuration for the narrative generator service.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub store_base_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl GenerateConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(GenerateConfig {
            store_base_url: require_env("STORE_BASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_model: require_env("OPENAI_MODEL")?,
            port: port_from_env("GENERATE_PORT", 8003)?,
            rust_log: rust_log_from_env(),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn port_from_env(key: &str, default: u16) -> Result<u16> {
    match std::env::var(key) {
        Ok(v) => v
            .parse::<u16>()
            .with_context(|| format!("{key} must be a valid port number")),
        Err(_) => Ok(default),
    }
}

fn rust_log_from_env() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}
