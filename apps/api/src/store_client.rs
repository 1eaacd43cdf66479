//! Typed HTTP client for the keyword store, used by the save proxy and the
//! narrative generator.

use reqwest::Client;

use crate::errors::AppError;
use crate::models::{InsertAck, KeywordQuery, KeywordRow, RecordInput};

/// Fixed timeout for store calls. Failures are surfaced, never retried.
const STORE_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(STORE_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST /insert — forwards one observation record downstream.
    pub async fn insert(&self, record: &RecordInput) -> Result<InsertAck, AppError> {
        let response = self
            .client
            .post(format!("{}/insert", self.base_url))
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::UpstreamWrite(format!("store unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamWrite(format!(
                "store /insert returned {status}: {body}"
            )));
        }

        response
            .json::<InsertAck>()
            .await
            .map_err(|e| AppError::UpstreamWrite(format!("store /insert bad response: {e}")))
    }

    /// POST /keywords — fetches matching rows in the store's order.
    pub async fn keywords(&self, query: &KeywordQuery) -> Result<Vec<KeywordRow>, AppError> {
        let response = self
            .client
            .post(format!("{}/keywords", self.base_url))
            .json(query)
            .send()
            .await
            .map_err(|e| AppError::UpstreamRead(format!("store unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamRead(format!(
                "store /keywords returned {status}: {body}"
            )));
        }

        response
            .json::<Vec<KeywordRow>>()
            .await
            .map_err(|e| AppError::UpstreamRead(format!("store /keywords bad response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = StoreClient::new("http://localhost:8002/".into()).unwrap();
        assert_eq!(client.base_url, "http://localhost:8002");
    }
}
