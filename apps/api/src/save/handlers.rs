//! Axum route handlers for the save proxy.

use axum::{extract::State, Json};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::category::Category;
use crate::errors::AppError;
use crate::models::{InsertAck, RecordInput, SaveInput};
use crate::save::normalize::normalize_field;
use crate::state::SaveState;

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub status: String,
    pub store: InsertAck,
    pub timestamp: DateTime<Utc>,
}

/// GET /health
pub async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "save-service"
    }))
}

/// POST /save
///
/// Stamps the write-time instant, defaults `date` to today, and forwards the
/// submission to the store's /insert. At most one delivery attempt: a
/// downstream failure comes back as `upstream-write-failed`, never a retry.
pub async fn handle_save(
    State(state): State<SaveState>,
    Json(input): Json<SaveInput>,
) -> Result<Json<SaveResponse>, AppError> {
    input.validate()?;

    // Known categories get their field name canonicalized; anything else
    // passes through untouched — the proxy does not reject categories.
    let field = match Category::parse(&input.category) {
        Ok(category) => normalize_field(category, &input.field),
        Err(_) => input.field.trim().to_string(),
    };

    let timestamp = Utc::now();
    let record = RecordInput {
        name: input.name,
        grade: input.grade,
        subject: input.subject,
        field,
        keyword: input.keyword,
        category: input.category,
        date: input.date.unwrap_or_else(today),
        ts: Some(timestamp),
    };

    let ack = state.store.insert(&record).await?;

    info!(
        "Saved record for {}/{} {} [{}]",
        record.name, record.grade, record.subject, record.field
    );

    Ok(Json(SaveResponse {
        status: "success".to_string(),
        store: ack,
        timestamp,
    }))
}

/// Current calendar date in the proxy's local zone, "YYYY-MM-DD".
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_is_date_granularity() {
        let d = today();
        assert_eq!(d.len(), 10);
        assert_eq!(&d[4..5], "-");
        assert_eq!(&d[7..8], "-");
    }

    #[test]
    fn test_timestamp_and_date_differ_in_granularity() {
        // The stamped instant carries time-of-day; the defaulted date does not.
        let ts = Utc::now().to_rfc3339();
        let d = today();
        assert!(ts.len() > d.len());
        assert!(ts.contains('T'));
        assert!(!d.contains('T'));
    }
}
