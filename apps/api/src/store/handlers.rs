//! Axum route handlers for the keyword store.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::{InsertAck, KeywordQuery, KeywordRow, RecordInput};
use crate::state::StoreState;
use crate::store::queries;

/// GET /health
pub async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "store-service"
    }))
}

/// POST /insert
///
/// Upserts the identity rows and appends one observation record.
/// The connection lives for exactly this request.
pub async fn handle_insert(
    State(state): State<StoreState>,
    Json(record): Json<RecordInput>,
) -> Result<Json<InsertAck>, AppError> {
    record.validate()?;

    let mut conn = state.storage.connect().await.map_err(AppError::StorageWrite)?;
    queries::insert_observation(&mut conn, &record).await?;

    info!(
        "Inserted record: {}/{} {} [{}]",
        record.name, record.grade, record.subject, record.field
    );

    Ok(Json(InsertAck {
        status: "ok".to_string(),
    }))
}

/// POST /keywords
///
/// Returns matching {field, keyword, date, ts} rows. An empty result is a
/// valid response, not an error.
pub async fn handle_keywords(
    State(state): State<StoreState>,
    Json(query): Json<KeywordQuery>,
) -> Result<Json<Vec<KeywordRow>>, AppError> {
    query.validate()?;

    let mut conn = state.storage.connect().await.map_err(AppError::StorageRead)?;
    let rows = queries::query_records(&mut conn, &query).await?;

    Ok(Json(rows))
}
