use sqlx::{Connection, Executor, PgConnection};
use tracing::info;

use crate::errors::AppError;

/// Handle to the keyword store's PostgreSQL database.
///
/// Connections are deliberately NOT pooled: every request opens one connection
/// and drops it on every exit path, success or error. The handle itself only
/// carries the connection string.
#[derive(Debug, Clone)]
pub struct Storage {
    database_url: String,
}

impl Storage {
    pub fn new(database_url: String) -> Self {
        Self { database_url }
    }

    /// Opens a fresh connection for one request's worth of statements.
    /// Callers map the error into the read or write side of the taxonomy.
    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        PgConnection::connect(&self.database_url).await
    }
}

/// Bootstrap DDL for the four tables. Idempotent; run once at store startup.
///
/// The UNIQUE constraints are what make insert-if-absent race-free: concurrent
/// writers hitting the same identity key resolve via ON CONFLICT DO NOTHING,
/// never via a check-then-insert window.
const SCHEMA_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS student (
    student_id BIGSERIAL PRIMARY KEY,
    name       TEXT NOT NULL,
    grade      TEXT NOT NULL,
    UNIQUE (name, grade)
);

CREATE TABLE IF NOT EXISTS subject (
    subject_id BIGSERIAL PRIMARY KEY,
    name       TEXT NOT NULL,
    category   TEXT NOT NULL,
    UNIQUE (name, category)
);

CREATE TABLE IF NOT EXISTS field (
    field_id BIGSERIAL PRIMARY KEY,
    name     TEXT NOT NULL,
    category TEXT NOT NULL,
    UNIQUE (name, category)
);

CREATE TABLE IF NOT EXISTS record (
    record_id  BIGSERIAL PRIMARY KEY,
    student_id BIGINT NOT NULL REFERENCES student (student_id),
    subject_id BIGINT NOT NULL REFERENCES subject (subject_id),
    field_id   BIGINT NOT NULL REFERENCES field (field_id),
    keyword    TEXT NOT NULL,
    date       TEXT NOT NULL,
    ts         TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

/// Creates the store's tables if they do not exist yet.
pub async fn ensure_schema(storage: &Storage) -> Result<(), AppError> {
    let mut conn = storage.connect().await.map_err(AppError::StorageWrite)?;
    conn.execute(SCHEMA_DDL)
        .await
        .map_err(AppError::StorageWrite)?;
    info!("Store schema ensured");
    Ok(())
}
