use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Numeric severity class attached to every error response.
/// 1 = caller sent bad input, 2 = an upstream dependency failed, 3 = internal fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    ClientInput = 1,
    UpstreamDependency = 2,
    Internal = 3,
}

/// Application-level error type shared by all three services.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Nothing in this taxonomy is retried automatically; every variant surfaces
/// to the caller on the first failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("No stored records match the given criteria")]
    NoDataForCriteria,

    #[error("Storage write failed: {0}")]
    StorageWrite(#[source] sqlx::Error),

    #[error("Storage read failed: {0}")]
    StorageRead(#[source] sqlx::Error),

    #[error("Upstream write failed: {0}")]
    UpstreamWrite(String),

    #[error("Upstream read failed: {0}")]
    UpstreamRead(String),

    #[error("Completion failed: {0}")]
    CompletionFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn severity(&self) -> Severity {
        match self {
            AppError::InvalidInput(_)
            | AppError::UnknownCategory(_)
            | AppError::NoDataForCriteria => Severity::ClientInput,
            AppError::UpstreamWrite(_)
            | AppError::UpstreamRead(_)
            | AppError::CompletionFailed(_) => Severity::UpstreamDependency,
            AppError::StorageWrite(_) | AppError::StorageRead(_) | AppError::Internal(_) => {
                Severity::Internal
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            AppError::NoDataForCriteria => "NO_DATA_FOR_CRITERIA",
            AppError::StorageWrite(_) => "STORAGE_WRITE_FAILED",
            AppError::StorageRead(_) => "STORAGE_READ_FAILED",
            AppError::UpstreamWrite(_) => "UPSTREAM_WRITE_FAILED",
            AppError::UpstreamRead(_) => "UPSTREAM_READ_FAILED",
            AppError::CompletionFailed(_) => "COMPLETION_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            AppError::NoDataForCriteria => StatusCode::NOT_FOUND,
            AppError::StorageWrite(_) | AppError::StorageRead(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UpstreamWrite(_)
            | AppError::UpstreamRead(_)
            | AppError::CompletionFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.severity() != Severity::ClientInput {
            tracing::error!("{}: {self}", self.code());
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "severity": self.severity() as u8,
            }
        }));

        (self.status(), body).into_response()
    }
}
