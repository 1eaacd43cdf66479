//! Wire types shared by the three services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

/// Body of the store's `POST /insert`. The save proxy builds one of these from
/// a `SaveInput` plus a stamped timestamp and forwards it downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInput {
    pub name: String,
    pub grade: String,
    pub subject: String,
    pub field: String,
    pub keyword: String,
    pub category: String,
    /// Calendar date of the observation, "YYYY-MM-DD".
    pub date: String,
    /// Write-time instant. Defaults to the store's clock when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
}

impl RecordInput {
    /// All string fields must be non-empty; only `ts` is optional.
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.grade, "grade")?;
        require_non_empty(&self.subject, "subject")?;
        require_non_empty(&self.field, "field")?;
        require_non_empty(&self.keyword, "keyword")?;
        require_non_empty(&self.category, "category")?;
        require_non_empty(&self.date, "date")?;
        Ok(())
    }
}

/// Body of the store's `POST /keywords`. `grade`, `fields` and `month` are
/// optional filters applied as an AND-conjunction when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordQuery {
    pub name: String,
    pub subject: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    /// "YYYY-MM" — matched against the first 7 characters of `date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl KeywordQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.subject, "subject")?;
        require_non_empty(&self.category, "category")?;
        Ok(())
    }
}

/// One row of the store's `POST /keywords` response, in storage order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeywordRow {
    pub field: String,
    pub keyword: String,
    pub date: String,
    pub ts: DateTime<Utc>,
}

/// Acknowledgement returned by the store's `POST /insert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertAck {
    pub status: String,
}

/// Body of the save proxy's `POST /save` — a record submission without a
/// timestamp. `date` defaults to the proxy's current calendar date.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveInput {
    pub name: String,
    pub grade: String,
    pub subject: String,
    pub field: String,
    pub keyword: String,
    pub category: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl SaveInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.grade, "grade")?;
        require_non_empty(&self.subject, "subject")?;
        require_non_empty(&self.field, "field")?;
        require_non_empty(&self.keyword, "keyword")?;
        require_non_empty(&self.category, "category")?;
        Ok(())
    }
}

pub fn require_non_empty(value: &str, name: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{name} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RecordInput {
        RecordInput {
            name: "Kim".into(),
            grade: "2".into(),
            subject: "Math".into(),
            field: "participation".into(),
            keyword: "asks questions".into(),
            category: "subject-performance".into(),
            date: "2024-03-10".into(),
            ts: None,
        }
    }

    #[test]
    fn test_record_input_validates_when_complete() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn test_record_input_rejects_empty_keyword() {
        let mut r = sample_record();
        r.keyword = "  ".into();
        let err = r.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(m) if m.contains("keyword")));
    }

    #[test]
    fn test_keyword_query_requires_name_subject_category_only() {
        let q = KeywordQuery {
            name: "Kim".into(),
            subject: "Math".into(),
            category: "subject-performance".into(),
            grade: None,
            fields: None,
            month: None,
        };
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_save_input_date_is_optional_on_the_wire() {
        let input: SaveInput = serde_json::from_str(
            r#"{"name":"Kim","grade":"2","subject":"Math","field":"participation",
                "keyword":"asks questions","category":"subject-performance"}"#,
        )
        .unwrap();
        assert!(input.date.is_none());
        assert!(input.validate().is_ok());
    }
}
