//! Axum route handlers for the narrative generator.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::category::Category;
use crate::errors::AppError;
use crate::generation::generator::{generate_two_stage, GeneratedNarrative};
use crate::generation::prompts::PromptContext;
use crate::models::{require_non_empty, KeywordQuery};
use crate::state::GenerateState;

#[derive(Debug, Deserialize)]
pub struct GenerateInput {
    pub name: String,
    pub grade: String,
    pub subject: String,
    pub category: String,
}

impl GenerateInput {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.grade, "grade")?;
        require_non_empty(&self.subject, "subject")?;
        require_non_empty(&self.category, "category")?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub source_record_count: usize,
    pub expected_fields: Vec<&'static str>,
    pub generated: GeneratedBody,
}

/// Wire shape of the two narrative layers. `per_field` is an object whose keys
/// keep the grouping order (first occurrence in the stored data).
#[derive(Debug, Serialize)]
pub struct GeneratedBody {
    pub per_field: Map<String, Value>,
    #[serde(rename = "final")]
    pub final_text: String,
}

impl From<GeneratedNarrative> for GeneratedBody {
    fn from(narrative: GeneratedNarrative) -> Self {
        let mut per_field = Map::new();
        for p in narrative.per_field {
            per_field.insert(p.field, Value::String(p.paragraph));
        }
        GeneratedBody {
            per_field,
            final_text: narrative.final_text,
        }
    }
}

/// GET /health
pub async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "generate-service"
    }))
}

/// POST /generate
///
/// Fetches the full keyword history for (name, grade, subject, category),
/// runs the two-stage flow, and returns both layers plus metadata. The
/// category is checked before any network call; zero stored rows is a
/// `no-data-for-criteria` failure, never an empty success.
pub async fn handle_generate(
    State(state): State<GenerateState>,
    Json(input): Json<GenerateInput>,
) -> Result<Json<GenerateResponse>, AppError> {
    input.validate()?;
    let category = Category::parse(&input.category)?;

    // Full history: no field or month filter.
    let query = KeywordQuery {
        name: input.name.clone(),
        subject: input.subject.clone(),
        category: input.category.clone(),
        grade: Some(input.grade.clone()),
        fields: None,
        month: None,
    };
    let rows = state.store.keywords(&query).await?;

    if rows.is_empty() {
        return Err(AppError::NoDataForCriteria);
    }

    info!(
        "Generating {} narrative for {}/{} {} from {} record(s)",
        category,
        input.name,
        input.grade,
        input.subject,
        rows.len()
    );

    let ctx = PromptContext {
        name: &input.name,
        grade: &input.grade,
        subject: &input.subject,
        date: None,
    };
    let narrative =
        generate_two_stage(state.completion.as_ref(), category, &ctx, &rows).await?;

    Ok(Json(GenerateResponse {
        status: "success".to_string(),
        timestamp: Utc::now(),
        source_record_count: rows.len(),
        expected_fields: category.expected_fields().to_vec(),
        generated: narrative.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generator::FieldParagraph;

    #[test]
    fn test_generated_body_keeps_grouping_order() {
        let narrative = GeneratedNarrative {
            per_field: vec![
                FieldParagraph {
                    field: "participation".into(),
                    paragraph: "One.".into(),
                },
                FieldParagraph {
                    field: "initiative".into(),
                    paragraph: "Two.".into(),
                },
            ],
            final_text: "Merged.".into(),
        };
        let body: GeneratedBody = narrative.into();
        let keys: Vec<&String> = body.per_field.keys().collect();
        assert_eq!(keys, vec!["participation", "initiative"]);
        assert_eq!(body.final_text, "Merged.");
    }

    #[test]
    fn test_unknown_category_rejected_before_any_network_call() {
        let input = GenerateInput {
            name: "Kim".into(),
            grade: "2".into(),
            subject: "Math".into(),
            category: "report-card".into(),
        };
        input.validate().unwrap();
        let err = Category::parse(&input.category).unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory(_)));
    }
}
