//! SQL for the keyword store's two operations.
//!
//! Identity rows (student / subject / field) are created with
//! `ON CONFLICT DO NOTHING` against their unique keys, so concurrent writers
//! racing on the same key can never produce duplicates. The statements run on
//! one connection with no explicit transaction: if the final record insert
//! fails, identity rows created before it persist. That inconsistency window
//! is accepted behavior, not a bug to roll back.

use chrono::Utc;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::models::{KeywordQuery, KeywordRow, RecordInput};

/// Ensures the three identity rows exist, resolves their surrogate ids, and
/// appends one observation record linking them.
pub async fn insert_observation(
    conn: &mut PgConnection,
    record: &RecordInput,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO student (name, grade) VALUES ($1, $2) ON CONFLICT (name, grade) DO NOTHING")
        .bind(&record.name)
        .bind(&record.grade)
        .execute(&mut *conn)
        .await
        .map_err(AppError::StorageWrite)?;

    sqlx::query("INSERT INTO subject (name, category) VALUES ($1, $2) ON CONFLICT (name, category) DO NOTHING")
        .bind(&record.subject)
        .bind(&record.category)
        .execute(&mut *conn)
        .await
        .map_err(AppError::StorageWrite)?;

    sqlx::query("INSERT INTO field (name, category) VALUES ($1, $2) ON CONFLICT (name, category) DO NOTHING")
        .bind(&record.field)
        .bind(&record.category)
        .execute(&mut *conn)
        .await
        .map_err(AppError::StorageWrite)?;

    let student_id: i64 =
        sqlx::query_scalar("SELECT student_id FROM student WHERE name = $1 AND grade = $2")
            .bind(&record.name)
            .bind(&record.grade)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::StorageWrite)?;

    let subject_id: i64 =
        sqlx::query_scalar("SELECT subject_id FROM subject WHERE name = $1 AND category = $2")
            .bind(&record.subject)
            .bind(&record.category)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::StorageWrite)?;

    let field_id: i64 =
        sqlx::query_scalar("SELECT field_id FROM field WHERE name = $1 AND category = $2")
            .bind(&record.field)
            .bind(&record.category)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::StorageWrite)?;

    let ts = record.ts.unwrap_or_else(Utc::now);

    sqlx::query(
        "INSERT INTO record (student_id, subject_id, field_id, keyword, date, ts) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(student_id)
    .bind(subject_id)
    .bind(field_id)
    .bind(&record.keyword)
    .bind(&record.date)
    .bind(ts)
    .execute(&mut *conn)
    .await
    .map_err(AppError::StorageWrite)?;

    Ok(())
}

/// Fetches matching observation rows in insertion order. Zero rows is a valid
/// result, not an error.
pub async fn query_records(
    conn: &mut PgConnection,
    query: &KeywordQuery,
) -> Result<Vec<KeywordRow>, AppError> {
    let mut qb = keyword_query_builder(query);

    qb.build_query_as::<KeywordRow>()
        .fetch_all(conn)
        .await
        .map_err(AppError::StorageRead)
}

/// Builds the SELECT with the optional filters appended as an AND-conjunction.
/// An empty `fields` set means no field filter, matching the original contract
/// where an absent set and an empty set behave alike.
fn keyword_query_builder(query: &KeywordQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT f.name AS field, r.keyword, r.date, r.ts \
         FROM record r \
         JOIN student s ON r.student_id = s.student_id \
         JOIN subject subj ON r.subject_id = subj.subject_id \
         JOIN field f ON r.field_id = f.field_id \
         WHERE s.name = ",
    );
    qb.push_bind(query.name.clone());
    qb.push(" AND subj.name = ");
    qb.push_bind(query.subject.clone());
    qb.push(" AND subj.category = ");
    qb.push_bind(query.category.clone());

    if let Some(grade) = &query.grade {
        qb.push(" AND s.grade = ");
        qb.push_bind(grade.clone());
    }

    if let Some(fields) = &query.fields {
        if !fields.is_empty() {
            qb.push(" AND f.name = ANY(");
            qb.push_bind(fields.clone());
            qb.push(")");
        }
    }

    if let Some(month) = &query.month {
        qb.push(" AND r.date LIKE ");
        qb.push_bind(month_pattern(month));
    }

    // Pin the "storage-defined" order to insertion order so it is deterministic.
    qb.push(" ORDER BY r.record_id");
    qb
}

/// "2024-03" → "2024-03%", matching the first 7 characters of `date` exactly.
fn month_pattern(month: &str) -> String {
    let prefix: String = month.chars().take(7).collect();
    format!("{prefix}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_query() -> KeywordQuery {
        KeywordQuery {
            name: "Kim".into(),
            subject: "Math".into(),
            category: "subject-performance".into(),
            grade: None,
            fields: None,
            month: None,
        }
    }

    #[test]
    fn test_month_pattern_is_seven_char_prefix() {
        assert_eq!(month_pattern("2024-03"), "2024-03%");
        // Longer inputs are truncated to month precision.
        assert_eq!(month_pattern("2024-03-15"), "2024-03%");
    }

    #[test]
    fn test_unfiltered_query_has_no_optional_clauses() {
        let qb = keyword_query_builder(&base_query());
        let sql = qb.sql();
        assert!(sql.contains("WHERE s.name = "));
        assert!(!sql.contains("s.grade"));
        assert!(!sql.contains("ANY("));
        assert!(!sql.contains("LIKE"));
        assert!(sql.ends_with("ORDER BY r.record_id"));
    }

    #[test]
    fn test_all_filters_appear_as_conjunction() {
        let mut q = base_query();
        q.grade = Some("2".into());
        q.fields = Some(vec!["participation".into(), "inquiry".into()]);
        q.month = Some("2024-03".into());
        let qb = keyword_query_builder(&q);
        let sql = qb.sql();
        assert!(sql.contains(" AND s.grade = "));
        assert!(sql.contains(" AND f.name = ANY("));
        assert!(sql.contains(" AND r.date LIKE "));
    }

    #[test]
    fn test_empty_field_set_means_no_field_filter() {
        let mut q = base_query();
        q.fields = Some(vec![]);
        let qb = keyword_query_builder(&q);
        assert!(!qb.sql().contains("ANY("));
    }
}
