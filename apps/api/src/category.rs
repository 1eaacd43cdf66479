//! Narrative categories — the closed set of observation contexts.
//!
//! A category selects the prompt templates used by the generator and the
//! list of fields surfaced as metadata in its response. The set is fixed;
//! anything outside it is rejected before any network call is made.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SubjectPerformance,
    BehavioralSummary,
    CreativeActivity,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::SubjectPerformance,
        Category::BehavioralSummary,
        Category::CreativeActivity,
    ];

    /// Parses the wire form ("subject-performance" etc.), failing with
    /// `UnknownCategory` for anything outside the closed set.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "subject-performance" => Ok(Category::SubjectPerformance),
            "behavioral-summary" => Ok(Category::BehavioralSummary),
            "creative-activity" => Ok(Category::CreativeActivity),
            other => Err(AppError::UnknownCategory(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SubjectPerformance => "subject-performance",
            Category::BehavioralSummary => "behavioral-summary",
            Category::CreativeActivity => "creative-activity",
        }
    }

    /// The ordered list of fields a narrative for this category is expected
    /// to cover. Used only as response metadata — synthesis runs over every
    /// field actually present in the stored data, expected or not.
    pub fn expected_fields(&self) -> &'static [&'static str] {
        match self {
            Category::SubjectPerformance => {
                &["participation", "assignments", "presentation", "inquiry"]
            }
            Category::BehavioralSummary => {
                &["responsibility", "collaboration", "self-management", "empathy"]
            }
            Category::CreativeActivity => {
                &["planning", "collaboration", "problem-solving", "leadership"]
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
