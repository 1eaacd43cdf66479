//! Field-name normalization for submissions.
//!
//! Submitted field names are matched against the category's canonical list,
//! tolerating case and spacing differences ("Self Management" becomes
//! "self-management"). Names outside the canonical list pass through
//! unchanged — the store accepts any field.

use crate::category::Category;

pub fn normalize_field(category: Category, field: &str) -> String {
    let trimmed = field.trim();
    let folded = fold(trimmed);

    for canonical in category.expected_fields() {
        if fold(canonical) == folded {
            return (*canonical).to_string();
        }
    }

    trimmed.to_string()
}

/// Lowercases and drops spaces and hyphens so spelling variants compare equal.
fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| *c != ' ' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_canonical_name_passes_through() {
        assert_eq!(
            normalize_field(Category::SubjectPerformance, "participation"),
            "participation"
        );
    }

    #[test]
    fn test_spacing_and_case_variants_canonicalize() {
        assert_eq!(
            normalize_field(Category::BehavioralSummary, "Self Management"),
            "self-management"
        );
        assert_eq!(
            normalize_field(Category::CreativeActivity, "Problem Solving"),
            "problem-solving"
        );
    }

    #[test]
    fn test_unknown_field_passes_through_trimmed() {
        assert_eq!(
            normalize_field(Category::SubjectPerformance, "  initiative "),
            "initiative"
        );
    }
}
