//! Prompt templates for the two-stage narrative flow.
//!
//! Templates are keyed by (category, stage). The system prompt is selected by
//! category alone; user templates carry named placeholders filled by plain
//! string replacement before the call.

use crate::category::Category;

/// Which pass of the flow a user template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Per-field paragraph synthesis.
    Field,
    /// Merge of all field paragraphs into one narrative.
    Final,
}

const SUBJECT_PERFORMANCE_SYSTEM: &str =
    "You are an experienced teacher writing subject-performance entries for a \
    student observation record. Write in formal third person, in complete \
    sentences, grounded only in the observed keywords you are given. \
    Do not invent events or achievements that the keywords do not support.";

const BEHAVIORAL_SUMMARY_SYSTEM: &str =
    "You are an experienced homeroom teacher writing a behavioral summary for \
    a student observation record. Describe character and conduct in formal \
    third person, grounded only in the observed keywords you are given. \
    Do not invent behavior the keywords do not support.";

const CREATIVE_ACTIVITY_SYSTEM: &str =
    "You are an experienced teacher writing creative-activity entries for a \
    student observation record. Describe the student's role and contribution \
    in formal third person, grounded only in the observed keywords you are \
    given. Do not invent activities the keywords do not support.";

const SUBJECT_PERFORMANCE_FIELD_TEMPLATE: &str = r#"Write one paragraph for a subject-performance record.

Student: {name} (grade {grade})
Subject: {subject}
Period: {date_str}
Field observed: {field}

Observed keywords:
{kw_bullets}

Synthesize these observations into a single cohesive paragraph about the
student's {field} in {subject}. Stay strictly within the keywords."#;

const BEHAVIORAL_SUMMARY_FIELD_TEMPLATE: &str = r#"Write one paragraph for a behavioral summary.

Student: {name} (grade {grade})
Context: {subject}
Period: {date_str}
Trait observed: {field}

Observed keywords:
{kw_bullets}

Synthesize these observations into a single cohesive paragraph about the
student's {field}. Stay strictly within the keywords."#;

const CREATIVE_ACTIVITY_FIELD_TEMPLATE: &str = r#"Write one paragraph for a creative-activity record.

Student: {name} (grade {grade})
Activity: {subject}
Period: {date_str}
Aspect observed: {field}

Observed keywords:
{kw_bullets}

Synthesize these observations into a single cohesive paragraph about the
student's {field} in this activity. Stay strictly within the keywords."#;

const SUBJECT_PERFORMANCE_FINAL_TEMPLATE: &str = r#"Merge the field paragraphs below into one subject-performance narrative.

Student: {name} (grade {grade})
Subject: {subject}
Period: {date_str}

Field paragraphs:
{parts}

Write a single flowing narrative that integrates every paragraph without
repeating sentences verbatim and without adding new facts."#;

const BEHAVIORAL_SUMMARY_FINAL_TEMPLATE: &str = r#"Merge the trait paragraphs below into one behavioral summary.

Student: {name} (grade {grade})
Context: {subject}
Period: {date_str}

Trait paragraphs:
{parts}

Write a single flowing summary that integrates every paragraph without
repeating sentences verbatim and without adding new facts."#;

const CREATIVE_ACTIVITY_FINAL_TEMPLATE: &str = r#"Merge the aspect paragraphs below into one creative-activity narrative.

Student: {name} (grade {grade})
Activity: {subject}
Period: {date_str}

Aspect paragraphs:
{parts}

Write a single flowing narrative that integrates every paragraph without
repeating sentences verbatim and without adding new facts."#;

pub fn system_prompt(category: Category) -> &'static str {
    match category {
        Category::SubjectPerformance => SUBJECT_PERFORMANCE_SYSTEM,
        Category::BehavioralSummary => BEHAVIORAL_SUMMARY_SYSTEM,
        Category::CreativeActivity => CREATIVE_ACTIVITY_SYSTEM,
    }
}

pub fn user_template(category: Category, stage: Stage) -> &'static str {
    match (category, stage) {
        (Category::SubjectPerformance, Stage::Field) => SUBJECT_PERFORMANCE_FIELD_TEMPLATE,
        (Category::BehavioralSummary, Stage::Field) => BEHAVIORAL_SUMMARY_FIELD_TEMPLATE,
        (Category::CreativeActivity, Stage::Field) => CREATIVE_ACTIVITY_FIELD_TEMPLATE,
        (Category::SubjectPerformance, Stage::Final) => SUBJECT_PERFORMANCE_FINAL_TEMPLATE,
        (Category::BehavioralSummary, Stage::Final) => BEHAVIORAL_SUMMARY_FINAL_TEMPLATE,
        (Category::CreativeActivity, Stage::Final) => CREATIVE_ACTIVITY_FINAL_TEMPLATE,
    }
}

/// Identity of one student/subject pairing threaded through both stages.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub name: &'a str,
    pub grade: &'a str,
    pub subject: &'a str,
    /// Observation period; None means full history.
    pub date: Option<&'a str>,
}

impl PromptContext<'_> {
    fn date_str(&self) -> &str {
        self.date.unwrap_or("(unspecified)")
    }
}

/// Renders the stage-1 user prompt for one field group.
pub fn render_field_prompt(
    category: Category,
    ctx: &PromptContext<'_>,
    field: &str,
    keywords: &[String],
) -> String {
    let kw_bullets = if keywords.is_empty() {
        "(no keywords)".to_string()
    } else {
        keywords
            .iter()
            .map(|k| format!("- {k}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    user_template(category, Stage::Field)
        .replace("{name}", ctx.name)
        .replace("{grade}", ctx.grade)
        .replace("{subject}", ctx.subject)
        .replace("{date_str}", ctx.date_str())
        .replace("{field}", field)
        .replace("{kw_bullets}", &kw_bullets)
}

/// Renders the stage-2 user prompt over the labeled field paragraphs, in the
/// order given.
pub fn render_final_prompt(
    category: Category,
    ctx: &PromptContext<'_>,
    field_paragraphs: &[(String, String)],
) -> String {
    let parts = field_paragraphs
        .iter()
        .filter(|(_, para)| !para.trim().is_empty())
        .map(|(field, para)| format!("[{field}]\n{}", para.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");

    let parts = if parts.is_empty() {
        "(no stage-1 paragraphs)".to_string()
    } else {
        parts
    };

    user_template(category, Stage::Final)
        .replace("{name}", ctx.name)
        .replace("{grade}", ctx.grade)
        .replace("{subject}", ctx.subject)
        .replace("{date_str}", ctx.date_str())
        .replace("{parts}", &parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PromptContext<'static> {
        PromptContext {
            name: "Kim",
            grade: "2",
            subject: "Math",
            date: None,
        }
    }

    #[test]
    fn test_field_prompt_fills_every_placeholder() {
        let prompt = render_field_prompt(
            Category::SubjectPerformance,
            &ctx(),
            "participation",
            &["asks questions".to_string(), "volunteers answers".to_string()],
        );
        assert!(!prompt.contains('{'), "unfilled placeholder: {prompt}");
        assert!(prompt.contains("Kim"));
        assert!(prompt.contains("- asks questions\n- volunteers answers"));
        assert!(prompt.contains("(unspecified)"));
    }

    #[test]
    fn test_final_prompt_labels_paragraphs_in_order() {
        let prompt = render_final_prompt(
            Category::SubjectPerformance,
            &ctx(),
            &[
                ("participation".to_string(), "Paragraph one.".to_string()),
                ("initiative".to_string(), "Paragraph two.".to_string()),
            ],
        );
        let first = prompt.find("[participation]").unwrap();
        let second = prompt.find("[initiative]").unwrap();
        assert!(first < second);
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_final_prompt_drops_blank_paragraphs() {
        let prompt = render_final_prompt(
            Category::BehavioralSummary,
            &ctx(),
            &[
                ("responsibility".to_string(), "  ".to_string()),
                ("empathy".to_string(), "Cares for peers.".to_string()),
            ],
        );
        assert!(!prompt.contains("[responsibility]"));
        assert!(prompt.contains("[empathy]"));
    }

    #[test]
    fn test_every_category_has_both_templates() {
        for cat in Category::ALL {
            assert!(!user_template(cat, Stage::Field).is_empty());
            assert!(!user_template(cat, Stage::Final).is_empty());
            assert!(!system_prompt(cat).is_empty());
        }
    }
}
