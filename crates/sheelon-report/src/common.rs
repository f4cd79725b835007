//! Shared string resolution and section logic for the two renderers.
//!
//! Both renderers draw section headings, labels, and the dominant/top
//! selections from here, which is what keeps the Markdown and rich-text
//! outputs content-equivalent.

use sheelon_core::content::{Category, EffectivenessLabels, Quiz};
use sheelon_core::ranking::{is_development_area, Ranking, Scored};
use sheelon_core::scoring::CategoryScore;

/// Section headings and labels, resolved against content with Hebrew
/// fallbacks (content wins whenever a string is supplied).
pub(crate) struct Headings<'a> {
    pub title: &'a str,
    pub scores: &'a str,
    pub dominant: &'a str,
    pub secondary: &'a str,
    pub development: &'a str,
    pub details: &'a str,
    pub total: &'a str,
    pub interpretation: &'a str,
    pub sub_scores: &'a str,
    pub marker: &'a str,
    pub description_label: &'a str,
    pub out_of: &'a str,
    pub choices: &'a str,
    pub effectiveness: &'a str,
    pub traits: &'a str,
    pub reflection: &'a str,
}

impl<'a> Headings<'a> {
    pub fn resolve(quiz: &'a Quiz) -> Self {
        let export = &quiz.export;
        let reflection = quiz
            .analysis
            .as_ref()
            .and_then(|a| a.reflection_title.as_deref())
            .unwrap_or("שאלות למחשבה");
        Self {
            title: &export.title,
            scores: &export.scores_heading,
            dominant: export
                .dominant_heading
                .as_deref()
                .unwrap_or("הקטגוריות המובילות שלך"),
            secondary: export
                .secondary_heading
                .as_deref()
                .unwrap_or("סגנונות משניים"),
            development: export
                .development_heading
                .as_deref()
                .unwrap_or("תחומים לפיתוח"),
            details: export.details_heading.as_deref().unwrap_or("פירוט"),
            total: export.total_heading.as_deref().unwrap_or("הציון הכולל"),
            interpretation: export
                .interpretation_heading
                .as_deref()
                .unwrap_or("משמעות התוצאה"),
            sub_scores: export
                .sub_scores_heading
                .as_deref()
                .unwrap_or("פירוט לפי תת-קטגוריה"),
            marker: export.dominant_marker.as_deref().unwrap_or(" ⭐"),
            description_label: export.description_label.as_deref().unwrap_or("תיאור"),
            out_of: export.out_of_label.as_deref().unwrap_or("מתוך 100"),
            choices: export.choices_label.as_deref().unwrap_or("בחירות"),
            effectiveness: export
                .effectiveness_label
                .as_deref()
                .unwrap_or("יעילות"),
            traits: export
                .traits_label
                .as_deref()
                .unwrap_or("מאפיינים עיקריים:"),
            reflection,
        }
    }
}

/// Effectiveness band labels, content-supplied or the stock Hebrew set.
pub(crate) fn effectiveness_labels(quiz: &Quiz) -> EffectivenessLabels {
    quiz.results
        .effectiveness_labels
        .clone()
        .unwrap_or(EffectivenessLabels {
            effective: "יעיל".into(),
            adequate: "סביר".into(),
            ineffective: "לא יעיל".into(),
        })
}

/// Whether a unit is in the dominant set.
pub(crate) fn is_dominant<T: Scored>(ranking: &Ranking<T>, id: &str) -> bool {
    ranking.dominant.iter().any(|d| d.unit_id() == id)
}

/// Sorted categories whose sum falls in the bottom band, the
/// development-areas section, empty for quizzes without band ranges.
pub(crate) fn development_areas<'a>(
    categories: &'a [Category],
    sorted: &'a [CategoryScore],
) -> Vec<(&'a Category, &'a CategoryScore)> {
    sorted
        .iter()
        .filter_map(|score| {
            let category = categories.iter().find(|c| c.id == score.id)?;
            is_development_area(category, score.sum).then_some((category, score))
        })
        .collect()
}

/// Reflection questions, when the content carries any.
pub(crate) fn reflection_questions(quiz: &Quiz) -> &[String] {
    quiz.analysis
        .as_ref()
        .map(|a| a.reflection_questions.as_slice())
        .unwrap_or(&[])
}
