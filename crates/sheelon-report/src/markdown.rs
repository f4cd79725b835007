//! Markdown report renderer.
//!
//! Produces the plain-text shareable summary. Section order is fixed:
//! title, optional model-context quote, score list with dominant markers,
//! dominant/top details, development areas, reflection questions. The
//! all-low branch replaces the dominant section and names no dominant
//! unit.

use std::path::Path;

use anyhow::Result;

use sheelon_core::content::{Quiz, ScoringModel};
use sheelon_core::ranking::{interpretation_for, Verdict};
use sheelon_core::report::{Outcome, QuizReport};

use crate::common::{
    development_areas, effectiveness_labels, is_dominant, reflection_questions, Headings,
};

/// Render the report as a Markdown document.
pub fn render_markdown(quiz: &Quiz, report: &QuizReport) -> String {
    let h = Headings::resolve(quiz);
    let mut lines: Vec<String> = vec![format!("# {}", h.title), String::new()];

    if let Some(context) = &quiz.results.model_context {
        lines.push(format!("> {context}"));
        lines.push(String::new());
    }

    match (&report.outcome, &quiz.scoring) {
        (
            Outcome::Sum {
                ranking, overall, ..
            },
            ScoringModel::Sum(model),
        ) => {
            // Single-category quizzes with an overall total (assertiveness
            // style) report only the total and its interpretation.
            if let (Some(overall), true) = (overall, model.categories.len() == 1) {
                lines.push(format!("## {}", h.total));
                lines.push(format!("{} {}", overall.total, h.out_of));
                lines.push(String::new());
                lines.push(format!("## {}", h.interpretation));
                if let Some(title) = &overall.range_title {
                    lines.push(format!("**{title}**"));
                }
                if let Some(description) = &overall.range_description {
                    lines.push(String::new());
                    lines.push(description.clone());
                }
            } else {
                lines.push(format!("## {}", h.scores));
                for score in &ranking.sorted {
                    let marker = if is_dominant(ranking, &score.id) {
                        h.marker
                    } else {
                        ""
                    };
                    lines.push(format!("- **{}**: {}{marker}", score.title, score.sum));
                }
                lines.push(String::new());

                if ranking.all_low {
                    push_low_scores(quiz, &mut lines);
                } else {
                    lines.push(format!("## {}", h.dominant));
                    for score in &ranking.top {
                        lines.push(String::new());
                        lines.push(format!("### {} ({})", score.title, score.sum));
                        let Some(category) = model.category(&score.id) else {
                            continue;
                        };
                        if let Some(description) = &category.description {
                            lines.push(format!("- {}: {description}", h.description_label));
                        }
                        if let Some(text) = interpretation_for(category, score.sum) {
                            lines.push(format!("- {text}"));
                        }
                    }

                    let development = development_areas(&model.categories, &ranking.sorted);
                    if !development.is_empty() {
                        lines.push(String::new());
                        lines.push(format!("## {}", h.development));
                        for (category, score) in development {
                            lines.push(String::new());
                            lines.push(format!("### {} ({})", score.title, score.sum));
                            if let Some(description) = &category.description {
                                lines.push(format!("- {description}"));
                            }
                            if let Some(interpretation) = &category.interpretation {
                                lines.push(format!("- {}", interpretation.low));
                            }
                        }
                    }

                    push_closing_notes(quiz, &mut lines);
                }
            }
        }

        (
            Outcome::YesCount {
                ranking,
                denominator,
                ..
            },
            ScoringModel::YesCount(model),
        ) => {
            lines.push(format!("## {}", h.scores));
            for score in &ranking.sorted {
                let marker = if is_dominant(ranking, &score.id) {
                    h.marker
                } else {
                    ""
                };
                lines.push(format!(
                    "- **{}**: {}/{denominator}{marker}",
                    score.title, score.sum
                ));
            }
            lines.push(String::new());
            lines.push(format!("## {}", h.dominant));
            for (index, score) in ranking.top.iter().enumerate() {
                lines.push(String::new());
                lines.push(format!(
                    "### {}. {} ({}/{denominator})",
                    index + 1,
                    score.title,
                    score.sum
                ));
                let Some(category) = model.category(&score.id) else {
                    continue;
                };
                if let Some(description) = &category.description {
                    lines.push(String::new());
                    lines.push(description.clone());
                }
                if !category.traits.is_empty() {
                    lines.push(String::new());
                    lines.push(format!("**{}**", h.traits));
                    for t in &category.traits {
                        lines.push(format!("- {t}"));
                    }
                }
            }

            let secondary: Vec<_> = ranking
                .sorted
                .iter()
                .filter(|s| !ranking.top.iter().any(|t| t.id == s.id))
                .collect();
            if !secondary.is_empty() {
                lines.push(String::new());
                lines.push(format!("## {}", h.secondary));
                for score in secondary {
                    lines.push(format!(
                        "- **{}**: {}/{denominator}",
                        score.title, score.sum
                    ));
                }
            }
        }

        (Outcome::Circles { circles }, ScoringModel::Circles(model)) => {
            lines.push(format!("## {}", h.scores));
            for circle in circles {
                let subtitle = circle
                    .subtitle
                    .as_deref()
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                lines.push(format!(
                    "- **{}**{subtitle}: {} / {}",
                    circle.title, circle.sum, circle.max_possible
                ));
            }
            lines.push(String::new());
            lines.push(format!("## {}", h.sub_scores));
            for circle in circles {
                let subtitle = circle
                    .subtitle
                    .as_deref()
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                lines.push(format!("### {}{subtitle}", circle.title));
                let content_circle = model.circles.iter().find(|c| c.id == circle.id);
                for sub in &circle.sub_scores {
                    let description = content_circle
                        .and_then(|c| c.sub_categories.iter().find(|s| s.id == sub.id))
                        .and_then(|s| s.description.as_deref())
                        .map(|d| format!(" ({d})"))
                        .unwrap_or_default();
                    lines.push(format!(
                        "- **{}**{description}: {} / {}",
                        sub.title,
                        sub.sum,
                        sub.max_possible.unwrap_or_default()
                    ));
                }
                lines.push(String::new());
            }
            while lines.last().is_some_and(|l| l.is_empty()) {
                lines.pop();
            }
        }

        (Outcome::Effectiveness { styles, ranking }, ScoringModel::Effectiveness(model)) => {
            let labels = effectiveness_labels(quiz);

            lines.push(format!("## {}", h.scores));
            let (col_style, col_choices, col_eff, col_verdict) = match &quiz.export.table_headers {
                Some(t) => (
                    t.style.as_str(),
                    t.choices.as_str(),
                    t.effectiveness.as_str(),
                    t.interpretation.as_str(),
                ),
                None => ("סגנון", h.choices, h.effectiveness, "פירוש"),
            };
            lines.push(format!(
                "| {col_style} | {col_choices} | {col_eff} | {col_verdict} |"
            ));
            lines.push("|-------|-------|-------|-------|".into());
            for tally in styles {
                let verdict = Verdict::for_effectiveness(tally.effectiveness);
                lines.push(format!(
                    "| {} | {} | {} | {} |",
                    tally.title,
                    tally.count,
                    signed(tally.effectiveness),
                    verdict.label(&labels)
                ));
            }
            lines.push(String::new());

            lines.push(format!("## {}", h.dominant));
            if let (true, Some(balanced)) = (ranking.is_balanced(), &quiz.results.balanced_profile)
            {
                lines.push(balanced.clone());
            } else {
                let max_count = ranking.dominant.first().map(|d| d.count).unwrap_or(0);
                let titles: Vec<&str> =
                    ranking.dominant.iter().map(|d| d.title.as_str()).collect();
                lines.push(format!(
                    "{} ({max_count} {})",
                    titles.join(", "),
                    h.choices
                ));
            }
            lines.push(String::new());

            lines.push(format!("## {}", h.details));
            for tally in styles {
                let verdict = Verdict::for_effectiveness(tally.effectiveness);
                lines.push(String::new());
                lines.push(format!("### {}", tally.title));
                if let Some(style) = model.style(&tally.id) {
                    if let (Some(subtitle), Some(description)) =
                        (&style.subtitle, &style.description)
                    {
                        lines.push(format!("- **{subtitle}**: {description}"));
                    }
                    lines.push(format!(
                        "- {}: {}, {}: {} ({})",
                        h.choices,
                        tally.count,
                        h.effectiveness,
                        signed(tally.effectiveness),
                        verdict.label(&labels)
                    ));
                    let narrative = if tally.effectiveness >= 0 {
                        style.effective.as_deref()
                    } else {
                        style.ineffective.as_deref()
                    };
                    if let Some(narrative) = narrative {
                        lines.push(format!("- {narrative}"));
                    }
                }
            }
        }

        (Outcome::DomainCount { ranking, .. }, ScoringModel::DomainCount(model)) => {
            lines.push(format!("## {}", h.scores));
            for score in &ranking.sorted {
                let marker = if is_dominant(ranking, &score.id) {
                    h.marker
                } else {
                    ""
                };
                lines.push(format!("- **{}**: {}{marker}", score.title, score.sum));
            }
            lines.push(String::new());
            lines.push(format!("## {}", h.dominant));
            for score in &ranking.dominant {
                lines.push(String::new());
                lines.push(format!("### {} ({})", score.title, score.sum));
                let Some(domain) = model.domains.iter().find(|d| d.id == score.id) else {
                    continue;
                };
                if let Some(description) = &domain.description {
                    lines.push(description.clone());
                }
                if !domain.strengths.is_empty() {
                    lines.push(String::new());
                    lines.push("**חוזקות:**".into());
                    for s in &domain.strengths {
                        lines.push(format!("- {s}"));
                    }
                }
                if !domain.challenges.is_empty() {
                    lines.push(String::new());
                    lines.push("**אתגרים:**".into());
                    for c in &domain.challenges {
                        lines.push(format!("- {c}"));
                    }
                }
            }
        }

        // A report paired with the wrong content file: keep the header-only
        // document rather than invent sections.
        _ => {}
    }

    let questions = reflection_questions(quiz);
    if !questions.is_empty() {
        lines.push(String::new());
        lines.push(format!("## {}", h.reflection));
        for question in questions {
            lines.push(format!("- {question}"));
        }
    }

    lines.join("\n")
}

/// Write the Markdown report to a file.
pub fn write_markdown_report(quiz: &Quiz, report: &QuizReport, path: &Path) -> Result<()> {
    let markdown = render_markdown(quiz, report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, markdown)?;
    Ok(())
}

fn push_low_scores(quiz: &Quiz, lines: &mut Vec<String>) {
    let results = &quiz.results;
    lines.push(format!(
        "## {}",
        results.low_scores.as_deref().unwrap_or("הציונים נמוכים")
    ));
    if let Some(action) = &results.low_scores_action {
        lines.push(String::new());
        lines.push(action.clone());
    }
    if let Some(worth_it) = &results.worth_it {
        lines.push(String::new());
        lines.push(worth_it.clone());
    }
}

fn push_closing_notes(quiz: &Quiz, lines: &mut Vec<String>) {
    let results = &quiz.results;
    for note in [&results.note, &results.action_plan, &results.worth_it]
        .into_iter()
        .flatten()
    {
        lines.push(String::new());
        lines.push(note.clone());
    }
}

fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures;
    use sheelon_core::answers::{Answer, AnswerSheet};
    use sheelon_core::report::QuizReport;

    #[test]
    fn sum_report_orders_sections() {
        let quiz = fixtures::sum_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for (i, v) in [5u8, 5, 5, 2, 2, 2].iter().enumerate() {
            answers.set(i, Answer::Scale(*v));
        }
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        let title_at = md.find("# תוצאות השאלון").unwrap();
        let scores_at = md.find("## ציונים לפי קטגוריה").unwrap();
        let dominant_at = md.find("## הקטגוריות המובילות").unwrap();
        assert!(title_at < scores_at && scores_at < dominant_at);

        // The 15-point category is dominant and carries the marker.
        assert!(md.contains("- **משמעות**: 15 ⭐"));
        assert!(md.contains("- **צמיחה**: 6"));
        // Band interpretation of the dominant category (15 of [3, 15]).
        assert!(md.contains("גבוה מאוד"));
    }

    #[test]
    fn sum_report_low_branch_names_no_dominant() {
        let quiz = fixtures::sum_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for i in 0..6 {
            answers.set(i, Answer::Scale(1));
        }
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("## כל הציונים נמוכים"));
        assert!(md.contains("שווה לעצור ולבדוק"));
        assert!(!md.contains("## הקטגוריות המובילות"));
    }

    #[test]
    fn sum_report_lists_development_areas() {
        let quiz = fixtures::sum_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        // One category high, one in its bottom band but not all-low.
        for (i, v) in [5u8, 5, 5, 2, 2, 2].iter().enumerate() {
            answers.set(i, Answer::Scale(*v));
        }
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("## תחומים לפיתוח"));
        assert!(md.contains("### צמיחה (6)"));
    }

    #[test]
    fn overall_report_shows_total_and_range() {
        let quiz = fixtures::overall_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for i in 0..4 {
            answers.set(i, Answer::Scale(5));
        }
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("## הציון הכולל"));
        assert!(md.contains("20 מתוך 100"));
        assert!(md.contains("**אסרטיביות גבוהה**"));
        // No category list for a single-category overall quiz.
        assert!(!md.contains("## ציונים"));
    }

    #[test]
    fn yes_count_report_uses_content_denominator() {
        let quiz = fixtures::yes_count_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for (i, yes) in [true, true, false, true, false, false].iter().enumerate() {
            answers.set(i, Answer::YesNo(*yes));
        }
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("- **תומך**: 2/3"));
        assert!(md.contains("- **מוביל**: 1/3"));
        assert!(md.contains("## הסגנונות הדומיננטיים"));
        // Both styles land in the top set (top-2 of two), so the secondary
        // section is absent.
        assert!(!md.contains("## סגנונות משניים"));
        assert!(md.contains("**מאפיינים עיקריים:**"));
    }

    #[test]
    fn circles_report_shows_both_levels() {
        let quiz = fixtures::circles_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for (i, v) in [3u8, 2, 1, 3].iter().enumerate() {
            answers.set(i, Answer::Scale(*v));
        }
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("- **ניהול עצמי**: 9 / 12"));
        assert!(md.contains("## פירוט לפי תת-קטגוריה"));
        assert!(md.contains("- **מודעות**: 5 / 6"));
        assert!(md.contains("- **ויסות**: 4 / 6"));
    }

    #[test]
    fn effectiveness_report_has_table_and_narratives() {
        let quiz = fixtures::effectiveness_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Choice("a".into()));
        answers.set(1, Answer::Choice("b".into()));
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("| מכוון | 1 | +2 | יעיל |"));
        assert!(md.contains("| מאמן | 1 | -1 | לא יעיל |"));
        // Both styles tie on one choice each.
        assert!(md.contains("מכוון, מאמן (1 בחירות)"));
        // Sign of the accumulator picks the narrative.
        assert!(md.contains("בחירה מדויקת"));
        assert!(md.contains("פחות מתאים כאן"));
    }

    #[test]
    fn domain_report_details_dominant_domain_only() {
        let quiz = fixtures::domain_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Choice("people".into()));
        answers.set(1, Answer::Choice("people".into()));
        answers.set(2, Answer::Choice("process".into()));
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("- **אנשים**: 2 ⭐"));
        assert!(md.contains("- **תהליך**: 1"));
        assert!(md.contains("### אנשים (2)"));
        assert!(md.contains("בונה צוותים חזקים"));
        // The non-dominant domain gets no detail section.
        assert!(!md.contains("### תהליך"));
    }

    #[test]
    fn effectiveness_tie_across_all_styles_uses_balanced_text() {
        let mut quiz = fixtures::effectiveness_quiz();
        quiz.results.balanced_profile =
            Some("הבחירות שלך מתפלגות שווה בין הסגנונות".into());
        // An untouched sheet leaves every style at zero choices, a full tie.
        let answers = AnswerSheet::for_quiz(&quiz);
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("הבחירות שלך מתפלגות שווה בין הסגנונות"));
        assert!(!md.contains("(0 בחירות)"));
    }

    #[test]
    fn reflection_questions_appended_verbatim() {
        let quiz = fixtures::sum_quiz();
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for i in 0..6 {
            answers.set(i, Answer::Scale(4));
        }
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        assert!(md.contains("## שאלות למחשבה"));
        assert!(md.contains("- מה נותן לי אנרגיה בעבודה?"));
        assert!(md.trim_end().ends_with("- איפה הייתי רוצה להשתפר?"));
    }

    #[test]
    fn partial_sheet_still_renders() {
        let quiz = fixtures::sum_quiz();
        let answers = AnswerSheet::for_quiz(&quiz);
        let report = QuizReport::assemble(&quiz, &answers);
        let md = render_markdown(&quiz, &report);

        // Nothing answered: every sum is zero and the low branch triggers.
        assert!(md.contains("- **משמעות**: 0"));
        assert!(md.contains("## כל הציונים נמוכים"));
    }

    #[test]
    fn write_report_creates_parent_dirs() {
        let quiz = fixtures::sum_quiz();
        let answers = AnswerSheet::for_quiz(&quiz);
        let report = QuizReport::assemble(&quiz, &answers);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/results.md");
        write_markdown_report(&quiz, &report, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# תוצאות השאלון"));
    }
}
