//! Rich-text report renderer.
//!
//! Produces an HTML fragment for formatted clipboard copy and native
//! share targets. Mirrors the Markdown renderer section for section:
//! same information, different markup. Content strings are trusted and
//! inserted verbatim.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use sheelon_core::content::{Quiz, ScoringModel};
use sheelon_core::ranking::{interpretation_for, Verdict};
use sheelon_core::report::{Outcome, QuizReport};

use crate::common::{
    development_areas, effectiveness_labels, is_dominant, reflection_questions, Headings,
};

/// Render the report as an HTML fragment.
pub fn render_rich_text(quiz: &Quiz, report: &QuizReport) -> String {
    let h = Headings::resolve(quiz);
    let mut html = String::new();

    let _ = writeln!(html, "<h1>{}</h1>", h.title);
    if let Some(context) = &quiz.results.model_context {
        let _ = writeln!(html, "<blockquote>{context}</blockquote>");
    }

    match (&report.outcome, &quiz.scoring) {
        (
            Outcome::Sum {
                ranking, overall, ..
            },
            ScoringModel::Sum(model),
        ) => {
            if let (Some(overall), true) = (overall, model.categories.len() == 1) {
                let _ = writeln!(html, "<h2>{}</h2>", h.total);
                let _ = writeln!(
                    html,
                    "<p><strong>{}</strong> {}</p>",
                    overall.total, h.out_of
                );
                let _ = writeln!(html, "<h2>{}</h2>", h.interpretation);
                if let Some(title) = &overall.range_title {
                    let _ = writeln!(html, "<h3>{title}</h3>");
                }
                if let Some(description) = &overall.range_description {
                    let _ = writeln!(html, "<p>{description}</p>");
                }
            } else {
                push_score_list(&mut html, &h, ranking.sorted.iter().map(|score| {
                    let marker = if is_dominant(ranking, &score.id) {
                        h.marker
                    } else {
                        ""
                    };
                    format!(
                        "<li><strong>{}</strong>: {}{marker}</li>",
                        score.title, score.sum
                    )
                }));

                if ranking.all_low {
                    push_low_scores(&mut html, quiz);
                } else {
                    let _ = writeln!(html, "<h2>{}</h2>", h.dominant);
                    for score in &ranking.top {
                        let _ = writeln!(html, "<h3>{} ({})</h3>", score.title, score.sum);
                        let Some(category) = model.category(&score.id) else {
                            continue;
                        };
                        if let Some(description) = &category.description {
                            let _ = writeln!(
                                html,
                                "<p><strong>{}:</strong> {description}</p>",
                                h.description_label
                            );
                        }
                        if let Some(text) = interpretation_for(category, score.sum) {
                            let _ = writeln!(html, "<p>{text}</p>");
                        }
                    }

                    let development = development_areas(&model.categories, &ranking.sorted);
                    if !development.is_empty() {
                        let _ = writeln!(html, "<h2>{}</h2>", h.development);
                        for (category, score) in development {
                            let _ = writeln!(html, "<h3>{} ({})</h3>", score.title, score.sum);
                            if let Some(description) = &category.description {
                                let _ = writeln!(html, "<p>{description}</p>");
                            }
                            if let Some(interpretation) = &category.interpretation {
                                let _ = writeln!(html, "<p>{}</p>", interpretation.low);
                            }
                        }
                    }

                    push_closing_notes(&mut html, quiz);
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
            push_score_list(&mut html, &h, ranking.sorted.iter().map(|score| {
                let marker = if is_dominant(ranking, &score.id) {
                    h.marker
                } else {
                    ""
                };
                format!(
                    "<li><strong>{}</strong>: {}/{denominator}{marker}</li>",
                    score.title, score.sum
                )
            }));

            let _ = writeln!(html, "<h2>{}</h2>", h.dominant);
            for (index, score) in ranking.top.iter().enumerate() {
                let _ = writeln!(
                    html,
                    "<h3>{}. {} ({}/{denominator})</h3>",
                    index + 1,
                    score.title,
                    score.sum
                );
                let Some(category) = model.category(&score.id) else {
                    continue;
                };
                if let Some(description) = &category.description {
                    let _ = writeln!(html, "<p>{description}</p>");
                }
                if !category.traits.is_empty() {
                    let _ = writeln!(html, "<p><strong>{}</strong></p>", h.traits);
                    html.push_str("<ul>\n");
                    for t in &category.traits {
                        let _ = writeln!(html, "<li>{t}</li>");
                    }
                    html.push_str("</ul>\n");
                }
            }

            let secondary: Vec<_> = ranking
                .sorted
                .iter()
                .filter(|s| !ranking.top.iter().any(|t| t.id == s.id))
                .collect();
            if !secondary.is_empty() {
                let _ = writeln!(html, "<h2>{}</h2>", h.secondary);
                html.push_str("<ul>\n");
                for score in secondary {
                    let _ = writeln!(
                        html,
                        "<li><strong>{}</strong>: {}/{denominator}</li>",
                        score.title, score.sum
                    );
                }
                html.push_str("</ul>\n");
            }
        }

        (Outcome::Circles { circles }, ScoringModel::Circles(model)) => {
            let _ = writeln!(html, "<h2>{}</h2>", h.scores);
            html.push_str("<ul>\n");
            for circle in circles {
                let subtitle = circle
                    .subtitle
                    .as_deref()
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                let _ = writeln!(
                    html,
                    "<li><strong>{}</strong>{subtitle}: {} / {}</li>",
                    circle.title, circle.sum, circle.max_possible
                );
            }
            html.push_str("</ul>\n");

            let _ = writeln!(html, "<h2>{}</h2>", h.sub_scores);
            for circle in circles {
                let subtitle = circle
                    .subtitle
                    .as_deref()
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                let _ = writeln!(html, "<h3>{}{subtitle}</h3>", circle.title);
                let content_circle = model.circles.iter().find(|c| c.id == circle.id);
                html.push_str("<ul>\n");
                for sub in &circle.sub_scores {
                    let description = content_circle
                        .and_then(|c| c.sub_categories.iter().find(|s| s.id == sub.id))
                        .and_then(|s| s.description.as_deref())
                        .map(|d| format!(" ({d})"))
                        .unwrap_or_default();
                    let _ = writeln!(
                        html,
                        "<li><strong>{}</strong>{description}: {} / {}</li>",
                        sub.title,
                        sub.sum,
                        sub.max_possible.unwrap_or_default()
                    );
                }
                html.push_str("</ul>\n");
            }
        }

        (Outcome::Effectiveness { styles, ranking }, ScoringModel::Effectiveness(model)) => {
            let labels = effectiveness_labels(quiz);

            let _ = writeln!(html, "<h2>{}</h2>", h.scores);
            let (col_style, col_choices, col_eff, col_verdict) = match &quiz.export.table_headers {
                Some(t) => (
                    t.style.as_str(),
                    t.choices.as_str(),
                    t.effectiveness.as_str(),
                    t.interpretation.as_str(),
                ),
                None => ("סגנון", h.choices, h.effectiveness, "פירוש"),
            };
            html.push_str("<table>\n");
            let _ = writeln!(
                html,
                "<tr><th>{col_style}</th><th>{col_choices}</th><th>{col_eff}</th><th>{col_verdict}</th></tr>"
            );
            for tally in styles {
                let verdict = Verdict::for_effectiveness(tally.effectiveness);
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    tally.title,
                    tally.count,
                    signed(tally.effectiveness),
                    verdict.label(&labels)
                );
            }
            html.push_str("</table>\n");

            let _ = writeln!(html, "<h2>{}</h2>", h.dominant);
            if ranking.is_balanced() && quiz.results.balanced_profile.is_some() {
                let _ = writeln!(
                    html,
                    "<p>{}</p>",
                    quiz.results.balanced_profile.as_deref().unwrap_or_default()
                );
            } else {
                let max_count = ranking.dominant.first().map(|d| d.count).unwrap_or(0);
                let titles: Vec<String> = ranking
                    .dominant
                    .iter()
                    .map(|d| format!("<strong>{}</strong>", d.title))
                    .collect();
                let _ = writeln!(
                    html,
                    "<p>{} ({max_count} {})</p>",
                    titles.join(", "),
                    h.choices
                );
            }

            let _ = writeln!(html, "<h2>{}</h2>", h.details);
            for tally in styles {
                let verdict = Verdict::for_effectiveness(tally.effectiveness);
                let _ = writeln!(html, "<h3>{}</h3>", tally.title);
                if let Some(style) = model.style(&tally.id) {
                    if let (Some(subtitle), Some(description)) =
                        (&style.subtitle, &style.description)
                    {
                        let _ = writeln!(
                            html,
                            "<p><strong>{subtitle}</strong>: {description}</p>"
                        );
                    }
                    let _ = writeln!(
                        html,
                        "<p>{}: {}, {}: {} ({})</p>",
                        h.choices,
                        tally.count,
                        h.effectiveness,
                        signed(tally.effectiveness),
                        verdict.label(&labels)
                    );
                    let narrative = if tally.effectiveness >= 0 {
                        style.effective.as_deref()
                    } else {
                        style.ineffective.as_deref()
                    };
                    if let Some(narrative) = narrative {
                        let _ = writeln!(html, "<p>{narrative}</p>");
                    }
                }
            }
        }

        (Outcome::DomainCount { ranking, .. }, ScoringModel::DomainCount(model)) => {
            push_score_list(&mut html, &h, ranking.sorted.iter().map(|score| {
                let marker = if is_dominant(ranking, &score.id) {
                    h.marker
                } else {
                    ""
                };
                format!(
                    "<li><strong>{}</strong>: {}{marker}</li>",
                    score.title, score.sum
                )
            }));

            let _ = writeln!(html, "<h2>{}</h2>", h.dominant);
            for score in &ranking.dominant {
                let _ = writeln!(html, "<h3>{} ({})</h3>", score.title, score.sum);
                let Some(domain) = model.domains.iter().find(|d| d.id == score.id) else {
                    continue;
                };
                if let Some(description) = &domain.description {
                    let _ = writeln!(html, "<p>{description}</p>");
                }
                if !domain.strengths.is_empty() {
                    html.push_str("<p><strong>חוזקות:</strong></p>\n<ul>\n");
                    for s in &domain.strengths {
                        let _ = writeln!(html, "<li>{s}</li>");
                    }
                    html.push_str("</ul>\n");
                }
                if !domain.challenges.is_empty() {
                    html.push_str("<p><strong>אתגרים:</strong></p>\n<ul>\n");
                    for c in &domain.challenges {
                        let _ = writeln!(html, "<li>{c}</li>");
                    }
                    html.push_str("</ul>\n");
                }
            }
        }

        _ => {}
    }

    let questions = reflection_questions(quiz);
    if !questions.is_empty() {
        let _ = writeln!(html, "<h2>{}</h2>", h.reflection);
        html.push_str("<ul>\n");
        for question in questions {
            let _ = writeln!(html, "<li>{question}</li>");
        }
        html.push_str("</ul>\n");
    }

    html
}

/// Write the rich-text report to a file.
pub fn write_rich_text_report(quiz: &Quiz, report: &QuizReport, path: &Path) -> Result<()> {
    let html = render_rich_text(quiz, report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn push_score_list(
    html: &mut String,
    h: &Headings<'_>,
    items: impl Iterator<Item = String>,
) {
    let _ = writeln!(html, "<h2>{}</h2>", h.scores);
    html.push_str("<ul>\n");
    for item in items {
        html.push_str(&item);
        html.push('\n');
    }
    html.push_str("</ul>\n");
}

fn push_low_scores(html: &mut String, quiz: &Quiz) {
    let results = &quiz.results;
    let _ = writeln!(
        html,
        "<h2>{}</h2>",
        results.low_scores.as_deref().unwrap_or("הציונים נמוכים")
    );
    if let Some(action) = &results.low_scores_action {
        let _ = writeln!(html, "<p>{action}</p>");
    }
    if let Some(worth_it) = &results.worth_it {
        let _ = writeln!(html, "<p><strong>{worth_it}</strong></p>");
    }
}

fn push_closing_notes(html: &mut String, quiz: &Quiz) {
    let results = &quiz.results;
    for note in [&results.note, &results.action_plan, &results.worth_it]
        .into_iter()
        .flatten()
    {
        let _ = writeln!(html, "<p>{note}</p>");
    }
}

fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}
