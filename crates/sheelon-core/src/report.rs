//! Assembled quiz reports with JSON persistence.
//!
//! A report is a snapshot: scores and ranking computed fresh from the
//! live answer sheet at assembly time. Reports are never the source of
//! truth; re-assembling after an answer edit yields the updated result.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answers::AnswerSheet;
use crate::content::{Quiz, ScoringModel};
use crate::ranking::{rank, Ranking};
use crate::scoring::{
    score, CategoryScore, CircleScore, OverallResult, Scores, StyleTally,
};

/// A complete assembled report for one quiz run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was assembled.
    pub created_at: DateTime<Utc>,
    /// Summary of the quiz this report was computed from.
    pub quiz: QuizSummary,
    /// How many questions were answered at assembly time.
    pub answered: usize,
    /// Scores and ranking, shaped by the quiz's scoring mode.
    pub outcome: Outcome,
}

/// Summary of a quiz (without the full content).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
}

/// Computed outcome per scoring mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Outcome {
    Sum {
        categories: Vec<CategoryScore>,
        ranking: Ranking<CategoryScore>,
        overall: Option<OverallResult>,
    },
    YesCount {
        categories: Vec<CategoryScore>,
        ranking: Ranking<CategoryScore>,
        denominator: u32,
    },
    Circles {
        circles: Vec<CircleScore>,
    },
    Effectiveness {
        styles: Vec<StyleTally>,
        ranking: Ranking<StyleTally>,
    },
    DomainCount {
        domains: Vec<CategoryScore>,
        ranking: Ranking<CategoryScore>,
    },
}

impl QuizReport {
    /// Compute scores and ranking from the live answer sheet.
    pub fn assemble(quiz: &Quiz, answers: &AnswerSheet) -> Self {
        let outcome = match score(quiz, answers) {
            Scores::Sum { categories, overall } => {
                let low_threshold = match &quiz.scoring {
                    ScoringModel::Sum(model) => model.low_threshold,
                    _ => None,
                };
                let ranking = rank(&categories, low_threshold);
                Outcome::Sum {
                    categories,
                    ranking,
                    overall,
                }
            }
            Scores::YesCount {
                categories,
                denominator,
            } => {
                let ranking = rank(&categories, None);
                Outcome::YesCount {
                    categories,
                    ranking,
                    denominator,
                }
            }
            Scores::Circles { circles } => Outcome::Circles { circles },
            Scores::Effectiveness { styles } => {
                let ranking = rank(&styles, None);
                Outcome::Effectiveness { styles, ranking }
            }
            Scores::DomainCount { domains } => {
                let ranking = rank(&domains, None);
                Outcome::DomainCount { domains, ranking }
            }
        };

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz: QuizSummary {
                id: quiz.meta.id.clone(),
                title: quiz.meta.title.clone(),
                question_count: quiz.question_count(),
            },
            answered: answers.answered_count(),
            outcome,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
