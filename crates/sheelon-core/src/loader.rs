//! JSON content loading and validation.
//!
//! A quiz that fails to load is dead for the session: the failure is
//! logged and surfaced as a typed error, with no retry. Validation is a
//! separate, advisory pass: it reports content smells (misaligned ids,
//! dangling question refs, denominator mismatches) without ever blocking
//! scoring, which treats cross-references as loader-established
//! invariants.

use std::collections::HashSet;
use std::path::Path;

use crate::content::{Prompt, Quiz, ScoringModel};
use crate::error::ContentError;

/// Load a quiz from a JSON content file.
pub fn load_quiz(path: &Path) -> Result<Quiz, ContentError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        let err = ContentError::Io {
            path: path.display().to_string(),
            source,
        };
        tracing::error!("content load failed: {err}");
        err
    })?;
    parse_quiz(&text, &path.display().to_string())
}

/// Parse quiz content from a JSON string.
pub fn load_quiz_str(json: &str) -> Result<Quiz, ContentError> {
    parse_quiz(json, "<string>")
}

fn parse_quiz(json: &str, source: &str) -> Result<Quiz, ContentError> {
    serde_json::from_str(json).map_err(|err| {
        let err = ContentError::Parse {
            path: source.to_string(),
            source: err,
        };
        tracing::error!("content load failed: {err}");
        err
    })
}

/// Recursively load every `.json` quiz file under a directory.
///
/// Files that fail to parse are skipped with a warning; an unreadable
/// directory is an error.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>, ContentError> {
    let mut quizzes = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|source| ContentError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<_> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match load_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {e}", path.display());
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from content validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question or unit the warning concerns, if any.
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(subject: Option<String>, message: impl Into<String>) -> Self {
        Self {
            subject,
            message: message.into(),
        }
    }
}

/// Validate quiz content for common authoring mistakes.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let question_count = quiz.question_count() as u32;

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning::new(None, "quiz has no questions"));
    }

    // Index alignment is load-bearing: scoring addresses answers by
    // position, so an id out of step with its slot silently mis-scores.
    for (index, question) in quiz.questions.iter().enumerate() {
        let expected = index as u32 + 1;
        if question.id != expected {
            warnings.push(ValidationWarning::new(
                Some(question.id.to_string()),
                format!("question id {} at position {} (expected {expected})", question.id, index),
            ));
        }
    }

    let mut check_refs = |unit_id: &str, refs: &[u32], warnings: &mut Vec<ValidationWarning>| {
        if refs.is_empty() {
            warnings.push(ValidationWarning::new(
                Some(unit_id.to_string()),
                "unit has no question references",
            ));
        }
        let mut seen = HashSet::new();
        for &q in refs {
            if q < 1 || q > question_count {
                warnings.push(ValidationWarning::new(
                    Some(unit_id.to_string()),
                    format!("question ref {q} is out of range (1..={question_count})"),
                ));
            }
            if !seen.insert(q) {
                warnings.push(ValidationWarning::new(
                    Some(unit_id.to_string()),
                    format!("question ref {q} appears more than once"),
                ));
            }
        }
    };

    match &quiz.scoring {
        ScoringModel::Sum(model) => {
            if model.categories.is_empty() {
                warnings.push(ValidationWarning::new(None, "no categories defined"));
            }
            for category in &model.categories {
                check_refs(&category.id, &category.questions, &mut warnings);
                if category.score_range.is_some() != category.interpretation.is_some() {
                    warnings.push(ValidationWarning::new(
                        Some(category.id.clone()),
                        "score_range and interpretation must be supplied together",
                    ));
                }
            }
            expect_prompts(quiz, "sum", &mut warnings, |p| {
                matches!(p, Prompt::Statement { .. } | Prompt::Paired { .. })
            });
        }

        ScoringModel::YesCount(model) => {
            for category in &model.categories {
                check_refs(&category.id, &category.questions, &mut warnings);
                // The display denominator comes from content; a mismatched
                // question list would render misleading "/N" scores.
                if category.questions.len() != model.denominator as usize {
                    warnings.push(ValidationWarning::new(
                        Some(category.id.clone()),
                        format!(
                            "category lists {} questions but the denominator is {}",
                            category.questions.len(),
                            model.denominator
                        ),
                    ));
                }
            }
            expect_prompts(quiz, "yes_count", &mut warnings, |p| {
                matches!(p, Prompt::YesNo { .. })
            });
        }

        ScoringModel::Circles(model) => {
            for circle in &model.circles {
                if circle.sub_categories.is_empty() {
                    warnings.push(ValidationWarning::new(
                        Some(circle.id.clone()),
                        "circle has no sub-categories",
                    ));
                }
                for sub in &circle.sub_categories {
                    check_refs(&sub.id, &sub.questions, &mut warnings);
                }
            }
            expect_prompts(quiz, "circles", &mut warnings, |p| {
                matches!(p, Prompt::Statement { .. } | Prompt::Paired { .. })
            });
        }

        ScoringModel::Effectiveness(model) => {
            let style_ids: HashSet<&str> = model.styles.iter().map(|s| s.id.as_str()).collect();
            for question in &quiz.questions {
                let Prompt::Scenario { options, .. } = &question.prompt else {
                    warnings.push(ValidationWarning::new(
                        Some(question.id.to_string()),
                        "effectiveness quizzes expect scenario questions",
                    ));
                    continue;
                };
                if options.is_empty() {
                    warnings.push(ValidationWarning::new(
                        Some(question.id.to_string()),
                        "scenario has no options",
                    ));
                }
                for option in options {
                    if !style_ids.contains(option.style.as_str()) {
                        warnings.push(ValidationWarning::new(
                            Some(question.id.to_string()),
                            format!("option '{}' maps to unknown style '{}'", option.id, option.style),
                        ));
                    }
                }
            }
        }

        ScoringModel::DomainCount(model) => {
            let domain_ids: HashSet<&str> = model.domains.iter().map(|d| d.id.as_str()).collect();
            for question in &quiz.questions {
                let Prompt::Choice { options, .. } = &question.prompt else {
                    warnings.push(ValidationWarning::new(
                        Some(question.id.to_string()),
                        "domain_count quizzes expect choice questions",
                    ));
                    continue;
                };
                for option in options {
                    if !domain_ids.contains(option.id.as_str()) {
                        warnings.push(ValidationWarning::new(
                            Some(question.id.to_string()),
                            format!("option '{}' is not a declared domain", option.id),
                        ));
                    }
                }
            }
        }
    }

    warnings
}

fn expect_prompts(
    quiz: &Quiz,
    mode: &str,
    warnings: &mut Vec<ValidationWarning>,
    accepted: impl Fn(&Prompt) -> bool,
) {
    for question in &quiz.questions {
        if !accepted(&question.prompt) {
            warnings.push(ValidationWarning::new(
                Some(question.id.to_string()),
                format!("question kind does not fit a {mode} quiz"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"{
        "meta": {"id": "drivers", "title": "שאלון מנועי מחוברות"},
        "questions": [
            {"id": 1, "kind": "statement", "text": "אני מרגיש שייך לצוות"},
            {"id": 2, "kind": "statement", "text": "העבודה שלי משמעותית"},
            {"id": 3, "kind": "statement", "text": "יש לי הזדמנויות ללמוד"},
            {"id": 4, "kind": "statement", "text": "אני גאה במקום העבודה"}
        ],
        "scoring": {
            "mode": "sum",
            "scale": {"min": 1, "max": 5},
            "low_threshold": 12,
            "categories": [
                {"id": "belonging", "title": "שייכות", "questions": [1, 4]},
                {"id": "meaning", "title": "משמעות", "questions": [2, 3]}
            ]
        },
        "ui": {
            "question_of": "שאלה {current} מתוך {total}",
            "next": "הבא",
            "prev": "הקודם",
            "finish": "סיום",
            "back_to_intro": "חזרה להסבר"
        },
        "export": {
            "title": "תוצאות שאלון מנועי מחוברות",
            "scores_heading": "ציונים לפי מנוע"
        }
    }"#;

    #[test]
    fn parse_valid_content() {
        let quiz = load_quiz_str(VALID_JSON).unwrap();
        assert_eq!(quiz.meta.id, "drivers");
        assert_eq!(quiz.question_count(), 4);
        assert_eq!(quiz.scoring.mode_name(), "sum");
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn parse_malformed_json() {
        let err = load_quiz_str("{not json").unwrap_err();
        assert!(err.is_load_failure());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_quiz(Path::new("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn misaligned_question_id_warns() {
        let mut quiz = load_quiz_str(VALID_JSON).unwrap();
        quiz.questions[2].id = 9;
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("expected 3")));
    }

    #[test]
    fn out_of_range_ref_warns() {
        let mut quiz = load_quiz_str(VALID_JSON).unwrap();
        if let ScoringModel::Sum(model) = &mut quiz.scoring {
            model.categories[0].questions.push(40);
        }
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("out of range")));
    }

    #[test]
    fn duplicate_ref_warns() {
        let mut quiz = load_quiz_str(VALID_JSON).unwrap();
        if let ScoringModel::Sum(model) = &mut quiz.scoring {
            model.categories[0].questions.push(1);
        }
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("more than once")));
    }

    #[test]
    fn range_without_interpretation_warns() {
        let mut quiz = load_quiz_str(VALID_JSON).unwrap();
        if let ScoringModel::Sum(model) = &mut quiz.scoring {
            model.categories[0].score_range = Some((2, 10));
        }
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("supplied together")));
    }

    #[test]
    fn denominator_mismatch_warns() {
        let json = r#"{
            "meta": {"id": "styles", "title": "סגנונות תקשורת"},
            "questions": [
                {"id": 1, "kind": "yes_no", "text": "א"},
                {"id": 2, "kind": "yes_no", "text": "ב"},
                {"id": 3, "kind": "yes_no", "text": "ג"}
            ],
            "scoring": {
                "mode": "yes_count",
                "denominator": 10,
                "categories": [
                    {"id": "driver", "title": "מוביל", "questions": [1, 2, 3]}
                ]
            },
            "ui": {
                "question_of": "{current}/{total}",
                "next": "הבא", "prev": "הקודם",
                "finish": "סיום", "back_to_intro": "חזרה"
            },
            "export": {"title": "תוצאות", "scores_heading": "ציונים"}
        }"#;
        let quiz = load_quiz_str(json).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("denominator is 10")));
    }

    #[test]
    fn unknown_style_mapping_warns() {
        let json = r#"{
            "meta": {"id": "situational", "title": "ניהול מצבי"},
            "questions": [
                {"id": 1, "kind": "scenario", "scenario": "תרחיש",
                 "options": [
                    {"id": "a", "text": "א", "style": "directing", "score": 2},
                    {"id": "b", "text": "ב", "style": "missing", "score": -1}
                 ]}
            ],
            "scoring": {
                "mode": "effectiveness",
                "styles": [{"id": "directing", "title": "מכוון"}]
            },
            "ui": {
                "question_of": "{current}/{total}",
                "next": "הבא", "prev": "הקודם",
                "finish": "סיום", "back_to_intro": "חזרה"
            },
            "export": {"title": "תוצאות", "scores_heading": "ציונים"}
        }"#;
        let quiz = load_quiz_str(json).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("unknown style 'missing'")));
    }

    #[test]
    fn prompt_kind_mismatch_warns() {
        let mut quiz = load_quiz_str(VALID_JSON).unwrap();
        quiz.questions[0].prompt = Prompt::YesNo { text: "כן?".into() };
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("does not fit a sum quiz")));
    }

    #[test]
    fn load_directory_collects_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), VALID_JSON).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{oops").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not content").unwrap();

        let quizzes = load_quiz_directory(dir.path()).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].meta.id, "drivers");
    }
}
