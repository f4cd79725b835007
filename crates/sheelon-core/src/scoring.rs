//! The scoring engine.
//!
//! `score` is a pure function over the content model and the current
//! answer sheet; it holds no state and is recomputed on every results or
//! export render. Unanswered slots contribute zero: a partially-completed
//! quiz under-scores silently rather than erroring, which is what allows
//! preview scoring mid-quiz.
//!
//! All aggregation is exact integer arithmetic; the only floating-point
//! math is the overall percentage display.

use serde::{Deserialize, Serialize};

use crate::answers::AnswerSheet;
use crate::content::{Prompt, Quiz, ScoringModel};

/// Aggregate score of one category / domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub id: String,
    pub title: String,
    pub sum: i64,
    /// Maximum achievable sum, when the unit has a defined ceiling.
    pub max_possible: Option<i64>,
}

/// Aggregate score of a circle, with its sub-category breakdown.
///
/// `sum` always equals the sum of `sub_scores` sums; both levels are
/// queryable independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleScore {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub sum: i64,
    pub max_possible: i64,
    pub sub_scores: Vec<CategoryScore>,
}

/// Aggregates of one style in `effectiveness` mode: how often the style
/// was chosen, and the signed quality of those choices. Two independent
/// accumulators, not one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleTally {
    pub id: String,
    pub title: String,
    pub count: u32,
    pub effectiveness: i64,
}

/// Overall-total result for `sum` quizzes that define one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallResult {
    pub total: i64,
    /// `total * multiplier`, on the content's display scale.
    pub percentage: f64,
    pub range_title: Option<String>,
    pub range_description: Option<String>,
}

/// Computed scores, shaped by the quiz's scoring mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Scores {
    Sum {
        categories: Vec<CategoryScore>,
        overall: Option<OverallResult>,
    },
    YesCount {
        categories: Vec<CategoryScore>,
        denominator: u32,
    },
    Circles {
        circles: Vec<CircleScore>,
    },
    Effectiveness {
        styles: Vec<StyleTally>,
    },
    DomainCount {
        domains: Vec<CategoryScore>,
    },
}

/// Compute aggregate scores for the current answer sheet.
pub fn score(quiz: &Quiz, answers: &AnswerSheet) -> Scores {
    match &quiz.scoring {
        ScoringModel::Sum(model) => {
            let categories: Vec<CategoryScore> = model
                .categories
                .iter()
                .map(|category| CategoryScore {
                    id: category.id.clone(),
                    title: category.title.clone(),
                    sum: sum_answers(answers, &category.questions),
                    max_possible: Some(
                        category.questions.len() as i64 * i64::from(model.scale.max),
                    ),
                })
                .collect();

            let overall = model.overall.as_ref().map(|overall| {
                let total: i64 = categories.iter().map(|c| c.sum).sum();
                let percentage = total as f64 * overall.multiplier;
                let range = overall.find_range(percentage);
                OverallResult {
                    total,
                    percentage,
                    range_title: range.map(|r| r.title.clone()),
                    range_description: range.map(|r| r.description.clone()),
                }
            });

            Scores::Sum { categories, overall }
        }

        ScoringModel::YesCount(model) => {
            let categories = model
                .categories
                .iter()
                .map(|category| {
                    let yes_count = category
                        .questions
                        .iter()
                        .filter(|&&q| answers.for_question(q).is_some_and(|a| a.is_yes()))
                        .count() as i64;
                    CategoryScore {
                        id: category.id.clone(),
                        title: category.title.clone(),
                        sum: yes_count,
                        max_possible: Some(i64::from(model.denominator)),
                    }
                })
                .collect();
            Scores::YesCount {
                categories,
                denominator: model.denominator,
            }
        }

        ScoringModel::Circles(model) => {
            let circles = model
                .circles
                .iter()
                .map(|circle| {
                    let sub_scores: Vec<CategoryScore> = circle
                        .sub_categories
                        .iter()
                        .map(|sub| CategoryScore {
                            id: sub.id.clone(),
                            title: sub.title.clone(),
                            sum: sum_answers(answers, &sub.questions),
                            max_possible: Some(
                                sub.questions.len() as i64 * i64::from(model.scale.max),
                            ),
                        })
                        .collect();
                    // Circle sum is defined as the sum of its sub-category sums.
                    let sum = sub_scores.iter().map(|s| s.sum).sum();
                    let max_possible =
                        circle.question_ids().count() as i64 * i64::from(model.scale.max);
                    CircleScore {
                        id: circle.id.clone(),
                        title: circle.title.clone(),
                        subtitle: circle.subtitle.clone(),
                        sum,
                        max_possible,
                        sub_scores,
                    }
                })
                .collect();
            Scores::Circles { circles }
        }

        ScoringModel::Effectiveness(model) => {
            let mut styles: Vec<StyleTally> = model
                .styles
                .iter()
                .map(|style| StyleTally {
                    id: style.id.clone(),
                    title: style.title.clone(),
                    count: 0,
                    effectiveness: 0,
                })
                .collect();

            for (index, question) in quiz.questions.iter().enumerate() {
                let Prompt::Scenario { options, .. } = &question.prompt else {
                    continue;
                };
                let Some(chosen) = answers.get(index).and_then(|a| a.choice()) else {
                    continue;
                };
                let Some(option) = options.iter().find(|o| o.id == chosen) else {
                    continue;
                };
                if let Some(tally) = styles.iter_mut().find(|t| t.id == option.style) {
                    tally.count += 1;
                    tally.effectiveness += option.score;
                }
            }

            Scores::Effectiveness { styles }
        }

        ScoringModel::DomainCount(model) => {
            let domains = model
                .domains
                .iter()
                .map(|domain| {
                    let count = (0..answers.len())
                        .filter(|&i| {
                            answers.get(i).and_then(|a| a.choice()) == Some(domain.id.as_str())
                        })
                        .count() as i64;
                    CategoryScore {
                        id: domain.id.clone(),
                        title: domain.title.clone(),
                        sum: count,
                        max_possible: None,
                    }
                })
                .collect();
            Scores::DomainCount { domains }
        }
    }
}

/// Sum the scale answers at the given 1-based question ids, with unset
/// slots contributing zero.
fn sum_answers(answers: &AnswerSheet, question_ids: &[u32]) -> i64 {
    question_ids
        .iter()
        .filter_map(|&q| answers.for_question(q))
        .filter_map(|a| a.scale_value())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::Answer;
    use crate::content::*;

    fn base_quiz(questions: Vec<Question>, scoring: ScoringModel) -> Quiz {
        Quiz {
            meta: QuizMeta {
                id: "test".into(),
                title: "שאלון".into(),
                ..Default::default()
            },
            questions,
            scoring,
            ui: UiStrings {
                question_of: "{current}/{total}".into(),
                next: "הבא".into(),
                prev: "הקודם".into(),
                finish: "סיום".into(),
                back_to_intro: "חזרה".into(),
                ..Default::default()
            },
            results: ResultsStrings::default(),
            export: ExportStrings {
                title: "תוצאות".into(),
                scores_heading: "ציונים".into(),
                ..Default::default()
            },
            analysis: None,
        }
    }

    fn statements(count: u32) -> Vec<Question> {
        (1..=count)
            .map(|id| Question {
                id,
                prompt: Prompt::Statement {
                    text: format!("היגד {id}"),
                },
            })
            .collect()
    }

    fn yes_no_questions(count: u32) -> Vec<Question> {
        (1..=count)
            .map(|id| Question {
                id,
                prompt: Prompt::YesNo {
                    text: format!("היגד {id}"),
                },
            })
            .collect()
    }

    fn sum_quiz(categories: Vec<Category>, question_count: u32) -> Quiz {
        base_quiz(
            statements(question_count),
            ScoringModel::Sum(SumScoring {
                scale: ScaleRange { min: 1, max: 5 },
                categories,
                low_threshold: None,
                overall: None,
            }),
        )
    }

    fn category(id: &str, questions: Vec<u32>) -> Category {
        Category {
            id: id.into(),
            title: id.into(),
            questions,
            ..Default::default()
        }
    }

    #[test]
    fn single_category_all_fives_sums_25() {
        let quiz = sum_quiz(vec![category("all", vec![1, 2, 3, 4, 5])], 5);
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for i in 0..5 {
            answers.set(i, Answer::Scale(5));
        }

        let Scores::Sum { categories, .. } = score(&quiz, &answers) else {
            panic!("expected sum scores");
        };
        assert_eq!(categories[0].sum, 25);
        assert_eq!(categories[0].max_possible, Some(25));
    }

    #[test]
    fn unanswered_slots_count_as_zero() {
        let quiz = sum_quiz(vec![category("all", vec![1, 2, 3])], 3);
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Scale(4));
        // questions 2 and 3 left unanswered

        let Scores::Sum { categories, .. } = score(&quiz, &answers) else {
            panic!("expected sum scores");
        };
        assert_eq!(categories[0].sum, 4);
    }

    #[test]
    fn sum_invariant_per_category() {
        let quiz = sum_quiz(
            vec![category("a", vec![1, 3]), category("b", vec![2, 4])],
            4,
        );
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for (i, v) in [2u8, 5, 3, 1].iter().enumerate() {
            answers.set(i, Answer::Scale(*v));
        }

        let Scores::Sum { categories, .. } = score(&quiz, &answers) else {
            panic!("expected sum scores");
        };
        assert_eq!(categories[0].sum, 2 + 3);
        assert_eq!(categories[1].sum, 5 + 1);
    }

    #[test]
    fn scoring_is_idempotent() {
        let quiz = sum_quiz(vec![category("all", vec![1, 2, 3])], 3);
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Scale(2));
        answers.set(1, Answer::Scale(3));

        let first = score(&quiz, &answers);
        let second = score(&quiz, &answers);
        assert_eq!(first, second);
    }

    #[test]
    fn overall_percentage_and_range() {
        let mut quiz = sum_quiz(vec![category("all", vec![1, 2])], 2);
        if let ScoringModel::Sum(model) = &mut quiz.scoring {
            model.overall = Some(OverallScoring {
                multiplier: 10.0,
                ranges: vec![
                    ScoreRange {
                        min: 0,
                        max: 50,
                        title: "נמוך".into(),
                        description: String::new(),
                    },
                    ScoreRange {
                        min: 51,
                        max: 100,
                        title: "גבוה".into(),
                        description: String::new(),
                    },
                ],
            });
        }
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Scale(4));
        answers.set(1, Answer::Scale(4));

        let Scores::Sum { overall, .. } = score(&quiz, &answers) else {
            panic!("expected sum scores");
        };
        let overall = overall.unwrap();
        assert_eq!(overall.total, 8);
        assert_eq!(overall.percentage, 80.0);
        assert_eq!(overall.range_title.as_deref(), Some("גבוה"));
    }

    #[test]
    fn yes_count_matches_category_subset_only() {
        let quiz = base_quiz(
            yes_no_questions(5),
            ScoringModel::YesCount(YesCountScoring {
                denominator: 3,
                categories: vec![category("style", vec![1, 3, 5])],
            }),
        );
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for (i, yes) in [true, false, true, false, true].iter().enumerate() {
            answers.set(i, Answer::YesNo(*yes));
        }

        let Scores::YesCount {
            categories,
            denominator,
        } = score(&quiz, &answers)
        else {
            panic!("expected yes-count scores");
        };
        // All three of the category's ids (1, 3, 5) were answered yes; the
        // "no" answers at 2 and 4 are outside the category and irrelevant.
        assert_eq!(categories[0].sum, 3);
        assert_eq!(denominator, 3);
    }

    #[test]
    fn yes_count_ignores_no_answers_within_subset() {
        let quiz = base_quiz(
            yes_no_questions(4),
            ScoringModel::YesCount(YesCountScoring {
                denominator: 4,
                categories: vec![category("style", vec![1, 2, 3, 4])],
            }),
        );
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::YesNo(true));
        answers.set(1, Answer::YesNo(false));
        answers.set(2, Answer::YesNo(true));
        // question 4 unanswered

        let Scores::YesCount { categories, .. } = score(&quiz, &answers) else {
            panic!("expected yes-count scores");
        };
        assert_eq!(categories[0].sum, 2);
    }

    #[test]
    fn circle_sum_equals_sum_of_sub_sums() {
        let quiz = base_quiz(
            statements(4),
            ScoringModel::Circles(CircleScoring {
                scale: ScaleRange { min: 1, max: 3 },
                circles: vec![Circle {
                    id: "self".into(),
                    title: "עצמי".into(),
                    subtitle: None,
                    sub_categories: vec![
                        SubCategory {
                            id: "a".into(),
                            title: "א".into(),
                            questions: vec![1, 2],
                            ..Default::default()
                        },
                        SubCategory {
                            id: "b".into(),
                            title: "ב".into(),
                            questions: vec![3, 4],
                            ..Default::default()
                        },
                    ],
                }],
            }),
        );
        let mut answers = AnswerSheet::for_quiz(&quiz);
        for (i, v) in [3u8, 2, 1, 3].iter().enumerate() {
            answers.set(i, Answer::Scale(*v));
        }

        let Scores::Circles { circles } = score(&quiz, &answers) else {
            panic!("expected circle scores");
        };
        let circle = &circles[0];
        assert_eq!(circle.sub_scores[0].sum, 5);
        assert_eq!(circle.sub_scores[1].sum, 4);
        assert_eq!(circle.sum, 9);
        assert_eq!(
            circle.sum,
            circle.sub_scores.iter().map(|s| s.sum).sum::<i64>()
        );
        assert_eq!(circle.max_possible, 12);
        assert_eq!(circle.sub_scores[0].max_possible, Some(6));
    }

    fn scenario(id: u32, options: Vec<(&str, &str, i64)>) -> Question {
        Question {
            id,
            prompt: Prompt::Scenario {
                scenario: format!("תרחיש {id}"),
                options: options
                    .into_iter()
                    .map(|(opt, style, delta)| ScenarioOption {
                        id: opt.into(),
                        text: String::new(),
                        style: style.into(),
                        score: delta,
                    })
                    .collect(),
            },
        }
    }

    fn style(id: &str) -> Style {
        Style {
            id: id.into(),
            title: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn effectiveness_keeps_two_independent_accumulators() {
        let quiz = base_quiz(
            vec![
                scenario(1, vec![("a", "directing", 2), ("b", "coaching", -1)]),
                scenario(2, vec![("a", "directing", -2), ("b", "coaching", 1)]),
                scenario(3, vec![("a", "directing", 1), ("b", "coaching", 2)]),
            ],
            ScoringModel::Effectiveness(EffectivenessScoring {
                styles: vec![style("directing"), style("coaching")],
            }),
        );
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Choice("a".into())); // directing +2
        answers.set(1, Answer::Choice("a".into())); // directing -2
        answers.set(2, Answer::Choice("b".into())); // coaching +2

        let Scores::Effectiveness { styles } = score(&quiz, &answers) else {
            panic!("expected effectiveness scores");
        };
        let directing = styles.iter().find(|s| s.id == "directing").unwrap();
        let coaching = styles.iter().find(|s| s.id == "coaching").unwrap();

        // Chosen twice but the deltas cancel: count and effectiveness move
        // independently.
        assert_eq!(directing.count, 2);
        assert_eq!(directing.effectiveness, 0);
        assert_eq!(coaching.count, 1);
        assert_eq!(coaching.effectiveness, 2);
    }

    #[test]
    fn effectiveness_skips_unanswered_scenarios() {
        let quiz = base_quiz(
            vec![
                scenario(1, vec![("a", "directing", 2)]),
                scenario(2, vec![("a", "directing", 1)]),
            ],
            ScoringModel::Effectiveness(EffectivenessScoring {
                styles: vec![style("directing")],
            }),
        );
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Choice("a".into()));

        let Scores::Effectiveness { styles } = score(&quiz, &answers) else {
            panic!("expected effectiveness scores");
        };
        assert_eq!(styles[0].count, 1);
        assert_eq!(styles[0].effectiveness, 2);
    }

    #[test]
    fn domain_count_tallies_choices_across_sheet() {
        let questions: Vec<Question> = (1..=4)
            .map(|id| Question {
                id,
                prompt: Prompt::Choice {
                    text: format!("שאלה {id}"),
                    options: vec![
                        ChoiceOption {
                            id: "people".into(),
                            text: String::new(),
                        },
                        ChoiceOption {
                            id: "process".into(),
                            text: String::new(),
                        },
                    ],
                },
            })
            .collect();
        let quiz = base_quiz(
            questions,
            ScoringModel::DomainCount(DomainScoring {
                domains: vec![
                    Domain {
                        id: "people".into(),
                        title: "אנשים".into(),
                        ..Default::default()
                    },
                    Domain {
                        id: "process".into(),
                        title: "תהליך".into(),
                        ..Default::default()
                    },
                ],
            }),
        );
        let mut answers = AnswerSheet::for_quiz(&quiz);
        answers.set(0, Answer::Choice("people".into()));
        answers.set(1, Answer::Choice("people".into()));
        answers.set(2, Answer::Choice("process".into()));
        // question 4 unanswered

        let Scores::DomainCount { domains } = score(&quiz, &answers) else {
            panic!("expected domain counts");
        };
        assert_eq!(domains[0].sum, 2);
        assert_eq!(domains[1].sum, 1);
    }
}
