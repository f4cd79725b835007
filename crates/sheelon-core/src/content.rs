//! Core content model types for sheelon.
//!
//! These are the fundamental types representing a loaded quiz: the ordered
//! question list, the scoring model, and the Hebrew string blocks that the
//! renderers draw from. Content is loaded once and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete quiz content file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Quiz metadata.
    pub meta: QuizMeta,
    /// Ordered questions. `id` is 1-based and must match array position.
    pub questions: Vec<Question>,
    /// The scoring model, selected by the `mode` discriminant.
    pub scoring: ScoringModel,
    /// UI label strings (navigation, progress).
    pub ui: UiStrings,
    /// Results-screen narrative strings.
    #[serde(default)]
    pub results: ResultsStrings,
    /// Section headings and labels for the exported report.
    pub export: ExportStrings,
    /// Optional analysis-screen strings (reflection questions).
    #[serde(default)]
    pub analysis: Option<AnalysisStrings>,
}

impl Quiz {
    /// Number of questions in this quiz.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The answer scale for scale-rated quizzes (`sum` / `circles` modes).
    pub fn scale(&self) -> Option<&ScaleRange> {
        match &self.scoring {
            ScoringModel::Sum(s) => Some(&s.scale),
            ScoringModel::Circles(c) => Some(&c.scale),
            _ => None,
        }
    }
}

/// Quiz metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuizMeta {
    /// Unique identifier for this quiz.
    pub id: String,
    /// Human-readable quiz title.
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A single question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 1-based identifier; must equal array position + 1.
    pub id: u32,
    /// The prompt shown for this question.
    #[serde(flatten)]
    pub prompt: Prompt,
}

/// Question prompt variants across the quiz family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// A single statement rated on the quiz's scale.
    Statement { text: String },
    /// Two opposed statements (semantic differential).
    Paired { left: String, right: String },
    /// A scenario with lettered options, each mapping into a style.
    Scenario {
        scenario: String,
        options: Vec<ScenarioOption>,
    },
    /// A yes/no statement.
    YesNo { text: String },
    /// A multiple-choice question whose options name domains directly.
    Choice {
        text: String,
        options: Vec<ChoiceOption>,
    },
}

/// An option of a scenario question, with its per-question mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOption {
    /// Option letter (e.g. "a").
    pub id: String,
    /// Option text.
    pub text: String,
    /// The style this option maps to.
    pub style: String,
    /// Signed effectiveness delta contributed when chosen.
    pub score: i64,
}

/// An option of a domain-choice question. `id` is the domain id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Scoring model
// ---------------------------------------------------------------------------

/// The scoring model: one variant per quiz family, selected by `mode`.
///
/// The scoring engine, ranking selector, and renderers dispatch on this tag
/// rather than being hard-coded to one aggregation-unit shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScoringModel {
    /// Likert sums per category (optionally with an overall percentage).
    Sum(SumScoring),
    /// Count of `yes` answers among each category's question ids.
    YesCount(YesCountScoring),
    /// Two-level sums: circles partitioned into sub-categories.
    Circles(CircleScoring),
    /// Situational mapping: per style, a choice count plus a signed
    /// effectiveness accumulator.
    Effectiveness(EffectivenessScoring),
    /// Count of answers naming each domain directly.
    DomainCount(DomainScoring),
}

impl ScoringModel {
    /// Short mode name, matching the serialized discriminant.
    pub fn mode_name(&self) -> &'static str {
        match self {
            ScoringModel::Sum(_) => "sum",
            ScoringModel::YesCount(_) => "yes_count",
            ScoringModel::Circles(_) => "circles",
            ScoringModel::Effectiveness(_) => "effectiveness",
            ScoringModel::DomainCount(_) => "domain_count",
        }
    }
}

impl fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode_name())
    }
}

/// Inclusive answer scale for scale-rated questions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: u8,
    pub max: u8,
}

impl ScaleRange {
    /// Whether `value` lies on this scale.
    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Number of points on the scale.
    pub fn span(&self) -> u8 {
        self.max - self.min + 1
    }
}

/// Configuration for `sum` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SumScoring {
    pub scale: ScaleRange,
    pub categories: Vec<Category>,
    /// Every category summing strictly below this selects the
    /// low-scores narrative instead of naming a dominant category.
    #[serde(default)]
    pub low_threshold: Option<i64>,
    /// Optional overall total with content-supplied interpretation ranges.
    #[serde(default)]
    pub overall: Option<OverallScoring>,
}

impl SumScoring {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// Overall-total scoring: raw total × multiplier, matched against
/// content-supplied ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallScoring {
    /// Converts the raw total to the display scale (e.g. to 0–100).
    pub multiplier: f64,
    #[serde(default)]
    pub ranges: Vec<ScoreRange>,
}

impl OverallScoring {
    /// Find the range containing `percentage`, falling back to the last
    /// range when none matches.
    pub fn find_range(&self, percentage: f64) -> Option<&ScoreRange> {
        self.ranges
            .iter()
            .find(|r| percentage >= r.min as f64 && percentage <= r.max as f64)
            .or_else(|| self.ranges.last())
    }
}

/// A content-supplied interpretation range for an overall percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Configuration for `yes_count` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YesCountScoring {
    /// Display denominator for `score/denominator` rendering. Supplied by
    /// content; a category whose question list length differs from it is
    /// flagged by validation, never silently assumed.
    pub denominator: u32,
    pub categories: Vec<Category>,
}

impl YesCountScoring {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// Configuration for `circles` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleScoring {
    pub scale: ScaleRange,
    pub circles: Vec<Circle>,
}

/// Configuration for `effectiveness` mode. The per-question option
/// mappings live on the scenario questions themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivenessScoring {
    pub styles: Vec<Style>,
}

impl EffectivenessScoring {
    pub fn style(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }
}

/// Configuration for `domain_count` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScoring {
    pub domains: Vec<Domain>,
}

// ---------------------------------------------------------------------------
// Aggregation units
// ---------------------------------------------------------------------------

/// A category: a named grouping of question ids that aggregate together.
///
/// Used by both `sum` and `yes_count` modes. `score_range` and
/// `interpretation` are present on quizzes with banded narratives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub short_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 1-based question ids belonging to this category.
    pub questions: Vec<u32>,
    /// `[min, max]` possible score range for band interpretation.
    #[serde(default)]
    pub score_range: Option<(i64, i64)>,
    #[serde(default)]
    pub interpretation: Option<Interpretation>,
    /// Characteristic traits listed in the dominant-style details.
    #[serde(default)]
    pub traits: Vec<String>,
}

/// Three narrative texts, one per score band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpretation {
    pub low: String,
    pub medium: String,
    pub high: String,
}

/// A circle: a category partitioned into sub-categories. The circle
/// aggregate is the sum of its sub-category aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub sub_categories: Vec<SubCategory>,
}

impl Circle {
    /// All question ids of this circle, across its sub-categories.
    pub fn question_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.sub_categories
            .iter()
            .flat_map(|sub| sub.questions.iter().copied())
    }
}

/// A sub-category of a circle, with its own question-id subset.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SubCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<u32>,
}

/// A leadership style (situational variant).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Style {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Narrative shown when the style's effectiveness is non-negative.
    #[serde(default)]
    pub effective: Option<String>,
    /// Narrative shown when the style's effectiveness is negative.
    #[serde(default)]
    pub ineffective: Option<String>,
}

/// A domain (domain-tag variant).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Domain {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
}

// ---------------------------------------------------------------------------
// String blocks
// ---------------------------------------------------------------------------

/// Navigation and progress label strings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiStrings {
    /// Progress template with `{current}` / `{total}` placeholders.
    pub question_of: String,
    pub next: String,
    pub prev: String,
    /// "Next" label on the last question.
    pub finish: String,
    /// "Previous" label on the first question.
    pub back_to_intro: String,
    #[serde(default)]
    pub yes: Option<String>,
    #[serde(default)]
    pub no: Option<String>,
}

impl UiStrings {
    /// Progress text for the question at `index` (0-based) of `total`.
    pub fn progress_text(&self, index: usize, total: usize) -> String {
        self.question_of
            .replace("{current}", &(index + 1).to_string())
            .replace("{total}", &total.to_string())
    }
}

/// Results-screen narrative strings. All optional; quizzes use the
/// subset their results view needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsStrings {
    /// Context paragraph quoted at the top of results and exports.
    #[serde(default)]
    pub model_context: Option<String>,
    /// Heading of the all-low narrative branch.
    #[serde(default)]
    pub low_scores: Option<String>,
    #[serde(default)]
    pub low_scores_action: Option<String>,
    #[serde(default)]
    pub worth_it: Option<String>,
    #[serde(default)]
    pub interpretation_title: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub action_plan: Option<String>,
    /// Shown when every style ties on count.
    #[serde(default)]
    pub balanced_profile: Option<String>,
    #[serde(default)]
    pub effectiveness_labels: Option<EffectivenessLabels>,
}

/// Display labels for the three effectiveness bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivenessLabels {
    pub effective: String,
    pub adequate: String,
    pub ineffective: String,
}

/// Section headings and labels for the exported report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportStrings {
    /// Report title.
    pub title: String,
    /// Heading of the per-unit score list.
    pub scores_heading: String,
    #[serde(default)]
    pub dominant_heading: Option<String>,
    #[serde(default)]
    pub secondary_heading: Option<String>,
    #[serde(default)]
    pub development_heading: Option<String>,
    #[serde(default)]
    pub details_heading: Option<String>,
    #[serde(default)]
    pub total_heading: Option<String>,
    #[serde(default)]
    pub interpretation_heading: Option<String>,
    #[serde(default)]
    pub sub_scores_heading: Option<String>,
    /// Marker appended to dominant entries in the score list.
    #[serde(default)]
    pub dominant_marker: Option<String>,
    #[serde(default)]
    pub description_label: Option<String>,
    #[serde(default)]
    pub max_score_label: Option<String>,
    /// e.g. "מתוך 100" after an overall total.
    #[serde(default)]
    pub out_of_label: Option<String>,
    #[serde(default)]
    pub choices_label: Option<String>,
    #[serde(default)]
    pub effectiveness_label: Option<String>,
    #[serde(default)]
    pub traits_label: Option<String>,
    /// Column headers for the effectiveness table.
    #[serde(default)]
    pub table_headers: Option<TableHeaders>,
}

/// Column headers of the effectiveness-mode profile table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableHeaders {
    pub style: String,
    pub choices: String,
    pub effectiveness: String,
    pub interpretation: String,
}

/// Analysis-screen strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStrings {
    #[serde(default)]
    pub reflection_title: Option<String>,
    /// Appended verbatim to exported reports.
    #[serde(default)]
    pub reflection_questions: Vec<String>,
}
