//! Ranking and interpretation selection over computed scores.
//!
//! Every aggregation shape (category sums, yes counts, style choice
//! counts, domain counts) ranks through the same algorithm via the
//! `Scored` seam. The tie rules here are deliberate and must not be
//! "simplified": the dominant set is every unit at the maximum (multi-way
//! ties included), and the top-2 set extends past two entries whenever
//! later units tie the second-place value.

use serde::{Deserialize, Serialize};

use crate::content::{Category, EffectivenessLabels, Interpretation};
use crate::scoring::{CategoryScore, CircleScore, StyleTally};

/// A rankable aggregate: a unit id plus its comparison value.
pub trait Scored {
    fn unit_id(&self) -> &str;
    fn value(&self) -> i64;
}

impl Scored for CategoryScore {
    fn unit_id(&self) -> &str {
        &self.id
    }
    fn value(&self) -> i64 {
        self.sum
    }
}

impl Scored for CircleScore {
    fn unit_id(&self) -> &str {
        &self.id
    }
    fn value(&self) -> i64 {
        self.sum
    }
}

/// Styles rank by how often they were chosen; the effectiveness
/// accumulator never participates in dominance.
impl Scored for StyleTally {
    fn unit_id(&self) -> &str {
        &self.id
    }
    fn value(&self) -> i64 {
        i64::from(self.count)
    }
}

/// The derived ranking over a score set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking<T> {
    /// Descending by value; stable, so tied units keep content order.
    pub sorted: Vec<T>,
    /// Every unit whose value equals the maximum.
    pub dominant: Vec<T>,
    /// Top two, extended by any further units tying second place.
    pub top: Vec<T>,
    /// Whether first and second place tie.
    pub is_tie: bool,
    /// Every value is strictly below the content-supplied threshold.
    pub all_low: bool,
}

impl<T> Ranking<T> {
    /// Whether every unit ties for dominant (the balanced-profile case).
    pub fn is_balanced(&self) -> bool {
        !self.sorted.is_empty() && self.dominant.len() == self.sorted.len()
    }
}

/// Rank a score set. `low_threshold` enables the all-low branch; absent,
/// the ranking never reports all-low.
pub fn rank<T: Scored + Clone>(scores: &[T], low_threshold: Option<i64>) -> Ranking<T> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.value().cmp(&a.value()));

    let Some(first) = sorted.first() else {
        return Ranking {
            sorted,
            dominant: Vec::new(),
            top: Vec::new(),
            is_tie: false,
            all_low: false,
        };
    };

    let max = first.value();
    let dominant: Vec<T> = sorted.iter().filter(|s| s.value() == max).cloned().collect();

    let mut top: Vec<T> = sorted.iter().take(2).cloned().collect();
    if let Some(second) = sorted.get(1) {
        let second_value = second.value();
        top.extend(
            sorted
                .iter()
                .skip(2)
                .filter(|s| s.value() == second_value)
                .cloned(),
        );
    }

    let is_tie = sorted.get(1).is_some_and(|second| second.value() == max);
    let all_low =
        low_threshold.is_some_and(|threshold| sorted.iter().all(|s| s.value() < threshold));

    Ranking {
        sorted,
        dominant,
        top,
        is_tie,
        all_low,
    }
}

/// A third of a category's possible score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Medium,
    High,
}

impl Band {
    /// Band for `value` within `[min, max]`, split into equal thirds.
    ///
    /// Boundary values resolve to the lower band: the comparisons are
    /// `<= min + third` and `<= min + 2*third`. On `[0, 30]` a score of
    /// exactly 10 is Low and 11 is Medium.
    pub fn for_score(value: i64, range: (i64, i64)) -> Band {
        let (min, max) = range;
        let third = (max - min) as f64 / 3.0;
        let value = value as f64;
        if value <= min as f64 + third {
            Band::Low
        } else if value <= min as f64 + 2.0 * third {
            Band::Medium
        } else {
            Band::High
        }
    }

    /// Select the matching narrative from an interpretation block.
    pub fn text<'a>(&self, interpretation: &'a Interpretation) -> &'a str {
        match self {
            Band::Low => &interpretation.low,
            Band::Medium => &interpretation.medium,
            Band::High => &interpretation.high,
        }
    }
}

/// Band interpretation text for a category at the given sum, when the
/// category defines both a range and interpretation texts.
pub fn interpretation_for(category: &Category, sum: i64) -> Option<&str> {
    let range = category.score_range?;
    let texts = category.interpretation.as_ref()?;
    Some(Band::for_score(sum, range).text(texts))
}

/// Whether a category's sum falls in the bottom band of its range,
/// the development-areas filter.
pub fn is_development_area(category: &Category, sum: i64) -> bool {
    category
        .score_range
        .is_some_and(|range| Band::for_score(sum, range) == Band::Low)
}

/// Effectiveness verdict of a style's signed accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Effective,
    Adequate,
    Ineffective,
}

impl Verdict {
    /// `>= 1` effective, `<= -1` ineffective, zero adequate.
    pub fn for_effectiveness(effectiveness: i64) -> Verdict {
        if effectiveness >= 1 {
            Verdict::Effective
        } else if effectiveness <= -1 {
            Verdict::Ineffective
        } else {
            Verdict::Adequate
        }
    }

    /// Display label from the content's label block.
    pub fn label<'a>(&self, labels: &'a EffectivenessLabels) -> &'a str {
        match self {
            Verdict::Effective => &labels.effective,
            Verdict::Adequate => &labels.adequate,
            Verdict::Ineffective => &labels.ineffective,
        }
    }
}
