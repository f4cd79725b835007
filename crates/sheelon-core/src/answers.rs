//! The answer sheet: an ordered, fixed-length store of per-question answers.
//!
//! One slot per question, indexed by `question.id - 1`. Slots start unset,
//! are mutated in place as the user answers, and are reset wholesale on
//! restart. Unset slots are legal input to the scoring engine (they count
//! as zero), which is what makes mid-quiz preview scoring possible.

use serde::{Deserialize, Serialize};

use crate::content::{Prompt, Quiz};
use crate::error::ContentError;

/// A single answer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Likert scale value (1..=5 or 1..=3 depending on the quiz).
    Scale(u8),
    /// Yes/no answer.
    YesNo(bool),
    /// Option letter or domain id.
    Choice(String),
}

impl Answer {
    /// Numeric value for sum scoring; non-scale answers contribute nothing.
    pub fn scale_value(&self) -> Option<i64> {
        match self {
            Answer::Scale(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Answer::YesNo(true))
    }

    pub fn choice(&self) -> Option<&str> {
        match self {
            Answer::Choice(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

/// The ordered answer store. Slot count always equals the question count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSheet {
    slots: Vec<Option<Answer>>,
}

impl AnswerSheet {
    /// Create an all-unset sheet with one slot per question.
    pub fn new(question_count: usize) -> Self {
        Self {
            slots: vec![None; question_count],
        }
    }

    /// Sheet sized for the given quiz.
    pub fn for_quiz(quiz: &Quiz) -> Self {
        Self::new(quiz.question_count())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Answer at a 0-based index, if set.
    pub fn get(&self, index: usize) -> Option<&Answer> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Answer for a 1-based question id, if set. Ids outside the sheet
    /// read as unanswered, the permissive policy scoring relies on.
    pub fn for_question(&self, question_id: u32) -> Option<&Answer> {
        self.get(question_id as usize - 1)
    }

    /// Set the answer at a 0-based index.
    ///
    /// The index is bounded by construction (sessions only hand out
    /// in-range indices); an out-of-range index is a caller bug.
    pub fn set(&mut self, index: usize, answer: Answer) {
        self.slots[index] = Some(answer);
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    pub fn first_unanswered(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Reset every slot to unset.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Build a sheet from raw JSON values (one per question): integers for
    /// scale answers, `"yes"`/`"no"`, option/domain id strings, or `null`.
    pub fn from_values(quiz: &Quiz, values: &[serde_json::Value]) -> Result<Self, ContentError> {
        if values.len() != quiz.question_count() {
            return Err(ContentError::AnswerCount {
                expected: quiz.question_count(),
                actual: values.len(),
            });
        }

        let mut sheet = Self::for_quiz(quiz);
        for (index, value) in values.iter().enumerate() {
            if value.is_null() {
                continue;
            }
            let answer = convert_value(quiz, index, value)?;
            sheet.set(index, answer);
        }
        Ok(sheet)
    }
}

fn convert_value(
    quiz: &Quiz,
    index: usize,
    value: &serde_json::Value,
) -> Result<Answer, ContentError> {
    let invalid = |reason: String| ContentError::InvalidAnswer { index, reason };

    match &quiz.questions[index].prompt {
        Prompt::Statement { .. } | Prompt::Paired { .. } => {
            let scale = quiz
                .scale()
                .ok_or_else(|| invalid("quiz has no answer scale".into()))?;
            let n = value
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| invalid(format!("expected an integer, got {value}")))?;
            if !scale.contains(n) {
                return Err(invalid(format!(
                    "{n} is outside the {}..={} scale",
                    scale.min, scale.max
                )));
            }
            Ok(Answer::Scale(n))
        }
        Prompt::YesNo { .. } => match value.as_str() {
            Some("yes") => Ok(Answer::YesNo(true)),
            Some("no") => Ok(Answer::YesNo(false)),
            _ => Err(invalid(format!("expected \"yes\" or \"no\", got {value}"))),
        },
        Prompt::Scenario { options, .. } => {
            let id = value
                .as_str()
                .ok_or_else(|| invalid(format!("expected an option letter, got {value}")))?;
            if !options.iter().any(|o| o.id == id) {
                return Err(invalid(format!("\"{id}\" is not an option of this scenario")));
            }
            Ok(Answer::Choice(id.to_string()))
        }
        Prompt::Choice { options, .. } => {
            let id = value
                .as_str()
                .ok_or_else(|| invalid(format!("expected a domain id, got {value}")))?;
            if !options.iter().any(|o| o.id == id) {
                return Err(invalid(format!("\"{id}\" is not an option of this question")));
            }
            Ok(Answer::Choice(id.to_string()))
        }
    }
}

/// Fill every slot with a legal answer for the quiz, from a deterministic
/// seeded generator. This is the preview action behind "fill random then
/// show results"; same seed, same sheet.
pub fn fill_random(quiz: &Quiz, sheet: &mut AnswerSheet, seed: u64) {
    let mut state = seed.max(1);
    let mut next = move || {
        // xorshift64; same seed, same sheet.
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    for (index, question) in quiz.questions.iter().enumerate() {
        let answer = match &question.prompt {
            Prompt::Statement { .. } | Prompt::Paired { .. } => {
                let scale = quiz.scale().copied().unwrap_or(crate::content::ScaleRange {
                    min: 1,
                    max: 5,
                });
                Answer::Scale(scale.min + (next() % u64::from(scale.span())) as u8)
            }
            Prompt::YesNo { .. } => Answer::YesNo(next() % 2 == 0),
            Prompt::Scenario { options, .. } => {
                Answer::Choice(options[(next() % options.len() as u64) as usize].id.clone())
            }
            Prompt::Choice { options, .. } => {
                Answer::Choice(options[(next() % options.len() as u64) as usize].id.clone())
            }
        };
        sheet.set(index, answer);
    }
}
