//! The quiz session: navigation state machine plus owned answer state.
//!
//! One session per quiz instance. The session owns the loaded content and
//! the answer sheet, so multiple quizzes can run side by side and tests
//! can drive the machine directly. The machine is cyclic: there is no
//! terminal screen; restart always returns to the intro with a cleared
//! sheet.

use crate::answers::{Answer, AnswerSheet};
use crate::content::{Question, Quiz};
use crate::error::NavError;
use crate::report::QuizReport;

/// The current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intro,
    /// Showing the question at this 0-based index.
    Question(usize),
    Results,
    Analysis,
    Details,
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::Intro => "intro",
            Screen::Question(_) => "question",
            Screen::Results => "results",
            Screen::Analysis => "analysis",
            Screen::Details => "details",
        }
    }
}

/// Navigation button labels for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLabels<'a> {
    /// "Back to intro" on the first question, "previous" otherwise.
    pub prev: &'a str,
    /// "Finish" on the last question, "next" otherwise.
    pub next: &'a str,
}

/// A running quiz instance.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: AnswerSheet,
    screen: Screen,
    /// Where `back_to_questions` returns to.
    last_question: usize,
}

impl QuizSession {
    /// Start a session on the intro screen with an all-unset sheet.
    pub fn new(quiz: Quiz) -> Self {
        let answers = AnswerSheet::for_quiz(&quiz);
        Self {
            quiz,
            answers,
            screen: Screen::Intro,
            last_question: 0,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// Mutable access for preview fills; scoring always reads the live
    /// sheet, so edits here are picked up by the next render.
    pub fn answers_mut(&mut self) -> &mut AnswerSheet {
        &mut self.answers
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The question being shown, when on a question screen.
    pub fn current_question(&self) -> Option<&Question> {
        match self.screen {
            Screen::Question(index) => self.quiz.questions.get(index),
            _ => None,
        }
    }

    /// Progress through the questions, as a 0–100 percentage.
    pub fn progress_percent(&self) -> f64 {
        match self.screen {
            Screen::Question(index) => {
                (index + 1) as f64 / self.quiz.question_count() as f64 * 100.0
            }
            _ => 0.0,
        }
    }

    /// Progress label text ("question N of M") for the current question.
    pub fn progress_text(&self) -> Option<String> {
        match self.screen {
            Screen::Question(index) => Some(
                self.quiz
                    .ui
                    .progress_text(index, self.quiz.question_count()),
            ),
            _ => None,
        }
    }

    /// Navigation labels for the current question screen.
    pub fn nav_labels(&self) -> Option<NavLabels<'_>> {
        let Screen::Question(index) = self.screen else {
            return None;
        };
        let ui = &self.quiz.ui;
        Some(NavLabels {
            prev: if index == 0 {
                &ui.back_to_intro
            } else {
                &ui.prev
            },
            next: if index + 1 == self.quiz.question_count() {
                &ui.finish
            } else {
                &ui.next
            },
        })
    }

    /// Whether `next` would currently be accepted.
    pub fn can_advance(&self) -> bool {
        matches!(self.screen, Screen::Question(index) if self.answers.is_answered(index))
    }

    /// Intro → first question.
    pub fn start(&mut self) -> Result<Screen, NavError> {
        self.expect(Screen::Intro, "start")?;
        self.goto_question(0);
        Ok(self.screen)
    }

    /// Record an answer for the question being shown.
    pub fn answer_current(&mut self, answer: Answer) -> Result<(), NavError> {
        let Screen::Question(index) = self.screen else {
            return Err(NavError::WrongScreen {
                transition: "answer",
                screen: self.screen.name(),
            });
        };
        self.answers.set(index, answer);
        Ok(())
    }

    /// Advance: next question, or the results screen from the last one.
    ///
    /// Guarded: rejected while the current question is unanswered, before
    /// any state changes. This is the only thing standing between the user
    /// and a skipped question, so it runs on the stored sheet, not on UI
    /// state.
    pub fn next(&mut self) -> Result<Screen, NavError> {
        let Screen::Question(index) = self.screen else {
            return Err(NavError::WrongScreen {
                transition: "next",
                screen: self.screen.name(),
            });
        };
        if !self.answers.is_answered(index) {
            return Err(NavError::Unanswered(index as u32 + 1));
        }
        if index + 1 < self.quiz.question_count() {
            self.goto_question(index + 1);
        } else {
            self.screen = Screen::Results;
        }
        Ok(self.screen)
    }

    /// Go back: previous question, or the intro from the first. Never
    /// guarded.
    pub fn prev(&mut self) -> Result<Screen, NavError> {
        let Screen::Question(index) = self.screen else {
            return Err(NavError::WrongScreen {
                transition: "prev",
                screen: self.screen.name(),
            });
        };
        if index == 0 {
            self.screen = Screen::Intro;
        } else {
            self.goto_question(index - 1);
        }
        Ok(self.screen)
    }

    /// Any screen → intro, with the answer sheet reset to all-unset.
    pub fn restart(&mut self) {
        self.answers.reset();
        self.last_question = 0;
        self.screen = Screen::Intro;
    }

    /// Results → analysis.
    pub fn to_analysis(&mut self) -> Result<Screen, NavError> {
        self.expect(Screen::Results, "to_analysis")?;
        self.screen = Screen::Analysis;
        Ok(self.screen)
    }

    /// Results → details.
    pub fn to_details(&mut self) -> Result<Screen, NavError> {
        self.expect(Screen::Results, "to_details")?;
        self.screen = Screen::Details;
        Ok(self.screen)
    }

    /// Analysis/details → results. Answers untouched; the caller re-renders
    /// from a fresh report.
    pub fn back_to_results(&mut self) -> Result<Screen, NavError> {
        match self.screen {
            Screen::Analysis | Screen::Details => {
                self.screen = Screen::Results;
                Ok(self.screen)
            }
            other => Err(NavError::WrongScreen {
                transition: "back_to_results",
                screen: other.name(),
            }),
        }
    }

    /// Results/analysis/details → the last visited question.
    pub fn back_to_questions(&mut self) -> Result<Screen, NavError> {
        match self.screen {
            Screen::Results | Screen::Analysis | Screen::Details => {
                self.goto_question(self.last_question);
                Ok(self.screen)
            }
            other => Err(NavError::WrongScreen {
                transition: "back_to_questions",
                screen: other.name(),
            }),
        }
    }

    /// Fill every answer from a seeded generator, the preview action
    /// behind "fill random then show results".
    pub fn fill_random(&mut self, seed: u64) {
        crate::answers::fill_random(&self.quiz, &mut self.answers, seed);
    }

    /// Assemble a fresh report from the live answer sheet. Nothing is
    /// cached; every call recomputes scores and ranking.
    pub fn report(&self) -> QuizReport {
        QuizReport::assemble(&self.quiz, &self.answers)
    }

    fn goto_question(&mut self, index: usize) {
        self.last_question = index;
        self.screen = Screen::Question(index);
    }

    fn expect(&self, screen: Screen, transition: &'static str) -> Result<(), NavError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(NavError::WrongScreen {
                transition,
                screen: self.screen.name(),
            })
        }
    }
}
