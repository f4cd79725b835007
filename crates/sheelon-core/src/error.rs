//! Engine error types.
//!
//! `ContentError` covers content loading, fatal for the quiz instance.
//! `NavError` covers rejected navigation transitions; it is the guard
//! mechanism, raised before any state is mutated.

use thiserror::Error;

/// Errors raised while loading quiz content or answer files.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The content file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The content file is not valid JSON or does not match the model.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// An answers file entry does not fit the quiz's answer domain.
    #[error("answer {index} is invalid for this quiz: {reason}")]
    InvalidAnswer { index: usize, reason: String },

    /// An answers file has the wrong number of entries.
    #[error("expected {expected} answers, got {actual}")]
    AnswerCount { expected: usize, actual: usize },
}

impl ContentError {
    /// Returns `true` for failures of the file itself (unreadable or
    /// unparseable), as opposed to answer-conversion failures.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, ContentError::Io { .. } | ContentError::Parse { .. })
    }
}

/// A rejected navigation transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    /// `next` was requested while the current question is unanswered.
    #[error("question {0} has not been answered")]
    Unanswered(u32),

    /// The requested transition does not exist from the current screen.
    #[error("transition '{transition}' is not available from the {screen} screen")]
    WrongScreen {
        transition: &'static str,
        screen: &'static str,
    },
}
