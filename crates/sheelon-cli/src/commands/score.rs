//! The `sheelon score` command: score a saved answers file.

use std::path::PathBuf;

use anyhow::{Context, Result};

use sheelon_core::answers::AnswerSheet;
use sheelon_core::loader;
use sheelon_core::report::QuizReport;

use super::{print_summary, write_outputs};

pub fn execute(
    content: PathBuf,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let quiz = loader::load_quiz(&content)?;

    let raw = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers from {}", answers_path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse answers JSON: {}", answers_path.display()))?;
    let answers = AnswerSheet::from_values(&quiz, &values)?;

    if !answers.is_complete() {
        eprintln!(
            "Note: {} of {} questions answered; unanswered questions score zero.",
            answers.answered_count(),
            answers.len()
        );
    }

    let report = QuizReport::assemble(&quiz, &answers);
    println!("{}", quiz.export.title);
    print_summary(&report);

    if let Some(output) = output {
        write_outputs(&quiz, &report, &output, &format)?;
    }

    Ok(())
}
