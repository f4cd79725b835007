//! The `sheelon validate` command.

use std::path::PathBuf;

use anyhow::Result;

use sheelon_core::loader;

pub fn execute(content_path: PathBuf) -> Result<()> {
    let quizzes = if content_path.is_dir() {
        loader::load_quiz_directory(&content_path)?
    } else {
        vec![loader::load_quiz(&content_path)?]
    };

    let mut total_warnings = 0;

    for quiz in &quizzes {
        println!(
            "Quiz: {} ({} questions, {} mode)",
            quiz.meta.title,
            quiz.question_count(),
            quiz.scoring.mode_name()
        );

        let warnings = loader::validate_quiz(quiz);
        for w in &warnings {
            let prefix = w
                .subject
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All content files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
