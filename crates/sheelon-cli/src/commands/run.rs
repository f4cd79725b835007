//! The `sheelon run` command: an interactive terminal quiz.
//!
//! Drives the same session state machine the web front ends use. Input is
//! line-based: an answer value advances to the next question, `p` goes
//! back, `q` aborts. With `--fill-random` the questions are skipped
//! entirely and the filled sheet goes straight to results.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use sheelon_core::answers::Answer;
use sheelon_core::content::{Prompt, Question, Quiz, ScaleRange};
use sheelon_core::loader;
use sheelon_core::session::{QuizSession, Screen};

use super::{print_summary, write_outputs};

pub fn execute(
    content: PathBuf,
    fill_random: bool,
    seed: Option<u64>,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let quiz = loader::load_quiz(&content)?;
    let mut session = QuizSession::new(quiz);

    if fill_random {
        let seed = seed.unwrap_or_else(time_seed);
        session.fill_random(seed);
        eprintln!("Filled {} answers (seed {seed})", session.answers().len());
    } else {
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        run_interactive(&mut session, &mut lines)?;
        if session.screen() != Screen::Results {
            // User aborted mid-quiz.
            return Ok(());
        }
    }

    let report = session.report();
    println!("\n{}", session.quiz().export.title);
    print_summary(&report);

    if let Some(output) = output {
        write_outputs(session.quiz(), &report, &output, &format)?;
    }

    Ok(())
}

fn run_interactive(
    session: &mut QuizSession,
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> Result<()> {
    println!("{}", session.quiz().meta.title);
    if !session.quiz().meta.description.is_empty() {
        println!("{}", session.quiz().meta.description);
    }
    println!("(Enter to begin, q to quit)");
    if !wait_enter(lines) {
        return Ok(());
    }
    session.start()?;

    while let Screen::Question(_) = session.screen() {
        let Some(question) = session.current_question().cloned() else {
            break;
        };
        let Some(labels) = session.nav_labels() else {
            break;
        };

        println!();
        println!(
            "{} [{:.0}%]",
            session.progress_text().unwrap_or_default(),
            session.progress_percent()
        );
        print_question(&question, session.quiz());
        print!("[{} = p, {} = answer+enter, q = quit] > ", labels.prev, labels.next);
        std::io::stdout().flush()?;

        let Some(line) = next_line(lines) else {
            return Ok(());
        };
        let input = line.trim();

        match input {
            "q" => return Ok(()),
            "p" => {
                if session.prev()? == Screen::Intro {
                    println!("(Enter to begin, q to quit)");
                    if !wait_enter(lines) {
                        return Ok(());
                    }
                    session.start()?;
                }
            }
            _ => match parse_answer(&question, session.quiz().scale(), input) {
                Some(answer) => {
                    session.answer_current(answer)?;
                    session.next()?;
                }
                None => println!("?"),
            },
        }
    }

    Ok(())
}

fn print_question(question: &Question, quiz: &Quiz) {
    match &question.prompt {
        Prompt::Statement { text } => {
            let scale = quiz.scale().copied().unwrap_or(ScaleRange { min: 1, max: 5 });
            println!("{text}");
            println!("({}-{})", scale.min, scale.max);
        }
        Prompt::Paired { left, right } => {
            let scale = quiz.scale().copied().unwrap_or(ScaleRange { min: 1, max: 5 });
            println!("{} = {left}", scale.min);
            println!("{} = {right}", scale.max);
        }
        Prompt::YesNo { text } => {
            let yes = quiz.ui.yes.as_deref().unwrap_or("כן");
            let no = quiz.ui.no.as_deref().unwrap_or("לא");
            println!("{text}");
            println!("(y = {yes}, n = {no})");
        }
        Prompt::Scenario { scenario, options } => {
            println!("{scenario}");
            for option in options {
                println!("  {}) {}", option.id, option.text);
            }
        }
        Prompt::Choice { text, options } => {
            println!("{text}");
            for option in options {
                println!("  {}) {}", option.id, option.text);
            }
        }
    }
}

fn parse_answer(question: &Question, scale: Option<&ScaleRange>, input: &str) -> Option<Answer> {
    match &question.prompt {
        Prompt::Statement { .. } | Prompt::Paired { .. } => {
            let value: u8 = input.parse().ok()?;
            let scale = scale?;
            scale.contains(value).then_some(Answer::Scale(value))
        }
        Prompt::YesNo { .. } => match input {
            "y" | "yes" => Some(Answer::YesNo(true)),
            "n" | "no" => Some(Answer::YesNo(false)),
            _ => None,
        },
        Prompt::Scenario { options, .. } => options
            .iter()
            .find(|o| o.id.eq_ignore_ascii_case(input))
            .map(|o| Answer::Choice(o.id.clone())),
        Prompt::Choice { options, .. } => options
            .iter()
            .find(|o| o.id.eq_ignore_ascii_case(input))
            .map(|o| Answer::Choice(o.id.clone())),
    }
}

fn next_line(lines: &mut impl Iterator<Item = std::io::Result<String>>) -> Option<String> {
    lines.next().and_then(|l| l.ok())
}

/// Returns false when input ended or the user typed `q`.
fn wait_enter(lines: &mut impl Iterator<Item = std::io::Result<String>>) -> bool {
    match next_line(lines) {
        Some(line) => line.trim() != "q",
        None => false,
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheelon_core::content::*;

    fn statement_question() -> Question {
        Question {
            id: 1,
            prompt: Prompt::Statement {
                text: "היגד".into(),
            },
        }
    }

    #[test]
    fn parse_scale_answers() {
        let q = statement_question();
        let scale = ScaleRange { min: 1, max: 5 };
        assert_eq!(parse_answer(&q, Some(&scale), "3"), Some(Answer::Scale(3)));
        assert_eq!(parse_answer(&q, Some(&scale), "6"), None);
        assert_eq!(parse_answer(&q, Some(&scale), "x"), None);
    }

    #[test]
    fn parse_yes_no_answers() {
        let q = Question {
            id: 1,
            prompt: Prompt::YesNo { text: "כן?".into() },
        };
        assert_eq!(parse_answer(&q, None, "y"), Some(Answer::YesNo(true)));
        assert_eq!(parse_answer(&q, None, "no"), Some(Answer::YesNo(false)));
        assert_eq!(parse_answer(&q, None, "maybe"), None);
    }

    #[test]
    fn parse_option_answers_case_insensitive() {
        let q = Question {
            id: 1,
            prompt: Prompt::Scenario {
                scenario: "תרחיש".into(),
                options: vec![ScenarioOption {
                    id: "a".into(),
                    text: "אפשרות".into(),
                    style: "directing".into(),
                    score: 1,
                }],
            },
        };
        assert_eq!(
            parse_answer(&q, None, "A"),
            Some(Answer::Choice("a".into()))
        );
        assert_eq!(parse_answer(&q, None, "z"), None);
    }
}
