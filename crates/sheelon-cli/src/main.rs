//! sheelon CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sheelon",
    version,
    about = "Hebrew self-assessment questionnaire engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a quiz interactively in the terminal
    Run {
        /// Path to the quiz content JSON file
        #[arg(long)]
        content: PathBuf,

        /// Fill every answer from a seeded generator and jump to results
        #[arg(long)]
        fill_random: bool,

        /// Seed for --fill-random (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory to write report files into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: markdown, html, json, all
        #[arg(long, default_value = "markdown")]
        format: String,
    },

    /// Score a saved answers file against a quiz
    Score {
        /// Path to the quiz content JSON file
        #[arg(long)]
        content: PathBuf,

        /// Path to the answers JSON file (one entry per question)
        #[arg(long)]
        answers: PathBuf,

        /// Directory to write report files into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: markdown, html, json, all
        #[arg(long, default_value = "markdown")]
        format: String,
    },

    /// Validate quiz content files
    Validate {
        /// Path to a content file or directory
        #[arg(long)]
        content: PathBuf,
    },

    /// Create a starter content file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sheelon=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            content,
            fill_random,
            seed,
            output,
            format,
        } => commands::run::execute(content, fill_random, seed, output, format),
        Commands::Score {
            content,
            answers,
            output,
            format,
        } => commands::score::execute(content, answers, output, format),
        Commands::Validate { content } => commands::validate::execute(content),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
