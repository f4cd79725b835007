//! CLI subcommands and their shared output plumbing.

use std::path::Path;

use anyhow::Result;
use comfy_table::Table;

use sheelon_core::content::Quiz;
use sheelon_core::report::{Outcome, QuizReport};
use sheelon_report::{write_markdown_report, write_rich_text_report};

pub mod init;
pub mod run;
pub mod score;
pub mod validate;

/// Print the score summary table and the headline (dominant units or the
/// all-low notice).
pub(crate) fn print_summary(report: &QuizReport) {
    let mut table = Table::new();

    match &report.outcome {
        Outcome::Sum {
            ranking, overall, ..
        } => {
            table.set_header(vec!["Category", "Score", "Max"]);
            for score in &ranking.sorted {
                table.add_row(vec![
                    score.title.clone(),
                    score.sum.to_string(),
                    score
                        .max_possible
                        .map(|m| m.to_string())
                        .unwrap_or_default(),
                ]);
            }
            println!("{table}");
            if let Some(overall) = overall {
                println!(
                    "Total: {} ({:.0}%){}",
                    overall.total,
                    overall.percentage,
                    overall
                        .range_title
                        .as_deref()
                        .map(|t| format!(": {t}"))
                        .unwrap_or_default()
                );
            }
            print_headline(ranking.all_low, &ranking.dominant, |c| c.title.as_str());
        }
        Outcome::YesCount {
            ranking,
            denominator,
            ..
        } => {
            table.set_header(vec!["Style", "Score"]);
            for score in &ranking.sorted {
                table.add_row(vec![
                    score.title.clone(),
                    format!("{}/{denominator}", score.sum),
                ]);
            }
            println!("{table}");
            print_headline(false, &ranking.dominant, |c| c.title.as_str());
        }
        Outcome::Circles { circles } => {
            table.set_header(vec!["Circle", "Sub-category", "Score"]);
            for circle in circles {
                table.add_row(vec![
                    circle.title.clone(),
                    String::new(),
                    format!("{} / {}", circle.sum, circle.max_possible),
                ]);
                for sub in &circle.sub_scores {
                    table.add_row(vec![
                        String::new(),
                        sub.title.clone(),
                        format!(
                            "{} / {}",
                            sub.sum,
                            sub.max_possible.unwrap_or_default()
                        ),
                    ]);
                }
            }
            println!("{table}");
        }
        Outcome::Effectiveness { styles, ranking } => {
            table.set_header(vec!["Style", "Choices", "Effectiveness"]);
            for tally in styles {
                table.add_row(vec![
                    tally.title.clone(),
                    tally.count.to_string(),
                    format!("{:+}", tally.effectiveness),
                ]);
            }
            println!("{table}");
            print_headline(false, &ranking.dominant, |t| t.title.as_str());
        }
        Outcome::DomainCount { ranking, .. } => {
            table.set_header(vec!["Domain", "Choices"]);
            for score in &ranking.sorted {
                table.add_row(vec![score.title.clone(), score.sum.to_string()]);
            }
            println!("{table}");
            print_headline(false, &ranking.dominant, |c| c.title.as_str());
        }
    }
}

fn print_headline<'a, T>(all_low: bool, dominant: &'a [T], title: impl Fn(&'a T) -> &'a str) {
    if all_low {
        println!("All scores are below the quiz threshold.");
    } else if !dominant.is_empty() {
        let titles: Vec<&str> = dominant.iter().map(|d| title(d)).collect();
        println!("Dominant: {}", titles.join(", "));
    }
}

/// Write the report in the requested formats, one timestamped file each.
pub(crate) fn write_outputs(
    quiz: &Quiz,
    report: &QuizReport,
    output: &Path,
    format: &str,
) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "markdown" => {
                let path = output.join(format!("results-{timestamp}.md"));
                write_markdown_report(quiz, report, &path)?;
                eprintln!("Markdown results: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("results-{timestamp}.html"));
                write_rich_text_report(quiz, report, &path)?;
                eprintln!("Rich-text results: {}", path.display());
            }
            _ => {
                anyhow::bail!("unknown format: {fmt}");
            }
        }
    }

    Ok(())
}
