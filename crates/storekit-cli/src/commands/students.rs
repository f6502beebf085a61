//! `storekit students` subcommands.

use clap::{Parser, Subcommand};
use serde::Serialize;
use storekit_documents::{decode, top_students, StudentAverage};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Rank students by average topic score
#[derive(Debug, Parser)]
pub struct StudentsCommand {
    #[command(subcommand)]
    pub action: StudentsAction,
}

#[derive(Debug, Subcommand)]
pub enum StudentsAction {
    /// Students sorted by average score, best first
    Top {
        /// Show at most this many students
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RankingOutput {
    pub students: Vec<StudentAverage>,
}

impl FormattedOutput for RankingOutput {
    fn format_text(&self) -> String {
        if self.students.is_empty() {
            return "No students".to_string();
        }

        let names: Vec<String> = self
            .students
            .iter()
            .map(|s| s.display_name().unwrap_or_else(|| "-".to_string()))
            .collect();
        let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);

        self.students
            .iter()
            .zip(&names)
            .enumerate()
            .map(|(rank, (student, name))| {
                let score = student
                    .average_score
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "n/a".to_string());
                format!("{:>3}. {name:<width$}  {score}", rank + 1)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StudentsCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let collection = ctx.collection().await?;

        match &self.action {
            StudentsAction::Top { limit } => {
                let mut students: Vec<StudentAverage> =
                    decode(top_students(collection.as_ref()).await?)?;
                if let Some(limit) = limit {
                    students.truncate(*limit);
                }
                print_output(ctx, &RankingOutput { students })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storekit_documents::bson::Bson;

    fn student(name: impl Into<Bson>, score: Option<f64>) -> StudentAverage {
        StudentAverage {
            id: None,
            name: Some(name.into()),
            average_score: score,
        }
    }

    #[test]
    fn test_ranking_text_aligns_names() {
        let output = RankingOutput {
            students: vec![student("Bob", Some(85.0)), student("Annabel", None)],
        };
        assert_eq!(
            output.format_text(),
            "  1. Bob      85.00\n  2. Annabel  n/a"
        );
    }

    #[test]
    fn test_ranking_text_renders_numeric_and_missing_names() {
        let mut unnamed = student("x", Some(50.0));
        unnamed.name = None;
        let output = RankingOutput {
            students: vec![student(2024_i64, Some(90.0)), unnamed],
        };
        assert_eq!(output.format_text(), "  1. 2024  90.00\n  2. -     50.00");

        let json: serde_json::Value = serde_json::from_str(&output.format_json().unwrap()).unwrap();
        assert_eq!(json[0]["name"], 2024);
    }

    #[test]
    fn test_ranking_json_is_an_array() {
        let output = RankingOutput {
            students: vec![student("Bob", Some(85.0))],
        };
        let json: serde_json::Value = serde_json::from_str(&output.format_json().unwrap()).unwrap();
        assert_eq!(json[0]["name"], "Bob");
        assert_eq!(json[0]["averageScore"], 85.0);
    }
}
