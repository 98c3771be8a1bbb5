//! Grading log commands.

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;
use tutor_core::prelude::*;
use tutor_core::views;

use super::{open_workbook, target_student, CliWorkbook, Context};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Most recent grading entries across all students
    Recent {
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Wrong answers for one student
    Wrong {
        /// Student id or name (defaults to the selected student)
        #[arg(short, long)]
        student: Option<String>,

        /// Only entries recorded since local midnight
        #[arg(short, long)]
        today: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct LogRow {
    #[tabled(rename = "When")]
    timestamp: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Question")]
    question: String,
    #[tabled(rename = "Result")]
    status: &'static str,
}

fn row(workbook: &CliWorkbook, entry: &LogEntry) -> LogRow {
    LogRow {
        timestamp: output::format_time(&entry.timestamp),
        student: workbook
            .students()
            .get_student(&entry.student_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| entry.student_id.to_string()),
        unit: entry.unit.clone(),
        question: entry.question.clone(),
        status: entry.status.symbol(),
    }
}

fn print_entries(workbook: &CliWorkbook, entries: &[&LogEntry], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<LogRow> = entries.iter().map(|e| row(workbook, e)).collect();
            output::print_list(&rows, format)
        }
        _ => output::print_item(&entries, format),
    }
}

pub fn execute(cmd: LogsCommands, ctx: &Context) -> Result<()> {
    let workbook = open_workbook(ctx)?;

    match cmd {
        LogsCommands::Recent { limit } => {
            let entries = workbook.global_log().recent(limit.unwrap_or(ctx.recent_limit));
            print_entries(&workbook, &entries, ctx.format)?;
        }

        LogsCommands::Wrong { student, today } => {
            let id = target_student(&workbook, student.as_deref())?;
            let Some(student) = workbook.students().get_student(&id) else {
                anyhow::bail!("Student not found: {}", id);
            };
            let entries: Vec<&LogEntry> = if today {
                views::today_wrong_answers(student, views::local_day_start(Utc::now()))
            } else {
                views::wrong_answers(student).collect()
            };
            print_entries(&workbook, &entries, ctx.format)?;
        }
    }

    Ok(())
}
