//! Student roster commands.
//!
//! Provides add, list, select and show operations.

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;
use tutor_core::prelude::*;
use tutor_core::views;

use super::{config, open_workbook, target_student, Context};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum StudentCommands {
    /// Add a student to the roster
    Add {
        /// Display name
        name: String,

        /// Select the new student right away
        #[arg(short, long)]
        select: bool,
    },

    /// List students with their stamp and homework counts
    List {
        /// Only names containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Select the student console commands apply to
    Select {
        /// Student id or name
        student: String,
    },

    /// Show a student's card
    Show {
        /// Student id or name (defaults to the selected student)
        student: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct StudentRow {
    #[tabled(rename = "")]
    selected: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Stamps")]
    stamps: u32,
    #[tabled(rename = "Wrong")]
    wrong_answers: usize,
    #[tabled(rename = "Open HW")]
    incomplete_homework: usize,
    #[tabled(rename = "Penalty")]
    penalty_total: u64,
}

#[derive(Debug, Serialize)]
struct StudentCard<'a> {
    #[serde(flatten)]
    summary: StudentSummary,
    wrong_today: Vec<&'a LogEntry>,
    open_homework: Vec<&'a Homework>,
}

pub fn execute(cmd: StudentCommands, ctx: &Context) -> Result<()> {
    let mut workbook = open_workbook(ctx)?;

    match cmd {
        StudentCommands::Add { name, select } => {
            let student = workbook.add_student(&name)?;
            if select {
                config::store_value("current-student", student.id.as_str())?;
            }

            match ctx.format {
                OutputFormat::Table => {
                    output::print_success("Student added");
                    output::print_detail("ID", student.id.as_str());
                    output::print_detail("Name", &student.name);
                    if select {
                        output::print_detail("Selected", "yes");
                    }
                }
                _ => output::print_item(&student, ctx.format)?,
            }
        }

        StudentCommands::List { search } => {
            let selected = workbook.current_student_id().cloned();
            let students = workbook.students().students();
            let query = search.as_deref().unwrap_or("");
            let rows: Vec<StudentRow> = views::search_students(students, query)
                .into_iter()
                .map(|student| {
                    let summary = StudentSummary::build(student, workbook.rewards());
                    StudentRow {
                        selected: marker(selected.as_ref() == Some(&student.id)),
                        id: summary.id.to_string(),
                        name: summary.name,
                        stamps: summary.stamps,
                        wrong_answers: summary.wrong_answers,
                        incomplete_homework: summary.incomplete_homework,
                        penalty_total: summary.penalty_total,
                    }
                })
                .collect();

            output::print_list(&rows, ctx.format)?;
        }

        StudentCommands::Select { student } => {
            let id = target_student(&workbook, Some(&student))?;
            let selected = workbook.select_student(&id)?;
            config::store_value("current-student", selected.id.as_str())?;

            match ctx.format {
                OutputFormat::Table => {
                    output::print_success(&format!("Selected {} ({})", selected.name, selected.id));
                }
                _ => output::print_item(selected, ctx.format)?,
            }
        }

        StudentCommands::Show { student } => {
            let id = target_student(&workbook, student.as_deref())?;
            let student = workbook
                .students()
                .get_student(&id)
                .ok_or_else(|| anyhow!("Student not found: {}", id))?;

            let card = StudentCard {
                summary: StudentSummary::build(student, workbook.rewards()),
                wrong_today: views::today_wrong_answers(student, views::local_day_start(Utc::now())),
                open_homework: views::incomplete_homework(student).collect(),
            };

            match ctx.format {
                OutputFormat::Table => print_card(&card),
                _ => output::print_item(&card, ctx.format)?,
            }
        }
    }

    Ok(())
}

fn marker(selected: bool) -> String {
    if selected {
        "*".to_string()
    } else {
        String::new()
    }
}

fn print_card(card: &StudentCard<'_>) {
    let summary = &card.summary;
    output::print_header(&summary.name);
    output::print_detail("ID", summary.id.as_str());
    output::print_detail("Stamps", &format!("{} / {}", summary.stamps, MILESTONE_STAMPS));
    output::print_detail("Wrong answers", &summary.wrong_answers.to_string());
    output::print_detail("Partial answers", &summary.partial_answers.to_string());
    output::print_detail("Open homework", &summary.incomplete_homework.to_string());
    output::print_detail("Penalty sheets", &summary.penalty_total.to_string());

    if summary.has_milestone {
        println!();
        output::print_success(&format!(
            "{} stamps reached! Redeem with `tutor stamps reset`",
            MILESTONE_STAMPS
        ));
    }

    output::print_header("Wrong answers today");
    if card.wrong_today.is_empty() {
        output::print_info("None so far.");
    }
    for entry in &card.wrong_today {
        println!("  {} {} {}", output::format_time(&entry.timestamp), entry.unit, entry.question);
    }

    output::print_header("Open homework");
    if card.open_homework.is_empty() {
        output::print_info("All done.");
    }
    for homework in &card.open_homework {
        println!("  [{}] {} {}", homework.id, homework.unit, homework.range);
    }
}
