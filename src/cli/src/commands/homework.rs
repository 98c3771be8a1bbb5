//! Homework commands.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;
use tutor_core::prelude::*;

use super::{open_workbook, target_student, Context};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum HomeworkCommands {
    /// List a student's homework
    List {
        /// Student id or name (defaults to the selected student)
        #[arg(short, long)]
        student: Option<String>,

        /// Include completed homework
        #[arg(short, long)]
        all: bool,
    },

    /// Mark homework as completed
    Complete {
        /// Homework ID
        homework_id: String,

        /// Student id or name (defaults to the selected student)
        #[arg(short, long)]
        student: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct HomeworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Assigned")]
    assigned_at: String,
    #[tabled(rename = "Done")]
    completed: bool,
}

impl From<&Homework> for HomeworkRow {
    fn from(homework: &Homework) -> Self {
        Self {
            id: homework.id.to_string(),
            unit: homework.unit.clone(),
            range: homework.range.clone(),
            assigned_at: output::format_time(&homework.assigned_at),
            completed: homework.completed,
        }
    }
}

pub fn execute(cmd: HomeworkCommands, ctx: &Context) -> Result<()> {
    let mut workbook = open_workbook(ctx)?;

    match cmd {
        HomeworkCommands::List { student, all } => {
            let id = target_student(&workbook, student.as_deref())?;
            let rows: Vec<HomeworkRow> = workbook
                .students()
                .get_student(&id)
                .map(|s| {
                    s.homework
                        .iter()
                        .filter(|h| all || !h.completed)
                        .map(HomeworkRow::from)
                        .collect()
                })
                .unwrap_or_default();

            output::print_list(&rows, ctx.format)?;
        }

        HomeworkCommands::Complete {
            homework_id,
            student,
        } => {
            let id = target_student(&workbook, student.as_deref())?;
            let homework_id = RecordId::new(homework_id);
            workbook.complete_homework(&id, &homework_id)?;

            match ctx.format {
                OutputFormat::Table => {
                    output::print_success(&format!("Homework {} completed", homework_id));
                }
                _ => {
                    output::print_item(
                        &serde_json::json!({ "id": homework_id, "completed": true }),
                        ctx.format,
                    )?;
                }
            }
        }
    }

    Ok(())
}
