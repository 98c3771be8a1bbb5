//! Stamp commands: leaderboard, recent stamp events and milestone reset.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;
use tutor_core::prelude::*;
use tutor_core::views;

use super::{open_workbook, target_student, Context};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum StampsCommands {
    /// Students ordered by stamps
    Rankings,

    /// Most recent stamp awards across all students
    Recent {
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Redeem the milestone: set a student's stamps back to zero
    Reset {
        /// Student id or name (defaults to the selected student)
        student: Option<String>,

        /// Reset even below the milestone
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Stamps")]
    stamps: u32,
    #[tabled(rename = "Milestone")]
    milestone: String,
    #[tabled(rename = "Last stamp")]
    last_stamp_at: String,
}

#[derive(Debug, Serialize, Tabled)]
struct StampLogRow {
    #[tabled(rename = "When")]
    timestamp: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Stamps")]
    value: u32,
}

pub fn execute(cmd: StampsCommands, ctx: &Context) -> Result<()> {
    let mut workbook = open_workbook(ctx)?;

    match cmd {
        StampsCommands::Rankings => {
            let rankings = views::stamp_rankings(workbook.students().students(), workbook.rewards());
            match ctx.format {
                OutputFormat::Table => {
                    let rows: Vec<RankingRow> = rankings
                        .into_iter()
                        .enumerate()
                        .map(|(i, r)| RankingRow {
                            rank: i + 1,
                            name: r.name,
                            stamps: r.stamps,
                            milestone: if r.has_milestone { "yes".into() } else { "-".into() },
                            last_stamp_at: r
                                .last_stamp_at
                                .map(|at| output::format_time(&at))
                                .unwrap_or_else(|| "-".into()),
                        })
                        .collect();
                    output::print_list(&rows, ctx.format)?;
                }
                _ => output::print_item(&rankings, ctx.format)?,
            }
        }

        StampsCommands::Recent { limit } => {
            let limit = limit.unwrap_or(ctx.recent_limit);
            let logs = views::recent_stamp_logs(workbook.rewards(), limit);
            match ctx.format {
                OutputFormat::Table => {
                    let rows: Vec<StampLogRow> = logs
                        .iter()
                        .map(|entry| StampLogRow {
                            timestamp: output::format_time(&entry.timestamp),
                            student: workbook
                                .students()
                                .get_student(&entry.student_id)
                                .map(|s| s.name.clone())
                                .unwrap_or_else(|| entry.student_id.to_string()),
                            value: entry.value,
                        })
                        .collect();
                    output::print_list(&rows, ctx.format)?;
                }
                _ => output::print_item(&logs, ctx.format)?,
            }
        }

        StampsCommands::Reset { student, force } => {
            let id = target_student(&workbook, student.as_deref())?;
            let (name, stamps) = match workbook.students().get_student(&id) {
                Some(s) => (s.name.clone(), s.stamps),
                None => anyhow::bail!("Student not found: {}", id),
            };

            if stamps < MILESTONE_STAMPS && !force {
                output::print_info(&format!(
                    "{} has {} of {} stamps. Use --force to reset anyway.",
                    name, stamps, MILESTONE_STAMPS
                ));
                return Ok(());
            }

            workbook.reset_stamps(&id)?;
            output::print_success(&format!("Reset {} stamps for {}", stamps, name));
        }
    }

    Ok(())
}
