//! Console commands: one-shot `run` and the interactive `console` loop.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;
use tutor_core::prelude::*;

use super::{open_workbook, target_student, CliWorkbook, Context};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Student id or name (defaults to the selected student)
    #[arg(short, long)]
    student: Option<String>,

    /// Console command, e.g. `algebra 12 X`, `!stamp +3`, `!penalty 2`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[derive(Args)]
pub struct ConsoleArgs {
    /// Student id or name (defaults to the selected student)
    #[arg(short, long)]
    student: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutcomeView<'a> {
    command: &'a str,
    message: &'a str,
    tone: &'static str,
    saved: Vec<&'static str>,
}

impl<'a> OutcomeView<'a> {
    fn new(command: &'a str, outcome: &'a Outcome) -> Self {
        Self {
            command,
            message: &outcome.message,
            tone: tone_name(outcome.tone),
            saved: outcome.touched.iter().map(|key| key.name()).collect(),
        }
    }
}

fn tone_name(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "success",
        Tone::WrongAnswer => "wrong_answer",
        Tone::Warning => "warning",
        Tone::Ignored => "ignored",
        Tone::Rejected => "rejected",
    }
}

/// Apply `--student` for this invocation only; the remembered selection is
/// left untouched.
fn prepare(ctx: &Context, student: Option<&str>) -> Result<CliWorkbook> {
    let mut workbook = open_workbook(ctx)?;
    if student.is_some() {
        let id = target_student(&workbook, student)?;
        workbook.select_student(&id)?;
    }
    Ok(workbook)
}

fn report(raw: &str, outcome: &Outcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => output::print_outcome(outcome),
        _ => output::print_item(&OutcomeView::new(raw, outcome), format)?,
    }
    Ok(())
}

pub fn run(args: RunArgs, ctx: &Context) -> Result<()> {
    let mut workbook = prepare(ctx, args.student.as_deref())?;
    let raw = args.command.join(" ");

    let outcome = workbook.run_command(&raw);
    if outcome.is_rejected() {
        bail!("{}", outcome.message);
    }
    report(&raw, &outcome, ctx.format)?;

    if let Some(student) = workbook.current_student() {
        if student.has_milestone() {
            output::print_success(&format!("{} has {} stamps!", student.name, student.stamps));
        }
    }
    Ok(())
}

pub fn interactive(args: ConsoleArgs, ctx: &Context) -> Result<()> {
    let mut workbook = prepare(ctx, args.student.as_deref())?;

    match workbook.current_student() {
        Some(student) => output::print_info(&format!(
            "Recording for {} ({} stamps). Type `exit` to leave.",
            student.name, student.stamps
        )),
        None => output::print_warning("No student selected; commands will be rejected."),
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        if matches!(raw, "exit" | "quit") {
            break;
        }

        let had_milestone = workbook
            .current_student()
            .map(|s| s.has_milestone())
            .unwrap_or(false);

        let outcome = workbook.run_command(raw);
        debug!(command = raw, tone = tone_name(outcome.tone), "Console command handled");
        report(raw, &outcome, ctx.format)?;

        if let Some(student) = workbook.current_student() {
            if student.has_milestone() && !had_milestone {
                output::print_success(&format!(
                    "{} reached {} stamps!",
                    student.name, MILESTONE_STAMPS
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_view_lists_saved_collections() {
        let outcome = Outcome {
            message: "Added 3 stamps".to_string(),
            tone: Tone::Success,
            touched: vec![CollectionKey::Students, CollectionKey::RewardLogs],
        };
        let view = OutcomeView::new("!stamp +3", &outcome);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["tone"], "success");
        assert_eq!(json["saved"][1], "tutor-rewards");
        assert_eq!(json["command"], "!stamp +3");
    }
}
