//! CLI command implementations.

pub mod config;
pub mod console;
pub mod homework;
pub mod logs;
pub mod stamps;
pub mod student;

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::warn;
use tutor_core::prelude::*;

use crate::output::OutputFormat;

/// Settings shared by every command invocation.
pub struct Context {
    pub format: OutputFormat,
    pub data_dir: PathBuf,
    pub recent_limit: usize,
}

pub type CliWorkbook = Workbook<JsonFileStore, SystemClock>;

/// Open the workbook and restore the remembered student selection.
pub fn open_workbook(ctx: &Context) -> Result<CliWorkbook> {
    let mut workbook = Workbook::open(JsonFileStore::new(&ctx.data_dir), SystemClock)?;
    if let Some(id) = config::load_value("current-student") {
        if let Err(e) = workbook.select_student(&StudentId::new(id)) {
            warn!(error = %e, "Remembered student is no longer on the roster");
            config::clear_value("current-student")?;
        }
    }
    Ok(workbook)
}

/// The student named by `key` (id or exact name), or the selected student.
pub fn target_student(workbook: &CliWorkbook, key: Option<&str>) -> Result<StudentId> {
    match key {
        Some(key) => match workbook.resolve_student(key) {
            Some(student) => Ok(student.id.clone()),
            None => bail!("Student not found: {}", key),
        },
        None => match workbook.current_student_id() {
            Some(id) => Ok(id.clone()),
            None => bail!("No student selected. Use `tutor student select <name>` first"),
        },
    }
}
