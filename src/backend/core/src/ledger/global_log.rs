//! Append-only mirror of every grading event across all students.

use super::model::{GradeStatus, LogEntry, StudentId};

/// Global grading log, ordered by insertion.
#[derive(Debug, Clone, Default)]
pub struct GlobalLogStore {
    entries: Vec<LogEntry>,
}

impl GlobalLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most recent entries, newest first. Entries with equal
    /// timestamps are ordered by later insertion first.
    pub fn recent(&self, n: usize) -> Vec<&LogEntry> {
        let mut newest: Vec<&LogEntry> = self.entries.iter().rev().collect();
        newest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        newest.truncate(n);
        newest
    }

    pub fn by_student<'a>(&'a self, student_id: &'a StudentId) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries.iter().filter(move |e| &e.student_id == student_id)
    }

    pub fn by_status<'a>(
        &'a self,
        student_id: &'a StudentId,
        status: GradeStatus,
    ) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.by_student(student_id).filter(move |e| e.status == status)
    }
}
