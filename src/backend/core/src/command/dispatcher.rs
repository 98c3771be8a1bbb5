//! Applies parsed commands to the ledgers and reports what happened.

use thiserror::Error;
use tracing::{debug, info};

use crate::clock::IdClock;
use crate::ledger::{GradeStatus, Homework, Ledgers, LogEntry, RecordId, RewardLogEntry, StudentId};
use crate::persistence::CollectionKey;
use crate::telemetry::metrics;

use super::parser::{self, Action, Command};

/// Precondition failures detected before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("No student selected")]
    NoStudentSelected,

    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),
}

/// How an outcome should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    /// A grading entry with status X.
    WrongAnswer,
    /// A penalty was applied.
    Warning,
    /// Accepted but changed nothing.
    Ignored,
    /// Rejected before any mutation.
    Rejected,
}

/// Result of running one console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub tone: Tone,
    /// Collections that changed and must be saved.
    pub touched: Vec<CollectionKey>,
}

impl Outcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Rejected,
            touched: Vec::new(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.tone == Tone::Rejected
    }

    pub fn mutated(&self) -> bool {
        !self.touched.is_empty()
    }

    fn touch(&mut self, key: CollectionKey) {
        if !self.touched.contains(&key) {
            self.touched.push(key);
        }
    }
}

/// Turns commands into ledger mutations.
///
/// The dispatcher borrows the ledgers for the duration of a call and never
/// performs I/O; saving touched collections is the caller's job.
pub struct Dispatcher<'a, C: IdClock> {
    ledgers: &'a mut Ledgers,
    clock: &'a C,
}

impl<'a, C: IdClock> Dispatcher<'a, C> {
    pub fn new(ledgers: &'a mut Ledgers, clock: &'a C) -> Self {
        Self { ledgers, clock }
    }

    /// Parse and execute one console line. Every failure becomes a rejected
    /// outcome with nothing mutated.
    pub fn run(&mut self, student_id: Option<&StudentId>, raw: &str) -> Outcome {
        let outcome = self
            .resolve(student_id)
            .map_err(|e| e.to_string())
            .and_then(|id| {
                let command = parser::parse(raw).map_err(|e| e.to_string())?;
                self.execute(Some(&id), &command).map_err(|e| e.to_string())
            });

        match outcome {
            Ok(outcome) => outcome,
            Err(message) => {
                debug!(input = %raw, reason = %message, "Command rejected");
                metrics::record_command("unknown", "rejected");
                Outcome::rejected(message)
            }
        }
    }

    /// Apply a parsed command for the selected student.
    pub fn execute(
        &mut self,
        student_id: Option<&StudentId>,
        command: &Command,
    ) -> Result<Outcome, DispatchError> {
        let student_id = self.resolve(student_id)?;

        let mut outcome = Outcome {
            message: describe(command),
            tone: tone(command),
            touched: Vec::new(),
        };
        for action in command.actions() {
            self.apply(&student_id, action, &mut outcome);
        }

        info!(
            student_id = %student_id,
            command = command.kind(),
            touched = outcome.touched.len(),
            "Command applied"
        );
        metrics::record_command(command.kind(), "applied");
        Ok(outcome)
    }

    /// Append a grading event to the student's log and the global log.
    pub fn record_grade(
        &mut self,
        student_id: &StudentId,
        unit: String,
        question: String,
        status: GradeStatus,
    ) -> LogEntry {
        let entry = LogEntry {
            id: RecordId::new(self.clock.new_id("log")),
            student_id: student_id.clone(),
            unit,
            question,
            status,
            timestamp: self.clock.now(),
        };
        self.ledgers.students.append_log(student_id, entry.clone());
        self.ledgers.global_log.append(entry.clone());
        entry
    }

    fn resolve(&self, student_id: Option<&StudentId>) -> Result<StudentId, DispatchError> {
        let id = student_id.ok_or(DispatchError::NoStudentSelected)?;
        if !self.ledgers.students.contains(id) {
            return Err(DispatchError::StudentNotFound(id.clone()));
        }
        Ok(id.clone())
    }

    fn apply(&mut self, student_id: &StudentId, action: Action, outcome: &mut Outcome) {
        match action {
            Action::RecordGrade {
                unit,
                question,
                status,
            } => {
                self.record_grade(student_id, unit, question, status);
                outcome.touch(CollectionKey::Students);
                outcome.touch(CollectionKey::GradingLogs);
            }
            Action::AssignHomework { unit, range } => {
                let homework = Homework {
                    id: RecordId::new(self.clock.new_id("homework")),
                    unit,
                    range,
                    assigned_at: self.clock.now(),
                    completed: false,
                };
                self.ledgers.students.append_homework(student_id, homework);
                outcome.touch(CollectionKey::Students);
            }
            Action::AdjustStamps { delta } => {
                self.ledgers.students.adjust_stamps(student_id, delta);
                outcome.touch(CollectionKey::Students);
            }
            Action::RecordReward { kind, value } => {
                let entry = RewardLogEntry {
                    id: RecordId::new(self.clock.new_id(&kind.to_string())),
                    student_id: student_id.clone(),
                    kind,
                    value,
                    reason: Some(kind.to_string()),
                    timestamp: self.clock.now(),
                };
                self.ledgers.rewards.append(entry);
                outcome.touch(CollectionKey::RewardLogs);
            }
        }
    }
}

fn describe(command: &Command) -> String {
    match command {
        Command::RecordGrade {
            unit,
            question,
            status: GradeStatus::Incorrect,
        } => format!("Wrong answer recorded: {} {}", unit, question),
        Command::RecordGrade {
            unit,
            question,
            status,
        } => format!("Recorded: {} {} {}", unit, question, status),
        Command::AssignHomework { unit, range } => format!("Homework assigned: {} {}", unit, range),
        Command::AddStamps { amount } => format!("Added {} stamps", amount),
        Command::RemoveStamps { amount } => format!("Removed {} stamps", amount),
        Command::Penalty { sheets } => format!("Penalty: {} assigned", parser::penalty_range(*sheets)),
        Command::Ignored => "Stamp command ignored: expected +N or -N".to_string(),
    }
}

fn tone(command: &Command) -> Tone {
    match command {
        Command::RecordGrade {
            status: GradeStatus::Incorrect,
            ..
        } => Tone::WrongAnswer,
        Command::RecordGrade { .. }
        | Command::AssignHomework { .. }
        | Command::AddStamps { .. }
        | Command::RemoveStamps { .. } => Tone::Success,
        Command::Penalty { .. } => Tone::Warning,
        Command::Ignored => Tone::Ignored,
    }
}
