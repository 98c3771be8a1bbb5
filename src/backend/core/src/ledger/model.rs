//! Ledger records: students, grading entries, homework and reward events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stamp count at which a student has earned the milestone reward.
pub const MILESTONE_STAMPS: u32 = 100;

/// Unique identifier for a student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a log entry, homework item or reward event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of grading a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeStatus {
    /// Correct
    #[serde(rename = "O")]
    Correct,
    /// Incorrect
    #[serde(rename = "X")]
    Incorrect,
    /// Partially correct
    #[serde(rename = "△", alias = "PARTIAL")]
    Partial,
}

impl GradeStatus {
    /// Parse a status token. Matching is case-insensitive and accepts
    /// `PARTIAL` as a spelling of `△`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_uppercase().as_str() {
            "O" => Some(Self::Correct),
            "X" => Some(Self::Incorrect),
            "△" | "PARTIAL" => Some(Self::Partial),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Correct => "O",
            Self::Incorrect => "X",
            Self::Partial => "△",
        }
    }
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Kind of reward-ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Stamp,
    Penalty,
}

impl std::fmt::Display for RewardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stamp => f.write_str("stamp"),
            Self::Penalty => f.write_str("penalty"),
        }
    }
}

/// A single graded question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: RecordId,
    pub student_id: StudentId,
    pub unit: String,
    pub question: String,
    pub status: GradeStatus,
    pub timestamp: DateTime<Utc>,
}

/// Lifecycle of a homework item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkState {
    Assigned,
    Completed,
}

impl HomeworkState {
    /// `Completed` is terminal; nothing moves back to `Assigned`.
    pub fn can_transition_to(&self, target: &HomeworkState) -> bool {
        matches!((self, target), (HomeworkState::Assigned, HomeworkState::Completed))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, HomeworkState::Completed)
    }
}

/// A homework assignment. Only `completed` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    pub id: RecordId,
    pub unit: String,
    pub range: String,
    pub assigned_at: DateTime<Utc>,
    pub completed: bool,
}

impl Homework {
    pub fn state(&self) -> HomeworkState {
        if self.completed {
            HomeworkState::Completed
        } else {
            HomeworkState::Assigned
        }
    }
}

/// A stamp or penalty event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardLogEntry {
    pub id: RecordId,
    pub student_id: StudentId,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A student with their grading log and homework list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub stamps: u32,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub homework: Vec<Homework>,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            stamps: 0,
            logs: Vec::new(),
            homework: Vec::new(),
        }
    }

    /// Whether the student has reached the stamp milestone.
    pub fn has_milestone(&self) -> bool {
        has_milestone(self.stamps)
    }
}

/// Milestone predicate: exactly `stamps >= 100`.
pub fn has_milestone(stamps: u32) -> bool {
    stamps >= MILESTONE_STAMPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens_are_case_insensitive() {
        assert_eq!(GradeStatus::from_token("o"), Some(GradeStatus::Correct));
        assert_eq!(GradeStatus::from_token("x"), Some(GradeStatus::Incorrect));
        assert_eq!(GradeStatus::from_token("△"), Some(GradeStatus::Partial));
        assert_eq!(GradeStatus::from_token("partial"), Some(GradeStatus::Partial));
        assert_eq!(GradeStatus::from_token("Y"), None);
        assert_eq!(GradeStatus::from_token(""), None);
    }

    #[test]
    fn test_milestone_boundary() {
        assert!(!has_milestone(99));
        assert!(has_milestone(100));
        assert!(has_milestone(250));
    }

    #[test]
    fn test_homework_state_is_terminal_once_completed() {
        assert!(HomeworkState::Assigned.can_transition_to(&HomeworkState::Completed));
        assert!(!HomeworkState::Completed.can_transition_to(&HomeworkState::Assigned));
        assert!(HomeworkState::Completed.is_terminal());
    }

    #[test]
    fn test_status_serializes_as_symbol() {
        let json = serde_json::to_string(&GradeStatus::Partial).unwrap();
        assert_eq!(json, "\"△\"");
        let parsed: GradeStatus = serde_json::from_str("\"X\"").unwrap();
        assert_eq!(parsed, GradeStatus::Incorrect);
    }

    #[test]
    fn test_reward_entry_uses_type_field() {
        let entry = RewardLogEntry {
            id: RecordId::new("stamp-1"),
            student_id: StudentId::new("student-1"),
            kind: RewardKind::Stamp,
            value: 3,
            reason: None,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "stamp");
        assert_eq!(value["studentId"], "student-1");
        assert!(value.get("reason").is_none());
    }
}
