//! Read-only aggregates derived from the ledgers.

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::ledger::{
    has_milestone, GradeStatus, Homework, LogEntry, RewardLedger, RewardLogEntry, Student,
    StudentId,
};

/// Default number of entries in "recent" lists.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

pub fn wrong_answers(student: &Student) -> impl Iterator<Item = &LogEntry> {
    entries_with_status(student, GradeStatus::Incorrect)
}

pub fn partial_answers(student: &Student) -> impl Iterator<Item = &LogEntry> {
    entries_with_status(student, GradeStatus::Partial)
}

fn entries_with_status(student: &Student, status: GradeStatus) -> impl Iterator<Item = &LogEntry> {
    student.logs.iter().filter(move |log| log.status == status)
}

/// Wrong answers recorded at or after `day_start`.
pub fn today_wrong_answers(student: &Student, day_start: DateTime<Utc>) -> Vec<&LogEntry> {
    wrong_answers(student)
        .filter(|log| log.timestamp >= day_start)
        .collect()
}

/// Local midnight of the day containing `now`, as a UTC instant.
pub fn local_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let local_date = now.with_timezone(&Local).date_naive();
    Local
        .from_local_datetime(&local_date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        // Midnight skipped by a DST jump: fall back to UTC midnight.
        .unwrap_or_else(|| local_date.and_time(NaiveTime::MIN).and_utc())
}

pub fn incomplete_homework(student: &Student) -> impl Iterator<Item = &Homework> {
    student.homework.iter().filter(|h| !h.completed)
}

/// The per-student card shown on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
    pub stamps: u32,
    pub wrong_answers: usize,
    pub partial_answers: usize,
    pub incomplete_homework: usize,
    pub penalty_total: u64,
    pub has_milestone: bool,
}

impl StudentSummary {
    pub fn build(student: &Student, rewards: &RewardLedger) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            stamps: student.stamps,
            wrong_answers: wrong_answers(student).count(),
            partial_answers: partial_answers(student).count(),
            incomplete_homework: incomplete_homework(student).count(),
            penalty_total: rewards.penalty_total(&student.id),
            has_milestone: student.has_milestone(),
        }
    }
}

/// One row of the stamp leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StampRanking {
    pub id: StudentId,
    pub name: String,
    pub stamps: u32,
    pub has_milestone: bool,
    pub last_stamp_at: Option<DateTime<Utc>>,
}

/// Students ordered by stamps, highest first. Ties keep roster order.
pub fn stamp_rankings(students: &[Student], rewards: &RewardLedger) -> Vec<StampRanking> {
    let mut rankings: Vec<StampRanking> = students
        .iter()
        .map(|student| StampRanking {
            id: student.id.clone(),
            name: student.name.clone(),
            stamps: student.stamps,
            has_milestone: has_milestone(student.stamps),
            last_stamp_at: rewards.last_stamp_at(&student.id),
        })
        .collect();
    rankings.sort_by(|a, b| b.stamps.cmp(&a.stamps));
    rankings
}

/// Stamp events across all students, newest first.
pub fn recent_stamp_logs(rewards: &RewardLedger, limit: usize) -> Vec<&RewardLogEntry> {
    let mut logs: Vec<&RewardLogEntry> = rewards.stamp_logs().collect();
    logs.reverse();
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs.truncate(limit);
    logs
}

/// Students whose name contains `query`, ignoring case. An empty query
/// matches everyone.
pub fn search_students<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    let needle = query.trim().to_lowercase();
    students
        .iter()
        .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
        .collect()
}
