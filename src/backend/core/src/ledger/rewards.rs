//! Append-only stamp and penalty ledger.

use chrono::{DateTime, Utc};

use super::model::{RewardKind, RewardLogEntry, StudentId};

#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    entries: Vec<RewardLogEntry>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RewardLogEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: RewardLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RewardLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Events for one student in insertion order.
    pub fn logs_for<'a>(&'a self, student_id: &'a StudentId) -> impl Iterator<Item = &'a RewardLogEntry> + 'a {
        self.entries.iter().filter(move |e| &e.student_id == student_id)
    }

    /// Running penalty total: the sum of penalty values, not their count.
    pub fn penalty_total(&self, student_id: &StudentId) -> u64 {
        self.logs_for(student_id)
            .filter(|e| e.kind == RewardKind::Penalty)
            .map(|e| u64::from(e.value))
            .sum()
    }

    /// Stamp events across every student.
    pub fn stamp_logs(&self) -> impl Iterator<Item = &RewardLogEntry> {
        self.entries.iter().filter(|e| e.kind == RewardKind::Stamp)
    }

    /// When the student last received stamps.
    pub fn last_stamp_at(&self, student_id: &StudentId) -> Option<DateTime<Utc>> {
        self.logs_for(student_id)
            .filter(|e| e.kind == RewardKind::Stamp)
            .map(|e| e.timestamp)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::model::RecordId;
    use chrono::{Duration, Utc};

    fn event(id: &str, student: &str, kind: RewardKind, value: u32) -> RewardLogEntry {
        RewardLogEntry {
            id: RecordId::new(id),
            student_id: StudentId::new(student),
            kind,
            value,
            reason: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_penalty_total_is_a_sum() {
        let mut ledger = RewardLedger::new();
        ledger.append(event("p1", "kim", RewardKind::Penalty, 2));
        ledger.append(event("p2", "kim", RewardKind::Penalty, 3));
        ledger.append(event("s1", "kim", RewardKind::Stamp, 10));
        ledger.append(event("p3", "lee", RewardKind::Penalty, 7));

        assert_eq!(ledger.penalty_total(&StudentId::new("kim")), 5);
        assert_eq!(ledger.penalty_total(&StudentId::new("lee")), 7);
        assert_eq!(ledger.penalty_total(&StudentId::new("park")), 0);
    }

    #[test]
    fn test_logs_for_keeps_order() {
        let mut ledger = RewardLedger::new();
        ledger.append(event("s1", "kim", RewardKind::Stamp, 1));
        ledger.append(event("s2", "lee", RewardKind::Stamp, 1));
        ledger.append(event("p1", "kim", RewardKind::Penalty, 1));

        let kim = StudentId::new("kim");
        let ids: Vec<&str> = ledger.logs_for(&kim).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "p1"]);
        assert_eq!(ledger.stamp_logs().count(), 2);
    }

    #[test]
    fn test_last_stamp_at_ignores_penalties() {
        let mut ledger = RewardLedger::new();
        let kim = StudentId::new("kim");
        assert_eq!(ledger.last_stamp_at(&kim), None);

        let mut early = event("s1", "kim", RewardKind::Stamp, 1);
        early.timestamp = Utc::now() - Duration::days(2);
        let stamped_at = early.timestamp;
        ledger.append(early);
        ledger.append(event("p1", "kim", RewardKind::Penalty, 1));

        assert_eq!(ledger.last_stamp_at(&kim), Some(stamped_at));
    }
}
