//! Per-student ledger: roster, grading logs, homework and stamp balances.

use tracing::debug;

use super::model::{Homework, HomeworkState, LogEntry, RecordId, Student, StudentId};

/// Owns every student and the records nested under them.
///
/// Students are kept in insertion order and are never removed. Mutations
/// that name an unknown student are no-ops; callers check existence with
/// [`StudentLedger::get_student`] first.
#[derive(Debug, Clone, Default)]
pub struct StudentLedger {
    students: Vec<Student>,
}

impl StudentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from a persisted collection.
    pub fn from_students(students: Vec<Student>) -> Self {
        Self { students }
    }

    /// Create a student with zero stamps and empty lists at the end of the
    /// roster.
    pub fn add_student(&mut self, id: StudentId, name: impl Into<String>) -> &Student {
        let student = Student::new(id, name);
        debug!(student_id = %student.id, name = %student.name, "Student added");
        self.students.push(student);
        &self.students[self.students.len() - 1]
    }

    pub fn get_student(&self, id: &StudentId) -> Option<&Student> {
        self.students.iter().find(|s| &s.id == id)
    }

    /// First student whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, id: &StudentId) -> bool {
        self.get_student(id).is_some()
    }

    /// All students in insertion order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn append_log(&mut self, student_id: &StudentId, entry: LogEntry) {
        if let Some(student) = self.student_mut(student_id) {
            student.logs.push(entry);
        }
    }

    pub fn append_homework(&mut self, student_id: &StudentId, homework: Homework) {
        if let Some(student) = self.student_mut(student_id) {
            student.homework.push(homework);
        }
    }

    /// Mark a homework item completed.
    ///
    /// Returns whether the item exists. Completing an already completed item
    /// leaves it unchanged.
    pub fn complete_homework(&mut self, student_id: &StudentId, homework_id: &RecordId) -> bool {
        let Some(student) = self.student_mut(student_id) else {
            return false;
        };
        let Some(homework) = student.homework.iter_mut().find(|h| &h.id == homework_id) else {
            return false;
        };
        let state = homework.state();
        if state.can_transition_to(&HomeworkState::Completed) {
            homework.completed = true;
        } else if state.is_terminal() {
            debug!(homework_id = %homework_id, "Homework already completed");
        }
        true
    }

    /// Apply `delta` to the stamp balance, flooring at zero.
    pub fn adjust_stamps(&mut self, student_id: &StudentId, delta: i64) {
        if let Some(student) = self.student_mut(student_id) {
            let next = (i64::from(student.stamps) + delta).clamp(0, i64::from(u32::MAX));
            student.stamps = next as u32;
        }
    }

    pub fn reset_stamps(&mut self, student_id: &StudentId) {
        if let Some(student) = self.student_mut(student_id) {
            student.stamps = 0;
        }
    }

    fn student_mut(&mut self, id: &StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| &s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::model::GradeStatus;
    use chrono::Utc;

    fn ledger_with_kim() -> (StudentLedger, StudentId) {
        let mut ledger = StudentLedger::new();
        let id = StudentId::new("student-1");
        ledger.add_student(id.clone(), "Kim");
        (ledger, id)
    }

    fn homework(id: &str) -> Homework {
        Homework {
            id: RecordId::new(id),
            unit: "algebra".to_string(),
            range: "12-15p".to_string(),
            assigned_at: Utc::now(),
            completed: false,
        }
    }

    #[test]
    fn test_add_student_starts_empty() {
        let (ledger, id) = ledger_with_kim();
        let kim = ledger.get_student(&id).unwrap();
        assert_eq!(kim.name, "Kim");
        assert_eq!(kim.stamps, 0);
        assert!(kim.logs.is_empty());
        assert!(kim.homework.is_empty());
    }

    #[test]
    fn test_students_keep_insertion_order() {
        let mut ledger = StudentLedger::new();
        ledger.add_student(StudentId::new("b"), "Park");
        ledger.add_student(StudentId::new("a"), "Lee");
        let names: Vec<&str> = ledger.students().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Park", "Lee"]);
    }

    #[test]
    fn test_adjust_stamps_floors_at_zero() {
        let (mut ledger, id) = ledger_with_kim();
        ledger.adjust_stamps(&id, -100);
        assert_eq!(ledger.get_student(&id).unwrap().stamps, 0);

        ledger.adjust_stamps(&id, 5);
        ledger.adjust_stamps(&id, -3);
        assert_eq!(ledger.get_student(&id).unwrap().stamps, 2);
    }

    #[test]
    fn test_reset_stamps() {
        let (mut ledger, id) = ledger_with_kim();
        ledger.adjust_stamps(&id, 120);
        assert!(ledger.get_student(&id).unwrap().has_milestone());
        ledger.reset_stamps(&id);
        assert_eq!(ledger.get_student(&id).unwrap().stamps, 0);
        assert!(!ledger.get_student(&id).unwrap().has_milestone());
    }

    #[test]
    fn test_complete_homework_is_idempotent() {
        let (mut ledger, id) = ledger_with_kim();
        ledger.append_homework(&id, homework("homework-1"));
        ledger.append_homework(&id, homework("homework-2"));
        let before = ledger.get_student(&id).unwrap().homework[0].clone();

        assert!(ledger.complete_homework(&id, &RecordId::new("homework-1")));
        assert!(ledger.complete_homework(&id, &RecordId::new("homework-1")));

        let kim = ledger.get_student(&id).unwrap();
        assert_eq!(kim.homework.len(), 2);
        assert_eq!(kim.homework[0].state(), HomeworkState::Completed);
        assert_eq!(kim.homework[0].unit, before.unit);
        assert_eq!(kim.homework[0].range, before.range);
        assert_eq!(kim.homework[0].assigned_at, before.assigned_at);
        assert!(!kim.homework[1].completed);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (mut ledger, id) = ledger_with_kim();
        let ghost = StudentId::new("ghost");

        ledger.append_log(
            &ghost,
            LogEntry {
                id: RecordId::new("log-1"),
                student_id: ghost.clone(),
                unit: "algebra".to_string(),
                question: "1".to_string(),
                status: GradeStatus::Correct,
                timestamp: Utc::now(),
            },
        );
        ledger.adjust_stamps(&ghost, 10);
        assert!(!ledger.complete_homework(&ghost, &RecordId::new("homework-1")));
        assert!(!ledger.complete_homework(&id, &RecordId::new("missing")));

        assert_eq!(ledger.len(), 1);
        assert!(ledger.get_student(&id).unwrap().logs.is_empty());
        assert!(ledger.get_student(&ghost).is_none());
    }
}
