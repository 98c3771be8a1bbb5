//! A tutor's working session over persisted ledgers.
//!
//! The workbook loads every collection when opened, routes console commands
//! through the [`Dispatcher`], and re-saves exactly the collections a
//! mutation touched. Saving is fire-and-forget: a failed save is logged and
//! counted, and the in-memory state stays as applied.

use tracing::{info, instrument, warn};

use crate::clock::IdClock;
use crate::command::{Dispatcher, Outcome};
use crate::error::{Result, TutorError};
use crate::ledger::{
    GlobalLogStore, Ledgers, RecordId, RewardLedger, Student, StudentId, StudentLedger,
};
use crate::persistence::{CollectionKey, CollectionStore};
use crate::telemetry::metrics;

pub struct Workbook<S: CollectionStore, C: IdClock> {
    ledgers: Ledgers,
    store: S,
    clock: C,
    current_student: Option<StudentId>,
}

impl<S: CollectionStore, C: IdClock> Workbook<S, C> {
    /// Load all collections from `store`.
    #[instrument(skip_all)]
    pub fn open(store: S, clock: C) -> Result<Self> {
        let ledgers = Ledgers {
            students: StudentLedger::from_students(load(&store, CollectionKey::Students)?),
            global_log: GlobalLogStore::from_entries(load(&store, CollectionKey::GradingLogs)?),
            rewards: RewardLedger::from_entries(load(&store, CollectionKey::RewardLogs)?),
        };
        info!(
            students = ledgers.students.len(),
            grading_logs = ledgers.global_log.len(),
            reward_logs = ledgers.rewards.len(),
            "Workbook opened"
        );
        Ok(Self {
            ledgers,
            store,
            clock,
            current_student: None,
        })
    }

    pub fn ledgers(&self) -> &Ledgers {
        &self.ledgers
    }

    pub fn students(&self) -> &StudentLedger {
        &self.ledgers.students
    }

    pub fn global_log(&self) -> &GlobalLogStore {
        &self.ledgers.global_log
    }

    pub fn rewards(&self) -> &RewardLedger {
        &self.ledgers.rewards
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn current_student(&self) -> Option<&Student> {
        self.current_student
            .as_ref()
            .and_then(|id| self.ledgers.students.get_student(id))
    }

    pub fn current_student_id(&self) -> Option<&StudentId> {
        self.current_student.as_ref()
    }

    /// Select the student that console commands apply to.
    pub fn select_student(&mut self, id: &StudentId) -> Result<&Student> {
        let student = self
            .ledgers
            .students
            .get_student(id)
            .ok_or_else(|| TutorError::student_not_found(id))?;
        self.current_student = Some(id.clone());
        Ok(student)
    }

    /// Look a student up by id, falling back to an exact name match.
    pub fn resolve_student(&self, key: &str) -> Option<&Student> {
        let students = &self.ledgers.students;
        students
            .get_student(&StudentId::new(key))
            .or_else(|| students.find_by_name(key))
    }

    pub fn add_student(&mut self, name: &str) -> Result<Student> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TutorError::invalid_input("Student name must not be empty"));
        }
        let id = StudentId::new(self.clock.new_id("student"));
        let student = self.ledgers.students.add_student(id, name).clone();
        self.persist(&[CollectionKey::Students]);
        Ok(student)
    }

    /// Run one console line against the selected student.
    #[instrument(skip(self), fields(student_id = ?self.current_student))]
    pub fn run_command(&mut self, raw: &str) -> Outcome {
        let outcome =
            Dispatcher::new(&mut self.ledgers, &self.clock).run(self.current_student.as_ref(), raw);
        self.persist(&outcome.touched);
        outcome
    }

    pub fn complete_homework(&mut self, student_id: &StudentId, homework_id: &RecordId) -> Result<()> {
        if !self.ledgers.students.contains(student_id) {
            return Err(TutorError::student_not_found(student_id));
        }
        if !self.ledgers.students.complete_homework(student_id, homework_id) {
            return Err(TutorError::homework_not_found(homework_id));
        }
        self.persist(&[CollectionKey::Students]);
        Ok(())
    }

    /// Redeem the milestone: set stamps back to zero.
    pub fn reset_stamps(&mut self, student_id: &StudentId) -> Result<()> {
        if !self.ledgers.students.contains(student_id) {
            return Err(TutorError::student_not_found(student_id));
        }
        self.ledgers.students.reset_stamps(student_id);
        info!(student_id = %student_id, "Stamps reset");
        self.persist(&[CollectionKey::Students]);
        Ok(())
    }

    /// Save the given collections, logging failures instead of returning them.
    fn persist(&self, keys: &[CollectionKey]) {
        for &key in keys {
            let result = match key {
                CollectionKey::Students => self.store.save(key, self.ledgers.students.students()),
                CollectionKey::GradingLogs => self.store.save(key, self.ledgers.global_log.entries()),
                CollectionKey::RewardLogs => self.store.save(key, self.ledgers.rewards.entries()),
            };
            if let Err(e) = result {
                warn!(collection = %key, error = %e, "Failed to save collection");
                metrics::record_save_failure(key.name());
            }
        }
    }
}

fn load<S: CollectionStore, T: serde::de::DeserializeOwned>(store: &S, key: CollectionKey) -> Result<Vec<T>> {
    store.load(key).map_err(|e| {
        e.log();
        e.with_internal_message(format!("loading {}", key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SequentialClock;
    use crate::command::Tone;
    use crate::persistence::MemoryStore;

    fn workbook() -> Workbook<MemoryStore, SequentialClock> {
        Workbook::open(MemoryStore::new(), SequentialClock::default()).unwrap()
    }

    #[test]
    fn test_add_student_persists_roster() {
        let mut wb = workbook();
        let kim = wb.add_student("  Kim ").unwrap();
        assert_eq!(kim.name, "Kim");
        assert_eq!(wb.store().save_count(CollectionKey::Students), 1);
        assert!(wb.add_student("   ").is_err());
    }

    #[test]
    fn test_run_command_saves_touched_collections_only() {
        let mut wb = workbook();
        let kim = wb.add_student("Kim").unwrap();
        wb.select_student(&kim.id).unwrap();

        wb.run_command("!stamp -1");
        assert_eq!(wb.store().save_count(CollectionKey::Students), 2);
        assert_eq!(wb.store().save_count(CollectionKey::RewardLogs), 0);

        wb.run_command("geometry 3 O");
        assert_eq!(wb.store().save_count(CollectionKey::GradingLogs), 1);

        wb.run_command("geometry 3 Z");
        assert_eq!(wb.store().save_count(CollectionKey::Students), 3);
    }

    #[test]
    fn test_run_without_selection_is_rejected() {
        let mut wb = workbook();
        wb.add_student("Kim").unwrap();
        let outcome = wb.run_command("geometry 3 O");
        assert_eq!(outcome.tone, Tone::Rejected);
        assert!(wb.global_log().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut wb = Workbook::open(MemoryStore::failing(), SequentialClock::default()).unwrap();
        let kim = wb.add_student("Kim").unwrap();
        wb.select_student(&kim.id).unwrap();

        let outcome = wb.run_command("!stamp +3");
        assert_eq!(outcome.tone, Tone::Success);
        assert_eq!(wb.current_student().unwrap().stamps, 3);
    }

    #[test]
    fn test_resolve_student_by_id_or_name() {
        let mut wb = workbook();
        let kim = wb.add_student("Kim").unwrap();
        assert_eq!(wb.resolve_student(kim.id.as_str()).unwrap().name, "Kim");
        assert_eq!(wb.resolve_student("Kim").unwrap().id, kim.id);
        assert!(wb.resolve_student("Lee").is_none());
    }

    #[test]
    fn test_complete_unknown_homework() {
        let mut wb = workbook();
        let kim = wb.add_student("Kim").unwrap();
        let err = wb
            .complete_homework(&kim.id, &RecordId::new("nope"))
            .unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::HomeworkNotFound);
    }
}
