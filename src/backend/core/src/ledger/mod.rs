//! Ledger stores
//!
//! - **`model`**: records shared by every store (students, grading entries,
//!   homework, reward events) and the closed status/kind enums.
//! - **`students`**: the roster with nested logs, homework and stamp balances.
//! - **`global_log`**: the cross-student grading log.
//! - **`rewards`**: the stamp/penalty event log.

pub mod global_log;
pub mod model;
pub mod rewards;
pub mod students;

pub use global_log::GlobalLogStore;
pub use model::*;
pub use rewards::RewardLedger;
pub use students::StudentLedger;

/// The three ledgers a session mutates together.
#[derive(Debug, Clone, Default)]
pub struct Ledgers {
    pub students: StudentLedger,
    pub global_log: GlobalLogStore,
    pub rewards: RewardLedger,
}

impl Ledgers {
    pub fn new() -> Self {
        Self::default()
    }
}
