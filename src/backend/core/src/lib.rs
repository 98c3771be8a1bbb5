//! # Tutor Core
//!
//! Grading results, homework and a stamp/penalty ledger for a single tutor,
//! driven by a compact text command language.
//!
//! ## Architecture
//!
//! - **Command**: parser for console lines and the dispatcher that applies them
//! - **Ledger**: student roster, global grading log and reward log
//! - **Views**: derived aggregates (today's mistakes, rankings, summaries)
//! - **Persistence**: wholesale JSON collections behind a store trait
//! - **Workbook**: a session tying ledgers, store and clock together
//! - **Telemetry**: structured logging and metrics counters

pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod ledger;
pub mod persistence;
pub mod telemetry;
pub mod views;
pub mod workbook;

pub use error::{ErrorCode, ErrorContext, ErrorSeverity, Result, TutorError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::{IdClock, SequentialClock, SystemClock};
    pub use crate::command::{
        parse, Action, Command, DispatchError, Dispatcher, Outcome, ParseError, Tone,
    };
    pub use crate::config::TutorConfig;
    pub use crate::error::{ErrorCode, ErrorContext, Result, TutorError};
    pub use crate::ledger::{
        GlobalLogStore, GradeStatus, Homework, HomeworkState, Ledgers, LogEntry, RecordId,
        RewardKind, RewardLedger, RewardLogEntry, Student, StudentId, StudentLedger,
        MILESTONE_STAMPS,
    };
    pub use crate::persistence::{CollectionKey, CollectionStore, JsonFileStore, MemoryStore};
    pub use crate::views::{StampRanking, StudentSummary};
    pub use crate::workbook::Workbook;
}
