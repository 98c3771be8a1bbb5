//! Command and error counters.
//!
//! Counters go through the `metrics` facade. Without an installed recorder
//! they cost nothing; an embedding application can install any exporter.

use metrics::{counter, describe_counter};

pub const COMMANDS_TOTAL: &str = "tutor_commands_total";
pub const ERRORS_TOTAL: &str = "tutor_errors_total";
pub const SAVES_FAILED_TOTAL: &str = "tutor_saves_failed_total";

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(COMMANDS_TOTAL, "Console commands by kind and outcome");
    describe_counter!(ERRORS_TOTAL, "Errors by category and code");
    describe_counter!(SAVES_FAILED_TOTAL, "Collection saves that failed");
}

pub fn record_command(kind: &'static str, outcome: &'static str) {
    counter!(COMMANDS_TOTAL, "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_error(category: &'static str, code: &str) {
    counter!(ERRORS_TOTAL, "category" => category, "code" => code.to_string()).increment(1);
}

pub fn record_save_failure(collection: &'static str) {
    counter!(SAVES_FAILED_TOTAL, "collection" => collection).increment(1);
}
