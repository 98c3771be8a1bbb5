//! Error handling for Tutor Core.
//!
//! This module provides:
//! - Stable, machine-readable error codes grouped by category
//! - User-friendly messages kept apart from internal detail
//! - Severity-based logging through `tracing`
//! - An error counter through `metrics`
//!
//! Command rejections ([`ParseError`], [`DispatchError`]) are ordinary values
//! returned to the console. They convert into [`TutorError`] when they cross
//! an API that returns `Result`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tutor_core::error::{ErrorContext, Result};
//!
//! fn read_students(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).context("Failed to read students")
//! }
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::command::{DispatchError, ParseError};
use crate::telemetry::metrics;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for Tutor operations.
pub type Result<T> = std::result::Result<T, TutorError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Command Errors (1000-1099)
    TooFewTokens,
    InvalidStatus,
    InvalidAmount,

    // Ledger Errors (1100-1199)
    NoStudentSelected,
    StudentNotFound,
    HomeworkNotFound,
    InvalidInput,

    // Storage Errors (2000-2099)
    StorageError,
    StorageUnavailable,

    // Serialization Errors (2200-2299)
    SerializationError,
    DeserializationError,

    // Configuration Errors (5000-5099)
    ConfigurationError,

    // Internal Errors (9000-9099)
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::TooFewTokens => 1000,
            Self::InvalidStatus => 1001,
            Self::InvalidAmount => 1002,

            Self::NoStudentSelected => 1100,
            Self::StudentNotFound => 1101,
            Self::HomeworkNotFound => 1102,
            Self::InvalidInput => 1103,

            Self::StorageError => 2000,
            Self::StorageUnavailable => 2001,

            Self::SerializationError => 2200,
            Self::DeserializationError => 2201,

            Self::ConfigurationError => 5000,

            Self::InternalError => 9000,
        }
    }

    /// Get the error category for grouping.
    pub const fn category(&self) -> &'static str {
        match self.numeric_code() {
            1000..=1099 => "command",
            1100..=1199 => "ledger",
            2000..=2099 => "storage",
            2200..=2299 => "serialization",
            5000..=5099 => "configuration",
            9000..=9099 => "internal",
            _ => "unknown",
        }
    }

    /// Whether the error came from tutor input rather than the system.
    pub const fn is_user_error(&self) -> bool {
        matches!(self.numeric_code(), 1000..=1199)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Severity
// ═══════════════════════════════════════════════════════════════════════════════

/// Severity level for errors (affects logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// User errors (bad command, unknown student)
    Low,
    /// Storage or configuration problems the tutor can fix
    Medium,
    /// Bugs
    High,
}

impl ErrorSeverity {
    pub const fn from_code(code: &ErrorCode) -> Self {
        match code {
            ErrorCode::TooFewTokens
            | ErrorCode::InvalidStatus
            | ErrorCode::InvalidAmount
            | ErrorCode::NoStudentSelected
            | ErrorCode::StudentNotFound
            | ErrorCode::HomeworkNotFound
            | ErrorCode::InvalidInput => Self::Low,

            ErrorCode::StorageError
            | ErrorCode::StorageUnavailable
            | ErrorCode::SerializationError
            | ErrorCode::DeserializationError
            | ErrorCode::ConfigurationError => Self::Medium,

            ErrorCode::InternalError => Self::High,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main Error Type
// ═══════════════════════════════════════════════════════════════════════════════

/// The main error type for Tutor Core.
#[derive(Error, Debug)]
pub struct TutorError {
    /// Machine-readable error code
    code: ErrorCode,

    /// Message safe to show the tutor
    user_message: Cow<'static, str>,

    /// Detailed internal message (for logging only)
    internal_message: Option<String>,

    /// The source error that caused this error
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for TutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.user_message)?;
        if let Some(ref internal) = self.internal_message {
            write!(f, " (internal: {})", internal)?;
        }
        Ok(())
    }
}

impl TutorError {
    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new error with code and user message.
    pub fn new(code: ErrorCode, user_message: impl Into<Cow<'static, str>>) -> Self {
        let error = Self {
            code,
            user_message: user_message.into(),
            internal_message: None,
            source: None,
        };
        metrics::record_error(error.code.category(), &error.code.to_string());
        error
    }

    /// Create an error with both user and internal messages.
    pub fn with_internal(
        code: ErrorCode,
        user_message: impl Into<Cow<'static, str>>,
        internal_message: impl Into<String>,
    ) -> Self {
        let mut error = Self::new(code, user_message);
        error.internal_message = Some(internal_message.into());
        error
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_internal(ErrorCode::InternalError, "An internal error occurred", message)
    }

    pub fn student_not_found(id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::StudentNotFound, format!("Student not found: {}", id))
    }

    pub fn homework_not_found(id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::HomeworkNotFound, format!("Homework not found: {}", id))
    }

    pub fn invalid_input(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn storage(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_internal_message(mut self, message: impl Into<String>) -> Self {
        self.internal_message = Some(message.into());
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn internal_message(&self) -> Option<&str> {
        self.internal_message.as_deref()
    }

    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::from_code(&self.code)
    }

    /// Log this error with appropriate severity.
    pub fn log(&self) {
        let code = self.code.to_string();
        let category = self.code.category();

        match self.severity() {
            ErrorSeverity::High => {
                error!(
                    error_code = %code,
                    category = category,
                    user_message = %self.user_message,
                    internal_message = ?self.internal_message,
                    source = ?self.source,
                    "Internal error"
                );
            }
            ErrorSeverity::Medium => {
                warn!(
                    error_code = %code,
                    category = category,
                    user_message = %self.user_message,
                    internal_message = ?self.internal_message,
                    "Operational error"
                );
            }
            ErrorSeverity::Low => {
                tracing::debug!(
                    error_code = %code,
                    category = category,
                    user_message = %self.user_message,
                    "Rejected input"
                );
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Context Extension Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with error code.
    fn with_error_code(self, code: ErrorCode) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| TutorError::internal(message.into()).with_source(e))
    }

    fn with_error_code(self, code: ErrorCode) -> Result<T> {
        self.map_err(|e| TutorError::new(code, e.to_string()).with_source(e))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| TutorError::new(ErrorCode::InvalidInput, message.into()))
    }

    fn with_error_code(self, code: ErrorCode) -> Result<T> {
        self.ok_or_else(|| TutorError::new(code, "Resource not found"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════════════════

impl From<ParseError> for TutorError {
    fn from(error: ParseError) -> Self {
        let code = match &error {
            ParseError::TooFewTokens { .. } => ErrorCode::TooFewTokens,
            ParseError::InvalidStatus { .. } => ErrorCode::InvalidStatus,
            ParseError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<DispatchError> for TutorError {
    fn from(error: DispatchError) -> Self {
        let code = match &error {
            DispatchError::NoStudentSelected => ErrorCode::NoStudentSelected,
            DispatchError::StudentNotFound(_) => ErrorCode::StudentNotFound,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<std::io::Error> for TutorError {
    fn from(error: std::io::Error) -> Self {
        let code = match error.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorCode::StorageUnavailable,
            _ => ErrorCode::StorageError,
        };
        Self::with_internal(code, "Failed to access ledger storage", error.to_string())
            .with_source(error)
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(error: serde_json::Error) -> Self {
        let code = if error.is_syntax() || error.is_data() || error.is_eof() {
            ErrorCode::DeserializationError
        } else {
            ErrorCode::SerializationError
        };
        Self::with_internal(code, "Failed to process ledger data", error.to_string())
            .with_source(error)
    }
}

impl From<config::ConfigError> for TutorError {
    fn from(error: config::ConfigError) -> Self {
        Self::with_internal(
            ErrorCode::ConfigurationError,
            "Invalid configuration",
            error.to_string(),
        )
        .with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StudentId;

    #[test]
    fn test_error_code_categories() {
        assert_eq!(ErrorCode::InvalidStatus.category(), "command");
        assert_eq!(ErrorCode::StudentNotFound.category(), "ledger");
        assert_eq!(ErrorCode::StorageError.category(), "storage");
        assert_eq!(ErrorCode::DeserializationError.category(), "serialization");
        assert!(ErrorCode::TooFewTokens.is_user_error());
        assert!(!ErrorCode::StorageError.is_user_error());
    }

    #[test]
    fn test_parse_error_conversion() {
        let error: TutorError = ParseError::InvalidStatus {
            token: "Q".to_string(),
        }
        .into();
        assert_eq!(error.code(), ErrorCode::InvalidStatus);
        assert_eq!(error.severity(), ErrorSeverity::Low);
        assert_eq!(error.user_message(), "Invalid status: Q (expected O/X/△)");
    }

    #[test]
    fn test_dispatch_error_conversion() {
        let error: TutorError = DispatchError::StudentNotFound(StudentId::new("s-9")).into();
        assert_eq!(error.code(), ErrorCode::StudentNotFound);
        assert_eq!(error.to_string(), "[StudentNotFound] Student not found: s-9");
    }

    #[test]
    fn test_json_error_is_deserialization() {
        let bad = serde_json::from_str::<Vec<u32>>("[1, 2").unwrap_err();
        let error: TutorError = bad.into();
        assert_eq!(error.code(), ErrorCode::DeserializationError);
        assert!(error.internal_message().is_some());
    }

    #[test]
    fn test_option_context() {
        let missing: Option<u32> = None;
        let error = missing.with_error_code(ErrorCode::HomeworkNotFound).unwrap_err();
        assert_eq!(error.code(), ErrorCode::HomeworkNotFound);
    }
}
