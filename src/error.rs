use thiserror::Error;

/// Errors raised by record edits and lookups.
///
/// Unparseable scores, credits and weights are never errors: they are treated
/// as absent values by the grading functions.
#[derive(Debug, Error, PartialEq)]
pub enum GradeError {
    /// All four components are known, so there is nothing left to solve for.
    #[error("target is locked: every component of '{subject}' already has a score")]
    TargetLocked { subject: String },

    #[error("semester not found: {0}")]
    SemesterNotFound(String),

    #[error("subject not found: {0}")]
    SubjectNotFound(String),

    #[error("unknown component '{0}' (expected progress, midterm, practice or final)")]
    UnknownComponent(String),

    #[error("target {target} is outside the score scale {min}..={max}")]
    TargetOutOfRange { target: f64, min: f64, max: f64 },

    #[error("invalid score scale {min}..={max}: {reason}")]
    InvalidScale { min: f64, max: f64, reason: String },
}

pub type Result<T, E = GradeError> = std::result::Result<T, E>;
