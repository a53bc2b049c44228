use std::fmt;
use tracing::debug;

use super::normalize::{format_score, parse_number, round2};
use crate::record::{Program, Subject};

/// Marker returned in place of a score when a subject's weights don't add up to 100.
pub const INVALID_WEIGHTS: &str = "Bad %";

const WEIGHT_TOTAL: f64 = 100.0;
// Absorbs float noise only; 99.9 is still a failure
const WEIGHT_EPSILON: f64 = 1e-9;

/// Overall score of a subject.
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectScore {
    /// Externally supplied total, passed through untouched.
    Override(String),
    /// Weighted sum of the four components.
    Computed(f64),
    /// At least one component has no score yet.
    Incomplete,
    /// The four weights don't sum to exactly 100.
    InvalidWeights,
}

impl SubjectScore {
    /// Numeric value as the rendered text reads, if it is a number.
    pub fn value(&self) -> Option<f64> {
        match self {
            SubjectScore::Override(text) => parse_number(text),
            SubjectScore::Computed(v) => Some(round2(*v)),
            SubjectScore::Incomplete | SubjectScore::InvalidWeights => None,
        }
    }

    pub fn is_invalid_weights(&self) -> bool {
        matches!(self, SubjectScore::InvalidWeights)
    }
}

impl fmt::Display for SubjectScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectScore::Override(text) => f.write_str(text),
            SubjectScore::Computed(v) => f.write_str(&format_score(*v)),
            SubjectScore::Incomplete => Ok(()),
            SubjectScore::InvalidWeights => f.write_str(INVALID_WEIGHTS),
        }
    }
}

/// Compute a subject's overall score.
///
/// The override score wins whenever it is set, even over broken weights.
/// Otherwise weights must total 100, and every component must have a numeric
/// score; a subject is never partially scored.
pub fn subject_score(subject: &Subject) -> SubjectScore {
    if subject.has_override() {
        return SubjectScore::Override(subject.override_score.clone());
    }

    if !weights_valid(subject) {
        return SubjectScore::InvalidWeights;
    }

    let mut total = 0.0;
    for (_, slot) in subject.components.iter() {
        match slot.score_value() {
            Some(score) => total += score * slot.weight_value() / WEIGHT_TOTAL,
            None => return SubjectScore::Incomplete,
        }
    }

    SubjectScore::Computed(total)
}

/// Text form of [`subject_score`]: two decimals, empty, or [`INVALID_WEIGHTS`].
pub fn subject_score_text(subject: &Subject) -> String {
    subject_score(subject).to_string()
}

pub fn weights_valid(subject: &Subject) -> bool {
    (subject.weight_total() - WEIGHT_TOTAL).abs() < WEIGHT_EPSILON
}

/// Credit-weighted average over a set of subjects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CreditAverage {
    pub total_credits: f64,
    pub average: f64,
}

impl fmt::Display for CreditAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_score(self.average))
    }
}

/// Average the subjects' scores weighted by their credits.
///
/// Subjects whose score or credits don't parse as numbers are skipped. With no
/// usable credits both fields are zero.
pub fn semester_average<'a, I>(subjects: I) -> CreditAverage
where
    I: IntoIterator<Item = &'a Subject>,
{
    let mut total_credits = 0.0;
    let mut total_score = 0.0;

    for subject in subjects {
        let score = subject_score(subject).value();
        let credits = subject.credits_value();
        match (score, credits) {
            (Some(score), Some(credits)) => {
                total_credits += credits;
                total_score += score * credits;
            }
            _ => debug!(
                subject = %subject.display_name(),
                "Skipping subject without numeric score and credits"
            ),
        }
    }

    if total_credits == 0.0 {
        return CreditAverage::default();
    }

    CreditAverage {
        total_credits,
        average: round2(total_score / total_credits),
    }
}

/// Credit-weighted average across every semester of the program.
pub fn program_average(program: &Program) -> CreditAverage {
    semester_average(program.subjects())
}

/// Sum of every parseable credit count, scored or not.
pub fn enrolled_credits(program: &Program) -> f64 {
    program.subjects().filter_map(Subject::credits_value).sum()
}
