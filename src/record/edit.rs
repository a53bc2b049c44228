use tracing::{debug, warn};

use super::types::{Component, Subject};
use crate::error::{GradeError, Result};
use crate::grading::{normalize, normalize_weight, required_scores, ScoreScale};

/// A single user edit to one field of a subject.
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectEdit {
    Score(Component, String),
    Weight(Component, String),
    Target(String),
    Credits(String),
    Code(String),
    Name(String),
    Override(String),
}

/// Where a subject stands with respect to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePhase {
    /// No target entered.
    NoTarget,
    /// A target is entered but nothing is solved (non-numeric target, or no
    /// weight left on the missing components).
    TargetSet,
    /// Required values are filled in on the missing components.
    PartialSolved,
    /// Every component has a score; the target can no longer change.
    AllKnown,
}

pub fn solve_phase(subject: &Subject) -> SolvePhase {
    if subject.all_known() {
        SolvePhase::AllKnown
    } else if !subject.has_target() {
        SolvePhase::NoTarget
    } else if subject
        .components
        .iter()
        .any(|(_, slot)| !slot.required.is_empty())
    {
        SolvePhase::PartialSolved
    } else {
        SolvePhase::TargetSet
    }
}

/// Apply an edit to a subject in place.
///
/// Score and weight edits are normalized, then every required value is
/// cleared and re-solved from scratch when the target is numeric. Target edits
/// are refused once all four components are known.
pub fn apply_edit(subject: &mut Subject, edit: SubjectEdit, scale: &ScoreScale) -> Result<()> {
    match edit {
        SubjectEdit::Score(component, raw) => {
            subject.slot_mut(component).score = normalize(&raw, scale);
            resolve(subject);
        }
        SubjectEdit::Weight(component, raw) => {
            subject.slot_mut(component).weight = normalize_weight(&raw);
            resolve(subject);
        }
        SubjectEdit::Target(raw) => {
            if subject.all_known() {
                warn!(subject = %subject.display_name(), "Refusing target edit on a fully scored subject");
                return Err(GradeError::TargetLocked {
                    subject: subject.display_name(),
                });
            }
            subject.target = raw.trim().to_string();
            resolve(subject);
        }
        SubjectEdit::Credits(raw) => subject.credits = raw,
        SubjectEdit::Code(raw) => subject.code = raw,
        SubjectEdit::Name(raw) => subject.name = raw,
        SubjectEdit::Override(raw) => subject.override_score = raw,
    }
    Ok(())
}

/// Clear stale required values, then solve again if a numeric target is set.
pub fn resolve(subject: &mut Subject) {
    subject.clear_required();

    let Some(target) = subject.target_value() else {
        debug!(subject = %subject.display_name(), "Required values cleared, no numeric target");
        return;
    };

    let required = required_scores(subject, target);
    debug!(
        subject = %subject.display_name(),
        expected = target,
        required = ?required.value(),
        "Re-solved required values"
    );
    required.apply_to(subject);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(subject: &mut Subject, e: SubjectEdit) {
        apply_edit(subject, e, &ScoreScale::TEN).unwrap();
    }

    fn score(c: Component, raw: &str) -> SubjectEdit {
        SubjectEdit::Score(c, raw.to_string())
    }

    #[test]
    fn test_score_edit_normalizes() {
        let mut subject = Subject::new();
        edit(&mut subject, score(Component::Progress, " 12 "));
        assert_eq!(subject.slot(Component::Progress).score, "10");
        edit(&mut subject, score(Component::Midterm, "7.456"));
        assert_eq!(subject.slot(Component::Midterm).score, "7.46");
        edit(&mut subject, score(Component::Practice, "oops"));
        assert_eq!(subject.slot(Component::Practice).score, "");
    }

    #[test]
    fn test_target_then_scores_resolves() {
        let mut subject = Subject::new();
        edit(&mut subject, SubjectEdit::Target("8".to_string()));
        // Nothing known yet: 8 needed everywhere
        for (_, slot) in subject.components.iter() {
            assert_eq!(slot.required, "8.00");
        }
        assert_eq!(solve_phase(&subject), SolvePhase::PartialSolved);

        edit(&mut subject, score(Component::Progress, "8"));
        edit(&mut subject, score(Component::Midterm, "7"));
        assert!(subject.slot(Component::Progress).required.is_empty());
        assert!(subject.slot(Component::Midterm).required.is_empty());
        assert_eq!(subject.slot(Component::Practice).required, "8.33");
        assert_eq!(subject.slot(Component::Final).required, "8.33");
    }

    #[test]
    fn test_score_edit_without_target_clears() {
        let mut subject = Subject::new();
        subject.slot_mut(Component::Final).required = "9.00".to_string();
        edit(&mut subject, score(Component::Progress, "8"));
        for (_, slot) in subject.components.iter() {
            assert!(slot.required.is_empty());
        }
        assert_eq!(solve_phase(&subject), SolvePhase::NoTarget);
    }

    #[test]
    fn test_clearing_a_score_reopens_it() {
        let mut subject = Subject::new();
        edit(&mut subject, score(Component::Progress, "8"));
        edit(&mut subject, score(Component::Midterm, "7"));
        edit(&mut subject, SubjectEdit::Target("8".to_string()));
        edit(&mut subject, score(Component::Midterm, ""));

        assert_eq!(subject.slot(Component::Midterm).score, "");
        // (8 - 1.6) / 0.8
        assert_eq!(subject.slot(Component::Midterm).required, "8.00");
        assert_eq!(subject.slot(Component::Final).required, "8.00");
    }

    #[test]
    fn test_last_score_clears_everything() {
        let mut subject = Subject::new();
        edit(&mut subject, SubjectEdit::Target("6".to_string()));
        for c in Component::ALL {
            edit(&mut subject, score(c, "7"));
        }
        for (_, slot) in subject.components.iter() {
            assert!(slot.required.is_empty());
        }
        assert_eq!(solve_phase(&subject), SolvePhase::AllKnown);
    }

    #[test]
    fn test_target_locked_when_all_known() {
        let mut subject = Subject::new();
        for c in Component::ALL {
            edit(&mut subject, score(c, "7"));
        }
        let result = apply_edit(
            &mut subject,
            SubjectEdit::Target("9".to_string()),
            &ScoreScale::TEN,
        );
        assert!(matches!(result, Err(GradeError::TargetLocked { .. })));
        assert!(subject.target.is_empty());
    }

    #[test]
    fn test_non_numeric_target_stays_unsolved() {
        let mut subject = Subject::new();
        edit(&mut subject, SubjectEdit::Target("pass".to_string()));
        assert_eq!(subject.target, "pass");
        assert_eq!(solve_phase(&subject), SolvePhase::TargetSet);
        for (_, slot) in subject.components.iter() {
            assert!(slot.required.is_empty());
        }
    }

    #[test]
    fn test_weight_edit_resolves() {
        let mut subject = Subject::new();
        edit(&mut subject, score(Component::Progress, "8"));
        edit(&mut subject, score(Component::Midterm, "7"));
        edit(&mut subject, score(Component::Practice, "8"));
        edit(&mut subject, SubjectEdit::Target("8".to_string()));
        assert_eq!(subject.slot(Component::Final).required, "8.50");

        edit(
            &mut subject,
            SubjectEdit::Weight(Component::Practice, "0".to_string()),
        );
        edit(
            &mut subject,
            SubjectEdit::Weight(Component::Final, "60.9".to_string()),
        );
        assert_eq!(subject.slot(Component::Final).weight, "60");
        // (8 - 3.0) / 0.6
        assert_eq!(subject.slot(Component::Final).required, "8.33");
    }

    #[test]
    fn test_unreachable_target_is_kept() {
        let mut subject = Subject::new();
        edit(&mut subject, score(Component::Progress, "2"));
        edit(&mut subject, score(Component::Midterm, "2"));
        edit(&mut subject, score(Component::Practice, "2"));
        edit(&mut subject, SubjectEdit::Target("9".to_string()));
        assert_eq!(subject.slot(Component::Final).required, "19.50");
    }

    #[test]
    fn test_plain_fields_are_stored() {
        let mut subject = Subject::new();
        edit(&mut subject, SubjectEdit::Code("IT001".to_string()));
        edit(&mut subject, SubjectEdit::Name("Calculus".to_string()));
        edit(&mut subject, SubjectEdit::Credits("4".to_string()));
        edit(&mut subject, SubjectEdit::Override("8.7".to_string()));
        assert_eq!(subject.display_name(), "IT001 Calculus");
        assert_eq!(subject.credits, "4");
        assert_eq!(subject.override_score, "8.7");
    }
}
