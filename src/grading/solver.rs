use std::collections::BTreeMap;
use tracing::debug;

use super::normalize::{format_score, round2};
use super::scale::ScoreScale;
use crate::record::{Component, Subject};

/// Score still needed on each unset component to reach a target.
///
/// Every missing component gets the same value. Empty when there is nothing
/// to solve for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequiredScores {
    needed: f64,
    missing: Vec<Component>,
}

impl RequiredScores {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    /// The shared required value, rounded to two decimals.
    pub fn value(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(round2(self.needed))
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.missing
    }

    pub fn get(&self, component: Component) -> Option<String> {
        self.missing
            .contains(&component)
            .then(|| format_score(self.needed))
    }

    pub fn to_map(&self) -> BTreeMap<Component, String> {
        self.missing
            .iter()
            .map(|c| (*c, format_score(self.needed)))
            .collect()
    }

    /// False when the required value is above the scale ceiling.
    pub fn is_reachable(&self, scale: &ScoreScale) -> bool {
        self.value().is_none_or(|v| scale.is_reachable(v))
    }

    /// Write the solved values into the subject's required fields.
    pub fn apply_to(&self, subject: &mut Subject) {
        for (component, text) in self.to_map() {
            subject.slot_mut(component).required = text;
        }
    }
}

/// Solve for the single score needed on every unset component.
///
/// Known components are those with a numeric raw score; the override score is
/// ignored. The result is floored at zero but has no upper bound, so a value
/// above the scale maximum means the target is out of reach.
pub fn required_scores(subject: &Subject, target: f64) -> RequiredScores {
    let mut known_contribution = 0.0;
    let mut missing_weight = 0.0;
    let mut missing = Vec::new();

    for (component, slot) in subject.components.iter() {
        let weight = slot.weight_value() / 100.0;
        match slot.score_value() {
            Some(score) => known_contribution += score * weight,
            None => {
                missing_weight += weight;
                missing.push(component);
            }
        }
    }

    if missing_weight == 0.0 {
        debug!(
            subject = %subject.display_name(),
            missing = missing.len(),
            "No missing weight left to solve for"
        );
        return RequiredScores::default();
    }

    let needed = ((target - known_contribution) / missing_weight).max(0.0);

    RequiredScores { needed, missing }
}
