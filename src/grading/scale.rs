use serde::{Deserialize, Serialize};

use crate::error::{GradeError, Result};

/// Valid range for component and subject scores.
///
/// One scale is shared by the normalizer, the aggregator and the solver.
/// The default is the 0-10 scale; a 0-100 deployment sets it in config:
///
/// ```yaml
/// scale:
///   min: 0
///   max: 100
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoreScale {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self::TEN
    }
}

impl ScoreScale {
    pub const TEN: ScoreScale = ScoreScale { min: 0.0, max: 10.0 };
    pub const HUNDRED: ScoreScale = ScoreScale {
        min: 0.0,
        max: 100.0,
    };

    pub fn new(min: f64, max: f64) -> Result<Self> {
        let scale = Self { min, max };
        scale.check()?;
        Ok(scale)
    }

    /// Reject non-finite or inverted bounds.
    pub fn check(&self) -> Result<()> {
        let reason = if !self.min.is_finite() || !self.max.is_finite() {
            Some("bounds must be finite numbers")
        } else if self.min >= self.max {
            Some("max must be greater than min")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GradeError::InvalidScale {
                min: self.min,
                max: self.max,
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Accept only finite targets inside the scale.
    pub fn check_target(&self, target: f64) -> Result<()> {
        if target.is_finite() && self.contains(target) {
            Ok(())
        } else {
            Err(GradeError::TargetOutOfRange {
                target,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// A required value above the ceiling means the target cannot be met.
    pub fn is_reachable(&self, required: f64) -> bool {
        required <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_is_ten() {
        assert_eq!(ScoreScale::default(), ScoreScale::TEN);
    }

    #[test]
    fn test_clamp() {
        let scale = ScoreScale::HUNDRED;
        assert_eq!(scale.clamp(150.0), 100.0);
        assert_eq!(scale.clamp(-3.0), 0.0);
        assert_eq!(scale.clamp(42.5), 42.5);
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let err = ScoreScale::new(10.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("max must be greater than min"));
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(ScoreScale::new(0.0, f64::INFINITY).is_err());
        assert!(ScoreScale::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_is_reachable() {
        let scale = ScoreScale::TEN;
        assert!(scale.is_reachable(10.0));
        assert!(scale.is_reachable(0.0));
        assert!(!scale.is_reachable(10.01));
    }

    #[test]
    fn test_check_target() {
        let scale = ScoreScale::TEN;
        assert!(scale.check_target(0.0).is_ok());
        assert!(scale.check_target(8.5).is_ok());
        assert!(scale.check_target(10.0).is_ok());
        assert!(scale.check_target(10.5).is_err());
        assert!(scale.check_target(-1.0).is_err());
        assert!(scale.check_target(1e308).is_err());
        assert!(scale.check_target(f64::NAN).is_err());
        assert!(scale.check_target(f64::INFINITY).is_err());
    }

    #[test]
    fn test_target_out_of_range_message() {
        let err = ScoreScale::HUNDRED.check_target(150.0).unwrap_err();
        assert_eq!(err.to_string(), "target 150 is outside the score scale 0..=100");
    }

    #[test]
    fn test_scale_parse() {
        let yaml = "min: 0\nmax: 100\n";
        let scale: ScoreScale = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(scale, ScoreScale::HUNDRED);
    }
}
