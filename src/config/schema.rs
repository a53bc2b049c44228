use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::grading::ScoreScale;
use crate::record::WeightSet;

/// Main configuration.
///
/// Every field is optional; an empty file is a valid config.
///
/// Example YAML:
/// ```yaml
/// scale:
///   min: 0
///   max: 10
/// record: ~/grades/record.json
/// default_weights:
///   progress: 20
///   midterm: 20
///   practice: 20
///   final: 40
/// catalog:
///   - name: Core
///     courses:
///       - { code: IT001, name: Calculus, credits: 4 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Score range shared by normalization, aggregation and solving (default 0-10)
    #[serde(default)]
    pub scale: ScoreScale,

    /// Path to the program record (default ~/.config/gradewise/record.json)
    #[serde(default)]
    pub record: Option<PathBuf>,

    /// Weights given to imported subjects that carry none
    #[serde(default)]
    pub default_weights: WeightSet,

    #[serde(default)]
    pub catalog: Catalog,
}
