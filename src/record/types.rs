use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::catalog::Course;
use crate::error::GradeError;
use crate::grading::normalize::parse_number;

/// One of the four fixed score slots of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Progress,
    Midterm,
    Practice,
    Final,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::Progress,
        Component::Midterm,
        Component::Practice,
        Component::Final,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Progress => "progress",
            Component::Midterm => "midterm",
            Component::Practice => "practice",
            Component::Final => "final",
        }
    }

    /// Column header used by the table formatter.
    pub fn short_label(self) -> &'static str {
        match self {
            Component::Progress => "PRG",
            Component::Midterm => "MID",
            Component::Practice => "PRC",
            Component::Final => "FIN",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Component {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "progress" | "prg" => Ok(Component::Progress),
            "midterm" | "mid" => Ok(Component::Midterm),
            "practice" | "prc" => Ok(Component::Practice),
            "final" | "fin" => Ok(Component::Final),
            _ => Err(GradeError::UnknownComponent(s.to_string())),
        }
    }
}

/// Weight percentages for the four components.
///
/// ```yaml
/// default_weights:
///   progress: 20
///   midterm: 20
///   practice: 20
///   final: 40
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WeightSet {
    pub progress: u32,
    pub midterm: u32,
    pub practice: u32,
    #[serde(rename = "final")]
    pub final_term: u32,
}

impl Default for WeightSet {
    fn default() -> Self {
        Self {
            progress: 20,
            midterm: 20,
            practice: 20,
            final_term: 40,
        }
    }
}

impl WeightSet {
    pub fn get(&self, component: Component) -> u32 {
        match component {
            Component::Progress => self.progress,
            Component::Midterm => self.midterm,
            Component::Practice => self.practice,
            Component::Final => self.final_term,
        }
    }

    /// Sum of the four weights, widened so out-of-range config values can't overflow.
    pub fn total(&self) -> u64 {
        Component::ALL.iter().map(|c| u64::from(self.get(*c))).sum()
    }
}

/// A single component slot: raw score, weight and solved requirement.
///
/// All three are text. Empty means "not entered" (or "not solvable" for
/// `required`), which is different from zero.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ComponentSlot {
    #[serde(deserialize_with = "lenient_text")]
    pub score: String,
    #[serde(deserialize_with = "lenient_text")]
    pub weight: String,
    #[serde(deserialize_with = "lenient_text")]
    pub required: String,
}

impl ComponentSlot {
    fn weighted(weight: u32) -> Self {
        Self {
            weight: weight.to_string(),
            ..Self::default()
        }
    }

    pub fn score_value(&self) -> Option<f64> {
        parse_number(&self.score)
    }

    /// Weight as a percentage; unparseable weights count as zero.
    pub fn weight_value(&self) -> f64 {
        parse_number(&self.weight).unwrap_or(0.0)
    }

    pub fn required_value(&self) -> Option<f64> {
        parse_number(&self.required)
    }
}

/// The four slots of a subject, indexed by [`Component`].
///
/// Serialized as a map keyed by component name so record files stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NamedSlots", into = "NamedSlots")]
pub struct Components([ComponentSlot; 4]);

impl Components {
    pub fn with_weights(weights: &WeightSet) -> Self {
        Self(Component::ALL.map(|c| ComponentSlot::weighted(weights.get(c))))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &ComponentSlot)> {
        Component::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Component, &mut ComponentSlot)> {
        Component::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl Default for Components {
    fn default() -> Self {
        Self::with_weights(&WeightSet::default())
    }
}

impl Index<Component> for Components {
    type Output = ComponentSlot;

    fn index(&self, component: Component) -> &ComponentSlot {
        &self.0[component.index()]
    }
}

impl IndexMut<Component> for Components {
    fn index_mut(&mut self, component: Component) -> &mut ComponentSlot {
        &mut self.0[component.index()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct NamedSlots {
    progress: ComponentSlot,
    midterm: ComponentSlot,
    practice: ComponentSlot,
    #[serde(rename = "final")]
    final_term: ComponentSlot,
}

impl Default for NamedSlots {
    fn default() -> Self {
        Components::default().into()
    }
}

impl From<NamedSlots> for Components {
    fn from(named: NamedSlots) -> Self {
        Self([
            named.progress,
            named.midterm,
            named.practice,
            named.final_term,
        ])
    }
}

impl From<Components> for NamedSlots {
    fn from(components: Components) -> Self {
        let [progress, midterm, practice, final_term] = components.0;
        Self {
            progress,
            midterm,
            practice,
            final_term,
        }
    }
}

/// A course taken in a semester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub credits: String,
    pub components: Components,
    /// Externally supplied total, used verbatim instead of the weighted sum.
    #[serde(deserialize_with = "lenient_text")]
    pub override_score: String,
    /// Overall score the student is aiming for.
    #[serde(deserialize_with = "lenient_text")]
    pub target: String,
}

impl Subject {
    /// Create an empty subject with a fresh id and the default 20/20/20/40 weights.
    pub fn new() -> Self {
        Self::with_weights(&WeightSet::default())
    }

    pub fn with_weights(weights: &WeightSet) -> Self {
        Self {
            id: generate_id("sub"),
            components: Components::with_weights(weights),
            ..Self::default()
        }
    }

    /// Create a subject pre-filled from a catalog course.
    pub fn from_course(course: &Course, fallback_weights: &WeightSet) -> Self {
        let weights = course.default_weights.unwrap_or(*fallback_weights);
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits.to_string(),
            ..Self::with_weights(&weights)
        }
    }

    pub fn slot(&self, component: Component) -> &ComponentSlot {
        &self.components[component]
    }

    pub fn slot_mut(&mut self, component: Component) -> &mut ComponentSlot {
        &mut self.components[component]
    }

    pub fn credits_value(&self) -> Option<f64> {
        parse_number(&self.credits)
    }

    pub fn target_value(&self) -> Option<f64> {
        parse_number(&self.target)
    }

    pub fn has_target(&self) -> bool {
        !self.target.trim().is_empty()
    }

    pub fn has_override(&self) -> bool {
        !self.override_score.trim().is_empty()
    }

    pub fn weight_total(&self) -> f64 {
        self.components.iter().map(|(_, s)| s.weight_value()).sum()
    }

    /// True when every component has a numeric raw score.
    pub fn all_known(&self) -> bool {
        self.components.iter().all(|(_, s)| s.score_value().is_some())
    }

    /// True when no weight has been entered at all.
    pub fn weights_blank(&self) -> bool {
        self.components.iter().all(|(_, s)| s.weight.trim().is_empty())
    }

    pub fn clear_required(&mut self) {
        for (_, slot) in self.components.iter_mut() {
            slot.required.clear();
        }
    }

    /// Code and name for messages, falling back to the id.
    pub fn display_name(&self) -> String {
        match (self.code.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} {}", self.code, self.name),
            (false, true) => self.code.clone(),
            (true, false) => self.name.clone(),
            (true, true) => self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Semester {
    pub id: String,
    pub name: String,
    pub subjects: Vec<Subject>,
}

impl Semester {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id("sem"),
            name: name.into(),
            subjects: Vec::new(),
        }
    }

    pub fn add_subject(&mut self, subject: Subject) -> &mut Subject {
        self.subjects.push(subject);
        let last = self.subjects.len() - 1;
        &mut self.subjects[last]
    }

    pub fn remove_subject(&mut self, id: &str) -> Result<Subject, GradeError> {
        let pos = self
            .subjects
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| GradeError::SubjectNotFound(id.to_string()))?;
        Ok(self.subjects.remove(pos))
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn subject_mut(&mut self, id: &str) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.id == id)
    }
}

/// A student's full record: every semester in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Program {
    pub semesters: Vec<Semester>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_semester(&mut self, semester: Semester) -> &mut Semester {
        self.semesters.push(semester);
        let last = self.semesters.len() - 1;
        &mut self.semesters[last]
    }

    pub fn remove_semester(&mut self, id: &str) -> Result<Semester, GradeError> {
        let pos = self
            .semesters
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| GradeError::SemesterNotFound(id.to_string()))?;
        Ok(self.semesters.remove(pos))
    }

    pub fn semester(&self, id: &str) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.id == id)
    }

    pub fn semester_mut(&mut self, id: &str) -> Option<&mut Semester> {
        self.semesters.iter_mut().find(|s| s.id == id)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.semesters.iter().flat_map(|s| s.subjects.iter())
    }

    pub fn subjects_mut(&mut self) -> impl Iterator<Item = &mut Subject> {
        self.semesters.iter_mut().flat_map(|s| s.subjects.iter_mut())
    }

    /// First subject with the given course code (case-insensitive).
    pub fn find_by_code(&self, code: &str) -> Option<&Subject> {
        self.subjects().find(|s| s.code.eq_ignore_ascii_case(code.trim()))
    }

    pub fn find_by_code_mut(&mut self, code: &str) -> Option<&mut Subject> {
        let code = code.trim();
        self.subjects_mut()
            .find(|s| s.code.eq_ignore_ascii_case(code))
    }

    /// Give every semester and subject without an id a fresh one.
    pub fn assign_missing_ids(&mut self) {
        for semester in &mut self.semesters {
            if semester.id.trim().is_empty() {
                semester.id = generate_id("sem");
            }
            for subject in &mut semester.subjects {
                if subject.id.trim().is_empty() {
                    subject.id = generate_id("sub");
                }
            }
        }
    }

    /// Apply `weights` to imported subjects that carry no weights at all.
    pub fn fill_blank_weights(&mut self, weights: &WeightSet) {
        for semester in &mut self.semesters {
            for subject in &mut semester.subjects {
                if subject.weights_blank() {
                    for (component, slot) in subject.components.iter_mut() {
                        slot.weight = weights.get(component).to_string();
                    }
                }
            }
        }
    }
}

pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Accept text or a bare number for fields that are free-form text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Int(n) => n.to_string(),
        TextOrNumber::Float(n) => n.to_string(),
        TextOrNumber::Null(()) => String::new(),
    })
}
