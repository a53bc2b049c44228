//! Course catalog used to pre-fill subjects.

use serde::{Deserialize, Serialize};

use crate::record::WeightSet;

/// A course offered by the program.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Course {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub credits: f64,
    /// Component weights used when the course is added as a subject.
    #[serde(default)]
    pub default_weights: Option<WeightSet>,
}

/// Named group of courses ("Core", "Electives", ...).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogCategory {
    pub name: String,
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Course catalog, as listed in config:
///
/// ```yaml
/// catalog:
///   - name: Core
///     courses:
///       - { code: IT001, name: Calculus, credits: 4 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    pub categories: Vec<CatalogCategory>,
}

/// Courses of one category that matched a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGroup<'a> {
    pub category: &'a str,
    pub courses: Vec<&'a Course>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.courses.is_empty())
    }

    /// Case-insensitive substring search on course code and name.
    ///
    /// Results keep catalog order and are grouped by category; categories with
    /// no match are left out. A blank term returns every category.
    pub fn search(&self, term: &str) -> Vec<SearchGroup<'_>> {
        let query = term.trim().to_lowercase();

        self.categories
            .iter()
            .filter_map(|category| {
                let courses: Vec<&Course> = category
                    .courses
                    .iter()
                    .filter(|course| {
                        query.is_empty()
                            || course.code.to_lowercase().contains(&query)
                            || course.name.to_lowercase().contains(&query)
                    })
                    .collect();

                if query.is_empty() || !courses.is_empty() {
                    Some(SearchGroup {
                        category: &category.name,
                        courses,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn find(&self, code: &str) -> Option<&Course> {
        self.categories
            .iter()
            .flat_map(|c| c.courses.iter())
            .find(|course| course.code.eq_ignore_ascii_case(code.trim()))
    }
}
