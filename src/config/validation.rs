use super::schema::Config;
use crate::record::{Component, WeightSet};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Validate scale bounds
    if let Err(e) = config.scale.check() {
        errors.push(format!("scale: {}", e));
    }

    check_weights("default_weights", &config.default_weights, &mut errors);

    // Validate catalog entries
    for (i, category) in config.catalog.categories.iter().enumerate() {
        if category.name.trim().is_empty() {
            errors.push(format!("catalog[{}].name: must not be empty", i));
        }
        for (j, course) in category.courses.iter().enumerate() {
            let path = format!("catalog[{}].courses[{}]", i, j);
            if course.code.trim().is_empty() {
                errors.push(format!("{}.code: must not be empty", path));
            }
            if !course.credits.is_finite() || course.credits < 0.0 {
                errors.push(format!("{}.credits: must be non-negative", path));
            }
            if let Some(ref weights) = course.default_weights {
                check_weights(&format!("{}.default_weights", path), weights, &mut errors);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_weights(path: &str, weights: &WeightSet, errors: &mut Vec<String>) {
    for component in Component::ALL {
        if weights.get(component) > 100 {
            errors.push(format!(
                "{}.{}: must be between 0 and 100",
                path,
                component.label()
            ));
        }
    }
    if weights.total() != 100 {
        errors.push(format!(
            "{}: weights must sum to 100 (got {})",
            path,
            weights.total()
        ));
    }
}
