use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::edit::resolve;
use super::types::{Program, WeightSet};

/// Get the default record file path (~/.config/gradewise/record.json)
pub fn get_record_path() -> PathBuf {
    crate::config::get_config_dir().join("record.json")
}

/// Load a program record exported by the editor or an import tool.
///
/// Files ending in `.yaml`/`.yml` are read as YAML, everything else as JSON.
/// Semesters and subjects without ids get fresh ones, and subjects with no
/// weights at all get `default_weights`. Required values are re-solved from
/// the loaded scores, since the file may carry stale ones. The file is never
/// written back.
pub fn load_program(path: &Path, default_weights: &WeightSet) -> Result<Program> {
    if !path.exists() {
        anyhow::bail!("Record file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file at {}", path.display()))?;

    let mut program: Program = if is_yaml(path) {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse record: invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse record: invalid JSON in {}", path.display()))?
    };

    program.assign_missing_ids();
    program.fill_blank_weights(default_weights);
    program.subjects_mut().for_each(resolve);

    debug!(
        path = %path.display(),
        semesters = program.semesters.len(),
        subjects = program.subjects().count(),
        "Loaded record"
    );

    Ok(program)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Component;
    use std::env;

    #[test]
    fn test_load_missing_file_errors() {
        let temp_path = env::temp_dir().join("gradewise_test_missing_record.json");
        let _ = fs::remove_file(&temp_path);

        let err = load_program(&temp_path, &WeightSet::default()).unwrap_err();
        assert!(err.to_string().contains("Record file not found"));
    }

    #[test]
    fn test_load_json_record() {
        let temp_path = env::temp_dir().join("gradewise_test_record.json");
        let json = r#"{
  "semesters": [
    {
      "name": "Semester 1",
      "subjects": [
        {
          "code": "IT001",
          "name": "Calculus",
          "credits": 4,
          "components": {
            "progress": { "score": "8", "weight": "20", "required": "1.00" },
            "midterm": { "score": "7", "weight": "20" },
            "practice": { "weight": "20" },
            "final": { "weight": "40" }
          },
          "target": "8"
        }
      ]
    }
  ]
}"#;
        fs::write(&temp_path, json).unwrap();

        let program = load_program(&temp_path, &WeightSet::default()).unwrap();
        assert_eq!(program.semesters.len(), 1);
        let subject = &program.semesters[0].subjects[0];
        assert!(subject.id.starts_with("sub-"));
        assert_eq!(subject.credits, "4");
        assert_eq!(subject.slot(Component::Midterm).score, "7");
        assert!(subject.slot(Component::Progress).required.is_empty());
        assert_eq!(subject.target, "8");
        assert_eq!(subject.slot(Component::Practice).required, "8.33");
        assert_eq!(subject.slot(Component::Final).required, "8.33");

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_yaml_record_fills_blank_weights() {
        let temp_path = env::temp_dir().join("gradewise_test_record.yaml");
        let yaml = r#"
semesters:
  - id: sem-1
    name: Semester 1
    subjects:
      - id: sub-1
        code: IT002
        credits: "3"
        override_score: "9.2"
        components:
          progress: { weight: "" }
          midterm: { weight: "" }
          practice: { weight: "" }
          final: { weight: "" }
"#;
        fs::write(&temp_path, yaml).unwrap();

        let weights = WeightSet {
            progress: 10,
            midterm: 30,
            practice: 0,
            final_term: 60,
        };
        let program = load_program(&temp_path, &weights).unwrap();
        let subject = program.semesters[0].subject("sub-1").unwrap();
        assert_eq!(program.semesters[0].id, "sem-1");
        assert_eq!(subject.override_score, "9.2");
        assert_eq!(subject.slot(Component::Progress).weight, "10");
        assert_eq!(subject.slot(Component::Final).weight, "60");

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_invalid_json_errors() {
        let temp_path = env::temp_dir().join("gradewise_test_bad_record.json");
        fs::write(&temp_path, "{ not json").unwrap();

        let err = load_program(&temp_path, &WeightSet::default()).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));

        let _ = fs::remove_file(&temp_path);
    }
}
