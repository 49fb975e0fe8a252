//! Config validation: unknown-key detection with Levenshtein suggestions
//! and soft checks on settings that load fine but look wrong.
//!
//! Two-pass parse: the raw TOML is walked as a `toml::Value` tree and every
//! dotted key compared against the known field names before normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `TriageConfig`.
///
/// Maintained by hand to match the struct hierarchy in triage_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [model]
        "model",
        "model.path",
        // [patient]
        "patient",
        "patient.default_name",
        // [batch]
        "batch",
        "batch.threads",
        // [logging]
        "logging",
        "logging.filter",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the alphabetically first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut candidates: Vec<&str> = known.iter().copied().collect();
    candidates.sort_unstable();

    let mut best: Option<(&str, usize)> = None;
    for k in candidates {
        let dist = levenshtein(unknown, k);
        if dist <= 3 && best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Unknown keys only warn. Parse errors are left to serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Soft Setting Checks
// ============================================================================

/// Warnings for settings that are valid but probably not intended.
pub fn validate_settings(config: &super::TriageConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let path = &config.model.path;
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        warnings.push(ValidationWarning {
            field: "model.path".to_string(),
            message: format!(
                "model.path = {} does not have a .json extension",
                path.display()
            ),
            suggestion: None,
        });
    }

    if let Ok(cpus) = std::thread::available_parallelism() {
        if config.batch.threads > cpus.get() {
            warnings.push(ValidationWarning {
                field: "batch.threads".to_string(),
                message: format!(
                    "batch.threads = {} exceeds the {} available CPUs",
                    config.batch.threads,
                    cpus.get()
                ),
                suggestion: None,
            });
        }
    }

    warnings
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("thraeds", "threads"), 2);
        assert_eq!(levenshtein("modle", "model"), 2);
        assert_eq!(levenshtein("pth", "path"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [model]
            path = "m.json"
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"model".to_string()));
        assert!(keys.contains(&"model.path".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[patient]
default_nmae = "Patient"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("default_nmae"));
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("patient.default_name")
        );
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[model]
path = "dengue_model.json"

[patient]
default_name = "Patient"

[batch]
threads = 2

[logging]
filter = "debug"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let warnings = validate_unknown_keys("[thresholds]\nhigh = 0.9\n");
        assert!(warnings.iter().any(|w| w.field == "thresholds"));
        assert!(warnings.iter().any(|w| w.field == "thresholds.high"));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_warning_display_includes_suggestion() {
        let w = ValidationWarning {
            field: "modle".to_string(),
            message: "Unknown config key 'modle'".to_string(),
            suggestion: Some("model".to_string()),
        };
        assert_eq!(w.to_string(), "Unknown config key 'modle' (did you mean 'model'?)");
    }

    #[test]
    fn test_settings_defaults_clean() {
        let config = crate::config::TriageConfig::default();
        let warnings = validate_settings(&config);
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {warnings:?}");
    }

    #[test]
    fn test_settings_non_json_model_path() {
        let mut config = crate::config::TriageConfig::default();
        config.model.path = "dengue_model.pkl".into();
        let warnings = validate_settings(&config);
        assert!(warnings.iter().any(|w| w.field == "model.path"));
    }
}
