//! Triage Configuration - deployment settings as operator-tunable TOML values
//!
//! Each struct implements `Default` with the values the service ships with,
//! so a missing config file changes nothing. Risk thresholds are not here:
//! they live in `types::thresholds` and are not operator-tunable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FEVER_TRIAGE_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "triage_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a triage deployment.
///
/// Load with `TriageConfig::load()` which searches:
/// 1. `$FEVER_TRIAGE_CONFIG`
/// 2. `./triage_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Classifier model file
    #[serde(default)]
    pub model: ModelConfig,

    /// Patient-facing defaults
    #[serde(default)]
    pub patient: PatientConfig,

    /// Batch triage worker pool
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log filter
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TriageConfig {
    /// Load configuration using the standard search order.
    ///
    /// A file that exists but fails to load is logged and skipped.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded triage config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        // 2. Check ./triage_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded triage config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys only warn; parse and validation failures are errors.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate settings for internal consistency.
    ///
    /// Rules:
    /// - Model path must be non-empty
    /// - Default patient name must be non-blank
    /// - Batch threads must not exceed the hard cap
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.model.path.as_os_str().is_empty() {
            errors.push("model.path must not be empty".to_string());
        }
        if self.patient.default_name.trim().is_empty() {
            errors.push("patient.default_name must not be blank".to_string());
        }
        if self.batch.threads > defaults::MAX_BATCH_THREADS {
            errors.push(format!(
                "batch.threads = {} exceeds the maximum of {}",
                self.batch.threads,
                defaults::MAX_BATCH_THREADS
            ));
        }
        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be blank".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Boosted tree model file (JSON).
    ///
    /// Can be overridden by the `--model` CLI flag.
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(defaults::MODEL_PATH)
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientConfig {
    /// Name used in greetings when the request carries none
    #[serde(default = "default_patient_name")]
    pub default_name: String,
}

fn default_patient_name() -> String {
    crate::triage::DEFAULT_PATIENT_NAME.to_string()
}

impl Default for PatientConfig {
    fn default() -> Self {
        Self {
            default_name: default_patient_name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker threads for batch triage. 0 = one per CPU.
    #[serde(default)]
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    defaults::LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = TriageConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: TriageConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config, TriageConfig::default());
        assert_eq!(config.model.path, PathBuf::from("dengue_model.json"));
        assert_eq!(config.patient.default_name, "مريض");
        assert_eq!(config.batch.threads, 0);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[model]
path = "/srv/models/v2.json"

[batch]
threads = 4
"#;
        let config = TriageConfig::from_toml_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.model.path, PathBuf::from("/srv/models/v2.json"));
        assert_eq!(config.batch.threads, 4);
        // Non-overridden values retain defaults
        assert_eq!(config.patient.default_name, "مريض");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_validation_catches_blank_name() {
        let mut config = TriageConfig::default();
        config.patient.default_name = "   ".to_string();
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("default_name")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_catches_empty_model_path() {
        let mut config = TriageConfig::default();
        config.model.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_thread_cap() {
        let mut config = TriageConfig::default();
        config.batch.threads = defaults::MAX_BATCH_THREADS + 1;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("batch.threads"), "{err}");
    }

    #[test]
    fn test_parse_error_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[model\npath = 1").unwrap();
        let err = TriageConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(ref p, _) if p == &path));
    }

    #[test]
    fn test_roundtrip_toml() {
        let original = TriageConfig::default();
        let toml_str = original.to_toml().expect("serialization should work");
        let roundtripped: TriageConfig = toml::from_str(&toml_str).expect("deserialization should work");
        assert_eq!(original, roundtripped);
    }
}
