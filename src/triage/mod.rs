//! Triage pipeline
//!
//! Three stateless stages, run strictly in order for each request:
//!
//! 1. **normalizer**: request fields → [`SymptomRecord`] / 9-feature vector
//! 2. **inference**: feature vector + [`ModelHandle`] → label and probabilities
//! 3. **policy**: label, probabilities, patient name → [`TriageResult`]
//!
//! [`TriageEngine`] wires the stages together. It owns only the read-only
//! model handle and the default patient name, so one engine can serve any
//! number of concurrent requests.

pub mod inference;
pub mod normalizer;
pub mod policy;

pub use inference::infer;
pub use normalizer::{normalize_features, normalize_request, DEFAULT_PATIENT_NAME};
pub use policy::{advice, evaluate, greeting, severity_tier};

use rayon::prelude::*;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::ModelHandle;
use crate::types::{SymptomRecord, TriageResult};

/// Errors that end a single triage request.
///
/// None of these are retryable: the computation is deterministic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriageError {
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Model not loaded. Contact administrator.")]
    ModelUnavailable,

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Classifier returned unknown class index {0}")]
    UnexpectedClass(usize),
}

impl TriageError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Normalizer → adapter → policy, bound to one model handle.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    model: ModelHandle,
    default_patient_name: String,
}

impl TriageEngine {
    pub fn new(model: ModelHandle) -> Self {
        Self {
            model,
            default_patient_name: DEFAULT_PATIENT_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn with_default_patient_name(mut self, name: impl Into<String>) -> Self {
        self.default_patient_name = name.into();
        self
    }

    pub const fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Triage an already-normalized record.
    pub fn triage_record(&self, record: &SymptomRecord) -> Result<TriageResult, TriageError> {
        let (label, probabilities) = infer(&self.model, &record.features())?;
        debug!(
            label = %label,
            normal = probabilities.normal,
            dengue = probabilities.dengue,
            malaria = probabilities.malaria,
            "Inference complete"
        );
        Ok(evaluate(label, probabilities, &record.patient_name))
    }

    /// Triage one raw request document.
    ///
    /// Model availability is checked before the input is read, so an
    /// unavailable model is reported even for malformed requests.
    pub fn triage(&self, request: &Value) -> Result<TriageResult, TriageError> {
        if !self.model.is_loaded() {
            return Err(TriageError::ModelUnavailable);
        }
        let record = normalize_request(request, &self.default_patient_name)?;
        let result = self.triage_record(&record)?;
        debug!(
            severity = %result.severity_level,
            risk_percent = result.probability,
            "Triage complete"
        );
        Ok(result)
    }

    /// Triage independent requests in parallel, preserving input order.
    ///
    /// Backs [`crate::report::handle_batch`].
    pub fn triage_batch(&self, requests: &[Value]) -> Vec<Result<TriageResult, TriageError>> {
        requests.par_iter().map(|r| self.triage(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classifier;
    use crate::types::{DiagnosisLabel, FeatureVector, SeverityTier};
    use anyhow::Result;
    use serde_json::json;

    /// Dengue when fever is present, normal otherwise.
    struct FeverRule;

    impl Classifier for FeverRule {
        fn name(&self) -> &str {
            "fever-rule"
        }

        fn predict(&self, features: &FeatureVector) -> Result<usize> {
            Ok(usize::from(features.get("fever") == Some(1.0)))
        }

        fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
            if features.get("fever") == Some(1.0) {
                Ok(vec![0.05, 0.9, 0.05])
            } else {
                Ok(vec![0.9, 0.05, 0.05])
            }
        }
    }

    fn engine() -> TriageEngine {
        TriageEngine::new(ModelHandle::from_classifier(FeverRule))
    }

    #[test]
    fn test_triage_end_to_end() {
        let result = engine()
            .triage(&json!({ "fever": 1, "patient_name": "Huda" }))
            .unwrap();
        assert_eq!(result.prediction, DiagnosisLabel::Dengue);
        assert_eq!(result.severity_level, SeverityTier::High);
        assert_eq!(result.patient_name, "Huda");
    }

    #[test]
    fn test_default_patient_name_configurable() {
        let result = engine()
            .with_default_patient_name("Patient")
            .triage(&json!({}))
            .unwrap();
        assert_eq!(result.patient_name, "Patient");
        assert_eq!(result.severity_level, SeverityTier::Low);
    }

    #[test]
    fn test_unavailable_model_reported_before_input_errors() {
        let engine = TriageEngine::new(ModelHandle::unavailable());
        let err = engine.triage(&json!({ "fever": "bogus" })).unwrap_err();
        assert_eq!(err, TriageError::ModelUnavailable);
    }

    #[test]
    fn test_invalid_input_propagates() {
        let err = engine().triage(&json!({ "age": "old" })).unwrap_err();
        assert!(matches!(err, TriageError::InvalidInput { ref field, .. } if field == "age"));
    }

    #[test]
    fn test_batch_preserves_order() {
        let requests = vec![
            json!({ "fever": 1 }),
            json!({ "fever": "x" }),
            json!({ "fever": 0 }),
        ];
        let results = engine().triage_batch(&requests);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().prediction, DiagnosisLabel::Dengue);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().prediction, DiagnosisLabel::Normal);
    }
}
