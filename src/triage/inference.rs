//! Inference adapter: feature vector → (label, class probabilities)

use tracing::{debug, warn};

use super::TriageError;
use crate::model::ModelHandle;
use crate::types::{ClassProbabilityVector, DiagnosisLabel, FeatureVector};

/// Run the classifier once.
///
/// The label is taken from `predict` as-is. If it disagrees with the arg-max
/// of `predict_proba` the disagreement is logged and passed through.
pub fn infer(
    model: &ModelHandle,
    features: &FeatureVector,
) -> Result<(DiagnosisLabel, ClassProbabilityVector), TriageError> {
    let classifier = model.classifier().ok_or(TriageError::ModelUnavailable)?;

    let raw = classifier
        .predict_proba(features)
        .map_err(|e| TriageError::Inference(format!("{e:#}")))?;
    let index = classifier
        .predict(features)
        .map_err(|e| TriageError::Inference(format!("{e:#}")))?;

    if raw.len() < 3 {
        debug!(components = raw.len(), "Classifier returned fewer than 3 probabilities, padding with 0.0");
    }
    let probabilities = ClassProbabilityVector::from_raw(&raw)
        .ok_or_else(|| TriageError::Inference("classifier returned no probabilities".to_string()))?;
    let label = DiagnosisLabel::from_class_index(index).ok_or(TriageError::UnexpectedClass(index))?;

    let argmax = probabilities.argmax();
    if argmax != label {
        warn!(
            predicted = %label,
            argmax = %argmax,
            classifier = classifier.name(),
            "predict and predict_proba disagree, keeping predict"
        );
    }

    Ok((label, probabilities))
}
