//! Feature normalizer: raw request fields → fixed-order feature vector
//!
//! Coercion is permissive about representation (numbers, numeric strings,
//! booleans) and strict about meaning: anything that cannot be read as a
//! number is rejected with the field name, never silently defaulted.
//!
//! Values are not clamped. A symptom indicator of 3.0 reaches the model as 3.0.

use serde_json::{Map, Value};
use tracing::debug;

use super::TriageError;
use crate::types::{feature_default, FeatureVector, SymptomRecord, FEATURE_NAMES, NUM_FEATURES};

/// Default display name when the request carries none ("patient").
pub const DEFAULT_PATIENT_NAME: &str = "مريض";

/// Pseudo field name used when the request itself is not an object.
pub const REQUEST_FIELD: &str = "<request>";

/// Coerce one JSON value to f64.
fn coerce_number(field: &str, value: &Value) -> Result<f64, TriageError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| TriageError::invalid(field, format!("number {n} is not representable"))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| TriageError::invalid(field, format!("could not convert string to float: '{s}'"))),
        Value::Null => Err(TriageError::invalid(field, "value is null")),
        Value::Array(_) => Err(TriageError::invalid(field, "expected a number, got an array")),
        Value::Object(_) => Err(TriageError::invalid(field, "expected a number, got an object")),
    }
}

/// Produce the 9-element feature vector from a field mapping.
///
/// Absent fields take their documented defaults (age 30, everything else 0).
pub fn normalize_features(fields: &Map<String, Value>) -> Result<FeatureVector, TriageError> {
    let mut values = [0.0_f64; NUM_FEATURES];
    for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
        *slot = match fields.get(name) {
            Some(value) => coerce_number(name, value)?,
            None => feature_default(name).unwrap_or(0.0),
        };
    }

    for (name, value) in FEATURE_NAMES.iter().zip(values).skip(2) {
        if value != 0.0 && value != 1.0 {
            debug!(field = name, value, "Symptom indicator outside {{0,1}} passed through");
        }
    }

    Ok(FeatureVector(values))
}

/// Display text such as `patient_name`.
///
/// Numbers and booleans are echoed as their JSON text, so `true` stays
/// lowercase `true` rather than a capitalized rendering.
fn text_field(fields: &Map<String, Value>, field: &str, default: &str) -> Result<String, TriageError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        Some(_) => Err(TriageError::invalid(field, "expected text")),
    }
}

/// Free text that never reaches the model. Any non-string value is kept as
/// its JSON text instead of failing the request.
fn free_text_field(fields: &Map<String, Value>, field: &str) -> String {
    match fields.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Full intake: features plus the free-text fields.
pub fn normalize_request(request: &Value, default_name: &str) -> Result<SymptomRecord, TriageError> {
    let Value::Object(fields) = request else {
        return Err(TriageError::invalid(REQUEST_FIELD, "request body must be a JSON object"));
    };
    let features = normalize_features(fields)?;
    let patient_name = text_field(fields, "patient_name", default_name)?;
    let other_symptoms = free_text_field(fields, "other_symptoms");
    Ok(SymptomRecord::from_features(&features, patient_name, other_symptoms))
}
