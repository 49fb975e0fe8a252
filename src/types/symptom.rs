//! Patient intake types: SymptomRecord and the model-facing FeatureVector

use serde::{Deserialize, Serialize};

/// Number of numeric features fed to the classifier.
pub const NUM_FEATURES: usize = 9;

/// Feature names in model order.
///
/// The classifier was trained on exactly this column order; never reorder.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "age",
    "gender",
    "fever",
    "headache",
    "eye_pain",
    "joint_muscle_pain",
    "nausea_vomiting",
    "rash",
    "bleeding",
];

/// Value used for an absent `age` field (years).
pub const DEFAULT_AGE: f64 = 30.0;

/// Value used for an absent `gender` field or an absent symptom indicator.
pub const DEFAULT_INDICATOR: f64 = 0.0;

/// Default for a feature by name, `None` for unknown names.
pub fn feature_default(name: &str) -> Option<f64> {
    match name {
        "age" => Some(DEFAULT_AGE),
        n if FEATURE_NAMES.contains(&n) => Some(DEFAULT_INDICATOR),
        _ => None,
    }
}

/// Fixed-order numeric input for one classifier call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of a named feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        let mut values = [DEFAULT_INDICATOR; NUM_FEATURES];
        values[0] = DEFAULT_AGE;
        Self(values)
    }
}

/// One patient's intake after coercion.
///
/// `patient_name` and `other_symptoms` ride along for the response and are
/// never part of the feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub patient_name: String,
    #[serde(default)]
    pub other_symptoms: String,
    /// Age in years
    pub age: f64,
    /// Binary code (0: male, 1: female)
    pub gender: f64,
    pub fever: f64,
    pub headache: f64,
    pub eye_pain: f64,
    pub joint_muscle_pain: f64,
    pub nausea_vomiting: f64,
    pub rash: f64,
    pub bleeding: f64,
}

impl SymptomRecord {
    /// Build a record from a feature vector plus the free-text fields.
    pub fn from_features(
        features: &FeatureVector,
        patient_name: impl Into<String>,
        other_symptoms: impl Into<String>,
    ) -> Self {
        let [age, gender, fever, headache, eye_pain, joint_muscle_pain, nausea_vomiting, rash, bleeding] =
            features.0;
        Self {
            patient_name: patient_name.into(),
            other_symptoms: other_symptoms.into(),
            age,
            gender,
            fever,
            headache,
            eye_pain,
            joint_muscle_pain,
            nausea_vomiting,
            rash,
            bleeding,
        }
    }

    /// Feature vector in [`FEATURE_NAMES`] order.
    pub const fn features(&self) -> FeatureVector {
        FeatureVector([
            self.age,
            self.gender,
            self.fever,
            self.headache,
            self.eye_pain,
            self.joint_muscle_pain,
            self.nausea_vomiting,
            self.rash,
            self.bleeding,
        ])
    }
}
