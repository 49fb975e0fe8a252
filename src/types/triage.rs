//! Policy output types: SeverityTier, DiseaseBreakdown, TriageResult

use serde::{Deserialize, Serialize};

use super::{ClassProbabilityVector, DiagnosisLabel};

/// Coarse display bucket of the disease risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Per-class percentages, each rounded to two decimals independently.
///
/// The three values are not renormalized and may not sum to exactly 100.00.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiseaseBreakdown {
    pub dengue: f64,
    pub malaria: f64,
    pub normal: f64,
}

/// Triage outcome for one request.
///
/// Field names and order match the response document consumed by clients:
/// `prediction, probability, message, severity_level, disease_breakdown,
/// medical_advice, patient_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageResult {
    /// Classifier label, serialized as its class index
    pub prediction: DiagnosisLabel,
    /// Risk as a rounded percentage
    pub probability: f64,
    /// Localized greeting for the predicted label
    pub message: String,
    pub severity_level: SeverityTier,
    pub disease_breakdown: DiseaseBreakdown,
    /// Localized guidance from the advice decision table
    pub medical_advice: String,
    pub patient_name: String,
    /// Unrounded classifier output, kept for callers; not part of the response document
    #[serde(skip)]
    pub probabilities: ClassProbabilityVector,
}
