//! Fever Triage: dengue / malaria decision layer
//!
//! Turns a patient's symptom intake into a triage result: diagnosis label,
//! severity tier and localized guidance.
//!
//! ## Architecture
//!
//! - **Normalizer**: request fields → fixed-order 9-feature vector
//! - **Inference Adapter**: feature vector → label + class probabilities
//! - **Policy Engine**: probabilities → severity tier, greeting, advice
//! - **Model**: classifier capability, passed explicitly as a [`ModelHandle`]
//! - **Report**: response and error documents for the calling layer

pub mod config;
pub mod model;
pub mod report;
pub mod triage;
pub mod types;

// Re-export configuration
pub use config::TriageConfig;

// Re-export commonly used types
pub use types::{
    ClassProbabilityVector, DiagnosisLabel, DiseaseBreakdown, FeatureVector, SeverityTier,
    SymptomRecord, TriageResult,
};

// Re-export pipeline entry points
pub use model::{BoostedTreeModel, Classifier, ModelError, ModelHandle};
pub use report::{ErrorReport, ServiceStatus, TriageResponse};
pub use triage::{TriageEngine, TriageError};
