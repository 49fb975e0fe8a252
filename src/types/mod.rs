//! Shared value objects for the triage pipeline
//!
//! Every type here is request-scoped and immutable once built:
//! - SymptomRecord / FeatureVector (normalizer output)
//! - ClassProbabilityVector / DiagnosisLabel (inference output)
//! - SeverityTier / DiseaseBreakdown / TriageResult (policy output)

mod symptom;
mod probability;
mod triage;
pub mod thresholds;

pub use symptom::*;
pub use probability::*;
pub use triage::*;
