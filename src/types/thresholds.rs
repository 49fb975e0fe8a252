//! Risk thresholds for the triage policy
//!
//! Two independent groups over the same risk scalar (max of the dengue and
//! malaria probabilities). They are deliberately not shared: severity buckets
//! the display tier, advice picks the guidance text.

/// Thresholds for the displayed severity tier
pub mod severity {
    /// Risk strictly above this is `High`
    pub const HIGH_RISK: f64 = 0.75;
    /// Risk strictly above this (and not `High`) is `Medium`
    pub const MEDIUM_RISK: f64 = 0.4;
}

/// Thresholds for the advice decision table
pub mod advice {
    /// Dengue / malaria risk strictly above this selects critical-care guidance
    pub const CRITICAL_RISK: f64 = 0.8;
    /// Normal-label risk strictly above this selects watchful-waiting guidance
    pub const WATCHFUL_RISK: f64 = 0.3;
}
