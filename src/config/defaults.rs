//! System-wide default constants.
//!
//! Centralises values shared by the config layer and the binary.

// ============================================================================
// Model
// ============================================================================

/// Model file looked up when no path is configured.
pub const MODEL_PATH: &str = "dengue_model.json";

// ============================================================================
// Batch
// ============================================================================

/// Upper bound for `batch.threads`.
pub const MAX_BATCH_THREADS: usize = 1_024;

// ============================================================================
// Logging
// ============================================================================

/// Log filter when neither `RUST_LOG` nor `logging.filter` is set.
pub const LOG_FILTER: &str = "info";
