//! Classifier capability
//!
//! The triage pipeline never touches global model state. Callers load a
//! [`ModelHandle`] once at startup and pass it by reference; the handle is
//! immutable and cheap to clone, so concurrent requests share it freely.
//!
//! ## Backends
//!
//! - [`BoostedTreeModel`]: gradient-boosted tree ensemble loaded from JSON
//! - anything else implementing [`Classifier`] (test doubles, remote scorers)

mod boosted;

pub use boosted::{BoostedTreeModel, Node, Split, Tree};

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::FeatureVector;

/// Errors raised while loading a model file.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model I/O error ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Model parse error ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// A trained multi-class classifier.
///
/// `predict` returns a class index; `predict_proba` returns per-class
/// probabilities index-aligned with it. Implementations may return fewer
/// than three probabilities.
pub trait Classifier: Send + Sync {
    /// Backend name for logging (e.g. "boosted-trees")
    fn name(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> Result<usize>;

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>>;
}

/// Shared, read-only handle to the loaded classifier.
///
/// An unavailable handle is a valid state: the service runs and reports
/// `model_loaded: false`, and every triage request fails fast.
#[derive(Clone, Default)]
pub struct ModelHandle {
    classifier: Option<Arc<dyn Classifier>>,
}

impl ModelHandle {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    pub fn from_classifier<C: Classifier + 'static>(classifier: C) -> Self {
        Self::new(Arc::new(classifier))
    }

    pub const fn unavailable() -> Self {
        Self { classifier: None }
    }

    /// Load a boosted tree model from `path`.
    ///
    /// A missing file yields an unavailable handle (logged), a present but
    /// malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            warn!(path = %path.display(), "Model file not found, triage requests will be rejected until a model is provided");
            return Ok(Self::unavailable());
        }
        let model = BoostedTreeModel::load_from_file(path)?;
        info!(
            path = %path.display(),
            classes = model.num_class,
            trees = model.trees.len(),
            "Loaded classifier"
        );
        Ok(Self::from_classifier(model))
    }

    pub const fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn classifier(&self) -> Option<&Arc<dyn Classifier>> {
        self.classifier.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.classifier.as_deref().map(|c| c.name())
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("classifier", &self.name())
            .finish()
    }
}
