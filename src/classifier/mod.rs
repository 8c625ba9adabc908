//! Persisted survival classifiers.
//!
//! ```text
//!  model.json ──► artifact::load_model ──► Box<dyn Predictor>
//!                                                │
//!                      Dataset ──► predict ◄─────┘
//!                                     │
//!                                     ▼
//!                               Vec<Label> (one per row, 0 or 1)
//! ```
//!
//! The command only ever sees the [`Predictor`] trait; which model sits
//! behind it is decided by the artifact file.

pub mod artifact;
pub mod features;
pub mod logistic;
pub mod tree;

use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Dataset;

pub use artifact::{load_model, ModelArtifact, ModelSpec, FORMAT_VERSION};
pub use features::Feature;
pub use logistic::LogisticRegression;
pub use tree::{DecisionTree, TreeNode};

/// Predicted class for one row: 0 (did not survive) or 1 (survived).
pub type Label = u8;

/// Errors raised while loading an artifact or running inference.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to open model artifact {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write model artifact {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact JSON in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode model artifact {}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact format version {found} (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("dataset is missing column '{0}' required by the model")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' holds non-numeric value '{value}'")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("model has {coefficients} coefficients for {features} features")]
    ShapeMismatch { features: usize, coefficients: usize },

    #[error("numeric feature '{0}' needs a fill value for this model")]
    MissingFill(String),

    #[error("invalid decision tree: {0}")]
    InvalidTree(String),

    #[error("row {row}: label {label} is not 0 or 1")]
    InvalidLabel { row: usize, label: Label },

    #[error("model returned {predictions} predictions for {rows} rows")]
    LengthMismatch { rows: usize, predictions: usize },
}

/// Anything that can label every row of a dataset.
pub trait Predictor {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// One label per row, in row order.
    fn predict(&self, dataset: &Dataset) -> Result<Vec<Label>, ModelError>;
}

/// Run `model` and check the output: one label per row, each 0 or 1.
pub fn predict_checked(model: &dyn Predictor, dataset: &Dataset) -> Result<Vec<Label>, ModelError> {
    let labels = model.predict(dataset)?;

    if labels.len() != dataset.len() {
        return Err(ModelError::LengthMismatch {
            rows: dataset.len(),
            predictions: labels.len(),
        });
    }
    if let Some((row, &label)) = labels.iter().enumerate().find(|&(_, &l)| l > 1) {
        return Err(ModelError::InvalidLabel { row, label });
    }

    debug!("{} labelled {} rows", model.name(), labels.len());
    Ok(labels)
}

// ---------------------------------------------------------------------------
// ConstantModel – predicts the same label for every row
// ---------------------------------------------------------------------------

/// Baseline that ignores its input, e.g. "nobody survives".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantModel {
    pub label: Label,
}

impl Predictor for ConstantModel {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn predict(&self, dataset: &Dataset) -> Result<Vec<Label>, ModelError> {
        Ok(vec![self.label; dataset.len()])
    }
}
