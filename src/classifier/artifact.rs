//! On-disk model artifacts.
//!
//! An artifact is a JSON document with a small envelope around the model:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model": { "kind": "logistic_regression", "features": [...], ... }
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{ConstantModel, DecisionTree, LogisticRegression, ModelError, Predictor};

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    Constant(ConstantModel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model: ModelSpec,
}

impl ModelArtifact {
    pub fn new(model: ModelSpec) -> Self {
        ModelArtifact {
            format_version: FORMAT_VERSION,
            model,
        }
    }

    /// Read an artifact. The file is closed before this returns.
    pub fn read(path: &Path) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = {
            let file = File::open(path).map_err(|source| ModelError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };

        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: artifact.format_version,
                supported: FORMAT_VERSION,
            });
        }
        Ok(artifact)
    }

    pub fn write(&self, path: &Path) -> Result<(), ModelError> {
        let write_err = |source| ModelError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| ModelError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        writer.write_all(b"\n").map_err(write_err)?;
        writer.flush().map_err(write_err)?;
        Ok(())
    }

    /// Check the model's internal shape and hand it back behind the
    /// [`Predictor`] interface.
    pub fn into_predictor(self) -> Result<Box<dyn Predictor>, ModelError> {
        let predictor: Box<dyn Predictor> = match self.model {
            ModelSpec::LogisticRegression(m) => {
                m.validate()?;
                Box::new(m)
            }
            ModelSpec::DecisionTree(m) => {
                m.validate()?;
                Box::new(m)
            }
            ModelSpec::Constant(m) => Box::new(m),
        };
        Ok(predictor)
    }
}

/// Deserialize the model stored at `path`.
pub fn load_model(path: &Path) -> Result<Box<dyn Predictor>, ModelError> {
    debug!("reading model artifact {}", path.display());
    let predictor = ModelArtifact::read(path)?.into_predictor()?;
    info!("loaded {} model from {}", predictor.name(), path.display());
    Ok(predictor)
}
