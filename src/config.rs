//! Paths the `predict` command works on.

use std::path::PathBuf;

/// Dataset read when `--input` is not given.
pub const DEFAULT_INPUT: &str = "data/test.csv";

/// Model artifact read when `--modelfile` is not given.
pub const DEFAULT_MODELFILE: &str =
    "./mlruns/0/8730c91516604d71a26fb1e2b351468e/artifacts/model/model.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictConfig {
    /// Passenger table (`.csv`, `.json` or `.parquet`).
    pub input: PathBuf,
    /// Serialized model artifact.
    pub modelfile: PathBuf,
}

impl Default for PredictConfig {
    fn default() -> Self {
        PredictConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            modelfile: PathBuf::from(DEFAULT_MODELFILE),
        }
    }
}
