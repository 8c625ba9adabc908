//! Run a persisted survival classifier over a passenger table and summarise
//! the predictions.

pub mod classifier;
pub mod config;
pub mod data;
pub mod predict;
pub mod report;

pub use classifier::{Label, ModelError, Predictor};
pub use config::PredictConfig;
pub use data::{Dataset, Value};
pub use report::Summary;
