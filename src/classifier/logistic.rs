use serde::{Deserialize, Serialize};

use super::features::{encode_rows, Feature};
use super::{Label, ModelError, Predictor};
use crate::data::Dataset;

fn default_threshold() -> f64 {
    0.5
}

/// Binary logistic regression over encoded features.
///
/// p(survived) = sigmoid(w · x + b); the label is 1 when p ≥ `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub features: Vec<Feature>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != self.features.len() {
            return Err(ModelError::ShapeMismatch {
                features: self.features.len(),
                coefficients: self.coefficients.len(),
            });
        }
        // Logistic inputs must never be NaN.
        for feature in &self.features {
            if let Feature::Numeric { column, fill: None } = feature {
                return Err(ModelError::MissingFill(column.clone()));
            }
        }
        Ok(())
    }

    /// Survival probability for every row.
    pub fn predict_proba(&self, dataset: &Dataset) -> Result<Vec<f64>, ModelError> {
        self.validate()?;
        let rows = encode_rows(&self.features, dataset)?;
        Ok(rows
            .iter()
            .map(|x| {
                let z: f64 = self.intercept
                    + x.iter()
                        .zip(&self.coefficients)
                        .map(|(xi, wi)| xi * wi)
                        .sum::<f64>();
                sigmoid(z)
            })
            .collect())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Predictor for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict(&self, dataset: &Dataset) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .predict_proba(dataset)?
            .into_iter()
            .map(|p| Label::from(p >= self.threshold))
            .collect())
    }
}
