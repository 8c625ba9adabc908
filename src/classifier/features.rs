use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::data::{Dataset, Value};

/// How a model turns one dataset column into one input number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum Feature {
    /// The cell's numeric value. Nulls (and NaN) are replaced by `fill`;
    /// without a fill they stay NaN so a tree can route them.
    Numeric {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<f64>,
    },
    /// 1.0 when the cell equals `category`, 0.0 otherwise (including null).
    OneHot { column: String, category: String },
}

impl Feature {
    pub fn numeric(column: &str, fill: f64) -> Self {
        Feature::Numeric {
            column: column.to_string(),
            fill: Some(fill),
        }
    }

    /// Numeric feature whose missing values reach the model as NaN.
    pub fn numeric_unfilled(column: &str) -> Self {
        Feature::Numeric {
            column: column.to_string(),
            fill: None,
        }
    }

    pub fn one_hot(column: &str, category: &str) -> Self {
        Feature::OneHot {
            column: column.to_string(),
            category: category.to_string(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Feature::Numeric { column, .. } | Feature::OneHot { column, .. } => column,
        }
    }

    fn encode(&self, row: usize, value: &Value) -> Result<f64, ModelError> {
        match self {
            Feature::Numeric { column, fill } => {
                if value.is_null() {
                    return Ok(fill.unwrap_or(f64::NAN));
                }
                value.as_f64().ok_or_else(|| ModelError::NonNumeric {
                    row,
                    column: column.clone(),
                    value: value.to_string(),
                })
            }
            Feature::OneHot { category, .. } => {
                let hit = match value {
                    Value::Null => false,
                    Value::String(s) => s == category,
                    other => other.to_string() == *category,
                };
                Ok(if hit { 1.0 } else { 0.0 })
            }
        }
    }
}

/// Encode every row of `dataset` into a dense feature vector.
///
/// All required columns are checked before any row is touched, so a schema
/// mismatch fails fast with [`ModelError::MissingColumn`].
pub fn encode_rows(features: &[Feature], dataset: &Dataset) -> Result<Vec<Vec<f64>>, ModelError> {
    let positions = features
        .iter()
        .map(|f| {
            dataset
                .column_index(f.column())
                .ok_or_else(|| ModelError::MissingColumn(f.column().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    dataset
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            features
                .iter()
                .zip(&positions)
                .map(|(feature, &col)| feature.encode(row, &cells[col]))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passengers() -> Dataset {
        Dataset::new(
            vec!["Pclass".into(), "Sex".into(), "Age".into()],
            vec![
                vec![Value::Integer(3), Value::String("male".into()), Value::Float(22.0)],
                vec![Value::Integer(1), Value::String("female".into()), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_encode_numeric_and_one_hot() {
        let features = vec![
            Feature::numeric("Pclass", 3.0),
            Feature::one_hot("Sex", "female"),
            Feature::numeric("Age", 29.5),
            Feature::one_hot("Pclass", "1"),
        ];
        let rows = encode_rows(&features, &passengers()).unwrap();
        assert_eq!(rows[0], vec![3.0, 0.0, 22.0, 0.0]);
        assert_eq!(rows[1], vec![1.0, 1.0, 29.5, 1.0]);
    }

    #[test]
    fn test_missing_column() {
        let err = encode_rows(&[Feature::numeric("Fare", 0.0)], &passengers()).unwrap_err();
        assert!(matches!(err, ModelError::MissingColumn(c) if c == "Fare"));
    }

    #[test]
    fn test_string_in_numeric_feature() {
        let err = encode_rows(&[Feature::numeric("Sex", 0.0)], &passengers()).unwrap_err();
        match err {
            ModelError::NonNumeric { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, "Sex");
                assert_eq!(value, "male");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unfilled_null_is_nan() {
        let rows = encode_rows(&[Feature::numeric_unfilled("Age")], &passengers()).unwrap();
        assert_eq!(rows[0], vec![22.0]);
        assert!(rows[1][0].is_nan());
    }

    #[test]
    fn test_feature_json_shape() {
        let json = r#"[{"encoding": "numeric", "column": "Age"},
                       {"encoding": "one_hot", "column": "Sex", "category": "female"}]"#;
        let features: Vec<Feature> = serde_json::from_str(json).unwrap();
        assert_eq!(features[0], Feature::numeric_unfilled("Age"));
        assert_eq!(features[1], Feature::one_hot("Sex", "female"));
    }
}
