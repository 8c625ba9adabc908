use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Value – a single cell in the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64`. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Missing data: an explicit null or a NaN float.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

/// Render a float the way Pandas does for display: whole numbers keep one
/// decimal place (`22.0`), everything else uses the shortest round-trip form.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{column}' has {actual} values but the dataset has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} cells but the dataset has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// The full parsed table. Rows are stored positionally; `column_names`
/// gives the name of each cell position, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    column_names: Vec<String>,
    rows: Vec<Vec<Value>>,
    index: HashMap<String, usize>,
}

impl Dataset {
    /// Build a dataset, checking that every row is as wide as the header.
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DatasetError> {
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != column_names.len() {
                return Err(DatasetError::RowWidth {
                    row,
                    expected: column_names.len(),
                    actual: cells.len(),
                });
            }
        }
        let index = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Ok(Dataset {
            column_names,
            rows,
            index,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Cell at (`row`, `column`), if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[col])
    }

    /// All values of one column, top to bottom.
    pub fn column<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = &'a Value> + 'a, DatasetError> {
        let col = self
            .column_index(name)
            .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(move |cells| &cells[col]))
    }

    /// Append a column, or overwrite it in place when the name already exists.
    /// `values` must be positionally aligned with the rows.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), DatasetError> {
        if values.len() != self.rows.len() {
            return Err(DatasetError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.column_index(name) {
            Some(col) => {
                for (cells, value) in self.rows.iter_mut().zip(values) {
                    cells[col] = value;
                }
            }
            None => {
                self.index.insert(name.to_string(), self.column_names.len());
                self.column_names.push(name.to_string());
                for (cells, value) in self.rows.iter_mut().zip(values) {
                    cells.push(value);
                }
            }
        }
        Ok(())
    }

    /// The first `n` rows (or all of them when there are fewer).
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            column_names: self.column_names.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            index: self.index.clone(),
        }
    }

    /// Project onto `columns`, in the order given.
    pub fn select(&self, columns: &[&str]) -> Result<Dataset, DatasetError> {
        let positions = columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|cells| positions.iter().map(|&i| cells[i].clone()).collect())
            .collect();
        Dataset::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }
}
