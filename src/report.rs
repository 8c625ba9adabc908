//! Console summary of a labelled dataset.

use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use thiserror::Error;

use crate::classifier::Label;
use crate::data::model::format_float;
use crate::data::{Dataset, DatasetError};

/// Column holding the predicted label of each row.
pub const SURVIVED_COLUMN: &str = "Survived";

/// Columns shown in the preview, top to bottom.
pub const PREVIEW_COLUMNS: [&str; 5] = ["Age", "Pclass", "Sex", "Fare", SURVIVED_COLUMN];

/// Number of rows shown in the preview.
pub const PREVIEW_ROWS: usize = 20;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot compute a survival rate over an empty dataset")]
    EmptyDataset,

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("failed to render preview table")]
    Render(#[from] ArrowError),
}

// ---------------------------------------------------------------------------
// Summary line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub survived: usize,
    /// `100 * survived / total`, rounded to two decimals.
    pub percentage: f64,
}

impl Summary {
    fn new(survived: usize, total: usize) -> Result<Self, ReportError> {
        if total == 0 {
            return Err(ReportError::EmptyDataset);
        }
        Ok(Summary {
            total,
            survived,
            percentage: round2(100.0 * survived as f64 / total as f64),
        })
    }

    /// Count rows whose [`SURVIVED_COLUMN`] equals 1.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, ReportError> {
        let survived = dataset
            .column(SURVIVED_COLUMN)?
            .filter(|v| v.as_f64() == Some(1.0))
            .count();
        Self::new(survived, dataset.len())
    }

    pub fn from_labels(labels: &[Label]) -> Result<Self, ReportError> {
        Self::new(labels.iter().filter(|&&l| l == 1).count(), labels.len())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Survived: {}/{} or {}%",
            self.survived,
            self.total,
            format_float(self.percentage)
        )
    }
}

/// Two decimal places, exact ties to the even neighbour (3.125 → 3.12).
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

// ---------------------------------------------------------------------------
// Transposed preview table
// ---------------------------------------------------------------------------

/// First `n_rows` rows of `columns`, rendered with one line per column and
/// one table column per dataset row (headed by the row index).
pub fn transposed_preview(
    dataset: &Dataset,
    columns: &[&str],
    n_rows: usize,
) -> Result<String, ReportError> {
    let view = dataset.select(columns)?.head(n_rows);

    let mut fields = vec![Field::new("", DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(view.column_names().to_vec()))];

    for (i, cells) in view.rows().iter().enumerate() {
        fields.push(Field::new(i.to_string(), DataType::Utf8, false));
        arrays.push(Arc::new(StringArray::from_iter_values(
            cells.iter().map(|v| v.to_string()),
        )));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}
