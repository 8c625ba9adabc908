//! The `predict` command: load → deserialize → predict → report.

use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use crate::classifier::{load_model, predict_checked};
use crate::config::PredictConfig;
use crate::data::{load_file, Value};
use crate::report::{transposed_preview, Summary, PREVIEW_COLUMNS, PREVIEW_ROWS, SURVIVED_COLUMN};

/// Label every row of `config.input` with the model in `config.modelfile`
/// and write the preview table and summary line to `out`.
///
/// Nothing is written unless every step succeeds.
pub fn run<W: Write>(config: &PredictConfig, out: &mut W) -> Result<Summary> {
    let mut dataset = load_file(&config.input)
        .with_context(|| format!("loading dataset {}", config.input.display()))?;
    info!(
        "loaded {} rows from {}",
        dataset.len(),
        config.input.display()
    );

    let model = load_model(&config.modelfile)?;

    let labels = predict_checked(model.as_ref(), &dataset)
        .with_context(|| format!("running {} model", model.name()))?;

    dataset.set_column(
        SURVIVED_COLUMN,
        labels.iter().map(|&l| Value::Integer(i64::from(l))).collect(),
    )?;

    let preview = transposed_preview(&dataset, &PREVIEW_COLUMNS, PREVIEW_ROWS)?;
    let summary = Summary::from_dataset(&dataset)?;

    writeln!(out, "{preview}")?;
    writeln!(out, "{summary}")?;
    Ok(summary)
}
