//! End-to-end runs of the `predict` command over fixture files.

use std::io::ErrorKind;
use std::path::PathBuf;

use titanic_predict::predict;
use titanic_predict::{ModelError, PredictConfig};

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn config(input: &str, modelfile: &str) -> PredictConfig {
    PredictConfig {
        input: fixture_path(input),
        modelfile: fixture_path(modelfile),
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|e| {
        e.downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::NotFound)
            || e.downcast_ref::<csv::Error>().is_some_and(|c| {
                matches!(c.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound)
            })
    })
}

#[test]
fn test_sex_model_over_csv() {
    let mut out = Vec::new();
    let summary = predict::run(&config("passengers.csv", "sex_model.json"), &mut out).unwrap();

    assert_eq!(summary.total, 12);
    assert_eq!(summary.survived, 4);
    assert_eq!(summary.percentage, 33.33);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.last().copied(), Some("Survived: 4/12 or 33.33%"));

    let survived_row = lines
        .iter()
        .find(|l| l.starts_with("| Survived "))
        .expect("Survived row in preview");
    let cells: Vec<&str> = survived_row
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    assert_eq!(
        cells,
        vec!["Survived", "0", "1", "0", "0", "1", "0", "1", "0", "1", "0", "0", "0"]
    );

    // Passenger 902 has no recorded age.
    let age_row = lines.iter().find(|l| l.starts_with("| Age ")).unwrap();
    assert!(age_row.contains("34.5"));
    assert!(age_row.contains("<null>"));
}

#[test]
fn test_all_zero_model() {
    let mut out = Vec::new();
    let summary = predict::run(&config("passengers.csv", "all_zero.json"), &mut out).unwrap();

    assert_eq!(summary.survived, 0);
    assert_eq!(summary.percentage, 0.0);
    assert!(String::from_utf8(out).unwrap().ends_with("Survived: 0/12 or 0.0%\n"));
}

#[test]
fn test_all_one_model_over_json() {
    let mut out = Vec::new();
    let summary = predict::run(&config("ten_passengers.json", "all_one.json"), &mut out).unwrap();

    assert_eq!(summary.total, 10);
    assert_eq!(summary.percentage, 100.0);
    assert!(String::from_utf8(out).unwrap().ends_with("Survived: 10/10 or 100.0%\n"));
}

#[test]
fn test_missing_input_writes_nothing() {
    let mut out = Vec::new();
    let err = predict::run(&config("no_such_file.csv", "all_one.json"), &mut out).unwrap_err();

    assert!(is_not_found(&err), "expected file-not-found, got {err:#}");
    assert!(out.is_empty());
}

#[test]
fn test_missing_model_file() {
    let mut out = Vec::new();
    let err = predict::run(&config("passengers.csv", "no_such_model.json"), &mut out).unwrap_err();

    assert!(matches!(err.downcast_ref::<ModelError>(), Some(ModelError::Open { .. })));
    assert!(is_not_found(&err));
    assert!(out.is_empty());
}

#[test]
fn test_model_column_missing_from_dataset() {
    let mut out = Vec::new();
    let err = predict::run(&config("passengers.csv", "deck_tree.json"), &mut out).unwrap_err();

    let model_err = err
        .chain()
        .find_map(|e| e.downcast_ref::<ModelError>())
        .expect("model error in chain");
    assert!(matches!(model_err, ModelError::MissingColumn(c) if c == "Deck"));
    assert!(out.is_empty());
}

#[test]
fn test_default_paths() {
    let config = PredictConfig::default();
    assert_eq!(config.input, PathBuf::from("data/test.csv"));
    assert!(config.modelfile.ends_with("artifacts/model/model.json"));
}
