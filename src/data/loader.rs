use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a passenger table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma separated; column types are inferred
/// * `.json`    – `[{ "Pclass": 3, "Sex": "male", ... }, ...]`
/// * `.parquet` – flat schema written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    debug!(
        "loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.column_names().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column type chosen after scanning every non-empty cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bool,
    Int,
    Float,
    Str,
}

/// Widen `current` so that it can also hold `cell`.
fn widen(current: Option<Kind>, cell: &str) -> Kind {
    let is_bool = parse_bool(cell).is_some();
    let is_int = cell.parse::<i64>().is_ok();
    let is_float = cell.parse::<f64>().is_ok();

    match current {
        None if is_bool => Kind::Bool,
        None | Some(Kind::Int) if is_int => Kind::Int,
        None | Some(Kind::Int) | Some(Kind::Float) if is_float => Kind::Float,
        Some(Kind::Bool) if is_bool => Kind::Bool,
        _ => Kind::Str,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn convert_cell(kind: Kind, cell: String) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    // `widen` has already checked that every cell parses as `kind`.
    match kind {
        Kind::Bool => parse_bool(&cell).map_or(Value::String(cell), Value::Bool),
        Kind::Int => cell
            .parse()
            .map_or_else(|_| Value::String(cell), Value::Integer),
        Kind::Float => cell
            .parse()
            .map_or_else(|_| Value::String(cell), Value::Float),
        Kind::Str => Value::String(cell),
    }
}

/// CSV layout: header row with column names, one passenger per record.
/// Empty cells become [`Value::Null`]. Each column gets the narrowest type
/// that fits all of its cells (bool, integer, float, otherwise string).
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut kinds: Vec<Option<Kind>> = vec![None; headers.len()];
    let mut raw_rows: Vec<Vec<String>> = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }

        let mut cells = Vec::with_capacity(headers.len());
        for (col, field) in record.iter().enumerate() {
            if !field.is_empty() {
                kinds[col] = Some(widen(kinds[col], field));
            }
            cells.push(field.to_string());
        }
        raw_rows.push(cells);
    }

    // Columns with no values at all stay untyped: every cell is null.
    let kinds: Vec<Kind> = kinds.into_iter().map(|k| k.unwrap_or(Kind::Str)).collect();

    let rows = raw_rows
        .into_iter()
        .map(|cells| {
            cells
                .into_iter()
                .zip(&kinds)
                .map(|(cell, &kind)| convert_cell(kind, cell))
                .collect()
        })
        .collect();

    Ok(Dataset::new(headers, rows)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "PassengerId": 892, "Pclass": 3, "Sex": "male", "Age": 34.5 },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen order; keys missing from a record are null.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON file {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut column_names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            column_names
                .iter()
                .map(|col| obj.get(col).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();

    Ok(Dataset::new(column_names, rows)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per feature.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested columns are rendered to text.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    Ok(Dataset::new(column_names, collect_batches(reader)?)?)
}

/// Flatten record batches into rows. Row numbers in errors count from the
/// start of the file, not the current batch.
fn collect_batches<I>(batches: I) -> Result<Vec<Vec<Value>>>
where
    I: IntoIterator<Item = Result<RecordBatch, ArrowError>>,
{
    let mut rows = Vec::new();

    for batch_result in batches {
        let offset = rows.len();
        let batch = batch_result
            .with_context(|| format!("reading parquet record batch at row {offset}"))?;

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| {
                    extract_value(col, row)
                        .with_context(|| format!("Row {}: failed to read cell", offset + row))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Extract a single value from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => Value::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer)
        }
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        _ => Value::String(array_value_to_string(col.as_ref(), row)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("titanic-predict-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_widen_lattice() {
        assert_eq!(widen(None, "3"), Kind::Int);
        assert_eq!(widen(Some(Kind::Int), "22.5"), Kind::Float);
        assert_eq!(widen(Some(Kind::Float), "7"), Kind::Float);
        assert_eq!(widen(Some(Kind::Float), "male"), Kind::Str);
        assert_eq!(widen(None, "True"), Kind::Bool);
        assert_eq!(widen(Some(Kind::Bool), "1"), Kind::Str);
    }

    #[test]
    fn test_load_csv_infers_column_types() {
        let path = scratch_file(
            "types.csv",
            "PassengerId,Pclass,Sex,Age,Fare\n\
             892,3,male,34.5,7.8292\n\
             893,3,female,47,7\n\
             894,2,male,,9.6875\n",
        );
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.get(0, "Pclass"), Some(&Value::Integer(3)));
        assert_eq!(ds.get(0, "Sex"), Some(&Value::String("male".into())));
        // Age mixes "34.5" and "47" so the whole column is float.
        assert_eq!(ds.get(1, "Age"), Some(&Value::Float(47.0)));
        assert_eq!(ds.get(2, "Age"), Some(&Value::Null));
        assert_eq!(ds.get(1, "Fare"), Some(&Value::Float(7.0)));
    }

    #[test]
    fn test_load_json_records() {
        let path = scratch_file(
            "records.json",
            r#"[{"Pclass": 1, "Sex": "female", "Age": 38.0},
                {"Pclass": 3, "Sex": "male", "Cabin": null}]"#,
        );
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), &["Pclass", "Sex", "Age", "Cabin"]);
        assert_eq!(ds.get(1, "Age"), Some(&Value::Null));
        assert_eq!(ds.get(0, "Age"), Some(&Value::Float(38.0)));
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let path = scratch_file("object.json", r#"{"Pclass": 1}"#);
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("top-level JSON array"));
    }

    #[test]
    fn test_load_parquet_scalar_columns() {
        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Pclass", DataType::Int64, false),
            Field::new("Sex", DataType::Utf8, false),
            Field::new("Age", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![3, 1])),
                Arc::new(StringArray::from(vec!["male", "female"])),
                Arc::new(Float64Array::from(vec![Some(22.0), None])),
            ],
        )
        .unwrap();

        let path = scratch_file("passengers.parquet", "");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), &["Pclass", "Sex", "Age"]);
        assert_eq!(ds.get(0, "Pclass"), Some(&Value::Integer(3)));
        assert_eq!(ds.get(1, "Sex"), Some(&Value::String("female".into())));
        assert_eq!(ds.get(0, "Age"), Some(&Value::Float(22.0)));
        assert_eq!(ds.get(1, "Age"), Some(&Value::Null));
    }

    #[test]
    fn test_load_parquet_keeps_rows_across_batches() {
        use arrow::array::Int64Array;
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;
        use parquet::file::properties::WriterProperties;

        let schema = Arc::new(Schema::new(vec![Field::new("PassengerId", DataType::Int64, false)]));
        let batch = |ids: Vec<i64>| {
            RecordBatch::try_new(schema.clone(), vec![Arc::new(Int64Array::from(ids))]).unwrap()
        };

        let path = scratch_file("batches.parquet", "");
        let file = std::fs::File::create(&path).unwrap();
        let props = WriterProperties::builder().set_max_row_group_size(2).build();
        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props)).unwrap();
        writer.write(&batch(vec![892, 893])).unwrap();
        writer.write(&batch(vec![894, 895])).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.get(3, "PassengerId"), Some(&Value::Integer(895)));

        // A failure in the second batch is reported at its file-level row.
        let err = collect_batches(vec![
            Ok(batch(vec![892, 893])),
            Err(ArrowError::ParseError("truncated page".into())),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "reading parquet record batch at row 2");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_file(Path::new("/nonexistent/data/test.csv")).unwrap_err();
        let io = err
            .chain()
            .find_map(|e| e.downcast_ref::<csv::Error>())
            .expect("csv error in chain");
        assert!(matches!(io.kind(), csv::ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("passengers.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
