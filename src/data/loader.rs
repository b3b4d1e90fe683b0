use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    DataTable, Value, MEASUREMENT_ATTRIBUTES, SPECIES_COLUMN, TIP_COLUMN, TOTAL_BILL_COLUMN,
};
use crate::config::DashboardConfig;

const BUNDLED_PENGUINS: &str = include_str!("../../assets/penguins.csv");
const BUNDLED_TIPS: &str = include_str!("../../assets/tips.csv");

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the penguin table from the configured path (or the bundled excerpt)
/// and check it against the dashboard's schema and declared species.
pub fn load_penguins(config: &DashboardConfig) -> Result<DataTable> {
    let table = match &config.penguins_path {
        Some(path) => load_file(path)?,
        None => parse_csv("penguins", BUNDLED_PENGUINS.as_bytes())?,
    };
    validate_penguins(table, &config.species)
}

/// Load the tips example table from the configured path (or the bundled one).
pub fn load_tips(config: &DashboardConfig) -> Result<DataTable> {
    let table = match &config.tips_path {
        Some(path) => load_file(path)?,
        None => parse_csv("tips", BUNDLED_TIPS.as_bytes())?,
    };
    table.require_columns(&[TIP_COLUMN, TOTAL_BILL_COLUMN])?;
    if table.is_empty() {
        log::warn!("'{}' has no rows; the tips histograms will be empty", table.name);
    }
    log::info!("Loaded {} rows of '{}'", table.len(), table.name);
    Ok(table)
}

/// Schema and label checks shared by startup and File → Open….
pub fn validate_penguins(table: DataTable, species: &[String]) -> Result<DataTable> {
    table.require_columns(&[SPECIES_COLUMN])?;
    table.require_columns(&MEASUREMENT_ATTRIBUTES)?;
    table.validate_labels(SPECIES_COLUMN, species)?;
    if table.is_empty() {
        log::warn!("'{}' has no rows; every penguin view will be empty", table.name);
    }
    log::info!(
        "Loaded {} rows of '{}' with columns {:?}",
        table.len(),
        table.name,
        table.columns
    );
    Ok(table)
}

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "species": "Adelie", "body_mass_g": 3750, ... }, ...]`
/// * `.parquet` – flat primitive columns
pub fn load_file(path: &Path) -> Result<DataTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            parse_csv(&name, file)
        }
        "json" => load_json(&name, path),
        "parquet" | "pq" => load_parquet(&name, path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn parse_csv<R: std::io::Read>(name: &str, input: R) -> Result<DataTable> {
    let mut reader = csv::Reader::from_reader(input);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_value_type).collect());
    }

    Ok(DataTable::new(name, columns, rows))
}

fn guess_value_type(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() || s == "NA" || s == "NaN" {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`).
/// Columns are taken in first-seen order; keys absent from a record read
/// as missing.
fn load_json(name: &str, path: &Path) -> Result<DataTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(name, &text)
}

fn parse_json(name: &str, text: &str) -> Result<DataTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map(json_to_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(DataTable::new(name, columns, rows))
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

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested columns are rendered as text.
fn load_parquet(name: &str, path: &Path) -> Result<DataTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_value(col, row))
                    .collect(),
            );
        }
    }

    Ok(DataTable::new(name, columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => float_or_null(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_or_null(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            match arrow::util::display::array_value_to_string(col, row) {
                Ok(s) => Value::Date(s),
                Err(_) => Value::Null,
            }
        }
        other => Value::String(format!("{other:?}")),
    }
}

/// NaN is how pandas writes a missing float; treat it like a null cell.
fn float_or_null(v: f64) -> Value {
    if v.is_nan() {
        Value::Null
    } else {
        Value::Float(v)
    }
}
