use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Record, StudentDataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Problems with the *shape* of an otherwise readable file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("dataset has no '{0}' column")]
    MissingColumn(String),

    #[error("row {row}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("expected a top-level array of objects: {0}")]
    NotRecords(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean a student dataset.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one student per line
/// * `.json`    – `[{ "student_id": "S1000", "exam_score": 56.2, ... }, ...]`
/// * `.parquet` – flat columns (strings, ints or floats)
///
/// Any row with a missing cell in *any* column is dropped.
pub fn load_file(path: &Path) -> Result<StudentDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    let dataset = clean(&table)?;
    log::debug!(
        "{}: kept {} rows, dropped {} incomplete rows",
        path.display(),
        dataset.len(),
        dataset.dropped_rows
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw table – format-independent intermediate
// ---------------------------------------------------------------------------

/// A single cell as read from the source, before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    /// NaN counts as missing, as it does in a dataframe.
    fn number(v: f64) -> Cell {
        if v.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(v)
        }
    }

    fn from_csv(raw: &str) -> Cell {
        let s = raw.trim();
        if NA_TOKENS.contains(&s) {
            Cell::Missing
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Strings a dataframe reader treats as missing by default.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column names plus rows of cells; a row may be shorter than `headers`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

// ---------------------------------------------------------------------------
// Cleaning: RawTable → StudentDataset
// ---------------------------------------------------------------------------

/// Positions of the columns the dashboard reads.
struct Columns {
    student_id: usize,
    study_hours_per_day: usize,
    sleep_hours: usize,
    mental_health_rating: usize,
    exam_score: usize,
    gender: usize,
    diet_quality: usize,
    internet_quality: usize,
    part_time_job: usize,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        Ok(Columns {
            student_id: find("student_id")?,
            study_hours_per_day: find("study_hours_per_day")?,
            sleep_hours: find("sleep_hours")?,
            mental_health_rating: find("mental_health_rating")?,
            exam_score: find("exam_score")?,
            gender: find("gender")?,
            diet_quality: find("diet_quality")?,
            internet_quality: find("internet_quality")?,
            part_time_job: find("part_time_job")?,
        })
    }
}

/// Drop incomplete rows and type the rest.
pub fn clean(table: &RawTable) -> Result<StudentDataset, LoadError> {
    let cols = Columns::resolve(&table.headers)?;
    let width = table.headers.len();

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0;

    for (row_no, row) in table.rows.iter().enumerate() {
        if row.len() < width || row.iter().any(|c| *c == Cell::Missing) {
            dropped += 1;
            continue;
        }

        let number = |idx: usize| cell_to_f64(&row[idx], row_no, &table.headers[idx]);
        let study_hours_per_day = number(cols.study_hours_per_day)?;
        let sleep_hours = number(cols.sleep_hours)?;
        let mental_health_rating = number(cols.mental_health_rating)?;
        let exam_score = number(cols.exam_score)?;

        // Text such as "NAN" parses to NaN and is just as missing.
        if [study_hours_per_day, sleep_hours, mental_health_rating, exam_score]
            .iter()
            .any(|v| v.is_nan())
        {
            dropped += 1;
            continue;
        }

        records.push(Record {
            student_id: cell_to_string(&row[cols.student_id]),
            study_hours_per_day,
            sleep_hours,
            mental_health_rating,
            exam_score,
            gender: cell_to_string(&row[cols.gender]),
            diet_quality: cell_to_string(&row[cols.diet_quality]),
            internet_quality: cell_to_string(&row[cols.internet_quality]),
            part_time_job: cell_to_string(&row[cols.part_time_job]),
        });
    }

    Ok(StudentDataset::new(records, dropped))
}

fn cell_to_f64(cell: &Cell, row: usize, column: &str) -> Result<f64, LoadError> {
    match cell {
        Cell::Number(v) => Ok(*v),
        Cell::Text(s) => s.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
            row,
            column: column.to_string(),
            value: s.clone(),
        }),
        Cell::Missing => Err(LoadError::InvalidNumber {
            row,
            column: column.to_string(),
            value: String::new(),
        }),
    }
}

fn cell_to_string(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
        Cell::Number(v) => v.to_string(),
        Cell::Missing => String::new(),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one student per line.
/// Short lines are allowed; their absent cells count as missing.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(Cell::from_csv).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// A key absent from an object counts as missing for that row.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::NotRecords("top-level value is not an array".into()))?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::NotRecords(format!("row {i} is not an object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(Cell::Missing))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Cell::number)
            .unwrap_or_else(|| Cell::Text(n.to_string())),
        JsonValue::Bool(b) => Cell::Text(b.to_string()),
        JsonValue::Null => Cell::Missing,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch.columns();
        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| extract_cell(col, row)).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Missing;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Cell::number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Cell::number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::number(col.as_primitive::<Float64Type>().value(row)),
        _ => array_value_to_string(col, row)
            .map(Cell::Text)
            .unwrap_or(Cell::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const HEADER: &str = "student_id,age,gender,study_hours_per_day,part_time_job,sleep_hours,diet_quality,internet_quality,mental_health_rating,exam_score";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn csv_rows_with_missing_cells_are_dropped() {
        let csv = format!(
            "{HEADER}\n\
             S1000,23,Female,0.0,No,8.0,Fair,Average,8,56.2\n\
             S1001,20,Female,6.9,No,4.6,Good,Average,8,100.0\n\
             S1002,21,Male,1.4,No,8.0,Poor,,1,34.3\n\
             S1003,,Male,1.0,No,9.2,Poor,Good,1,26.8\n\
             S1004,24,Other,3.7,Yes,NA,Fair,Good,1,66.4\n\
             S1005,24,Male,4.2\n"
        );
        let file = write_temp(".csv", &csv);

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 4);
        assert_eq!(
            ds.records[1],
            Record {
                student_id: "S1001".into(),
                study_hours_per_day: 6.9,
                sleep_hours: 4.6,
                mental_health_rating: 8.0,
                exam_score: 100.0,
                gender: "Female".into(),
                diet_quality: "Good".into(),
                internet_quality: "Average".into(),
                part_time_job: "No".into(),
            }
        );
    }

    #[test]
    fn nan_spellings_in_numeric_columns_are_dropped() {
        let csv = format!(
            "{HEADER}\n\
             S1,20,Male,2.0,No,7.0,Good,Good,5,NAN\n\
             S2,21,Female,3.0,No,7.5,Good,Good,6,80\n\
             S3,22,Female,Nan,No,6.5,Poor,Good,4,55\n"
        );
        let file = write_temp(".csv", &csv);

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows, 2);
        assert_eq!(ds.records[0].student_id, "S2");
        assert_eq!(ds.study_hours_bounds(), Some((3.0, 3.0)));
        assert!(ds.records.iter().all(|r| !r.exam_score.is_nan()));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let file = write_temp(".csv", "student_id,gender\nS1,Male\n");
        let err = load_file(file.path()).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::MissingColumn(col)) => assert_eq!(col, "study_hours_per_day"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_score_is_an_error() {
        let csv = format!("{HEADER}\nS1,20,Male,2.0,No,7.0,Good,Good,5,excellent\n");
        let file = write_temp(".csv", &csv);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidNumber { row: 0, column, .. }) if column == "exam_score"
        ));
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_file(Path::new("/nonexistent/students.csv")).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_records_load_and_nulls_drop() {
        let json = r#"[
            {"student_id": 1, "gender": "Male", "study_hours_per_day": 2.5, "sleep_hours": 7,
             "mental_health_rating": 6, "exam_score": 71.5, "diet_quality": "Good",
             "internet_quality": "Poor", "part_time_job": "Yes"},
            {"student_id": 2, "gender": "Female", "study_hours_per_day": null, "sleep_hours": 7,
             "mental_health_rating": 6, "exam_score": 71.5, "diet_quality": "Good",
             "internet_quality": "Poor", "part_time_job": "Yes"},
            {"student_id": 3, "gender": "Female", "sleep_hours": 7,
             "mental_health_rating": 6, "exam_score": 71.5, "diet_quality": "Good",
             "internet_quality": "Poor", "part_time_job": "Yes"}
        ]"#;
        let file = write_temp(".json", json);

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows, 2);
        assert_eq!(ds.records[0].student_id, "1");
        assert_eq!(ds.records[0].sleep_hours, 7.0);
    }

    #[test]
    fn json_object_root_is_rejected() {
        let file = write_temp(".json", r#"{"student_id": 1}"#);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NotRecords(_))
        ));
    }

    #[test]
    fn parquet_columns_load() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("student_id", DataType::Int64, false),
            Field::new("gender", DataType::Utf8, false),
            Field::new("study_hours_per_day", DataType::Float64, true),
            Field::new("sleep_hours", DataType::Float64, false),
            Field::new("mental_health_rating", DataType::Int64, false),
            Field::new("exam_score", DataType::Float64, false),
            Field::new("diet_quality", DataType::Utf8, false),
            Field::new("internet_quality", DataType::Utf8, false),
            Field::new("part_time_job", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![10, 11])),
                Arc::new(StringArray::from(vec!["Male", "Female"])),
                Arc::new(Float64Array::from(vec![Some(3.5), None])),
                Arc::new(Float64Array::from(vec![6.0, 8.0])),
                Arc::new(Int64Array::from(vec![4, 9])),
                Arc::new(Float64Array::from(vec![61.0, 88.0])),
                Arc::new(StringArray::from(vec!["Poor", "Good"])),
                Arc::new(StringArray::from(vec!["Good", "Good"])),
                Arc::new(StringArray::from(vec!["No", "Yes"])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let out = std::fs::File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows, 1);
        assert_eq!(ds.records[0].student_id, "10");
        assert_eq!(ds.records[0].mental_health_rating, 4.0);
        assert_eq!(ds.records[0].diet_quality, "Poor");
    }
}
