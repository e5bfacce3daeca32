use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type, UInt64Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, SalesRecord};

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "date",
    "country",
    "store_type",
    "store_id",
    "product_category",
    "total_sales",
    "avg_order_value",
    "loyalty_member_count",
];

/// Validation failures. Rows count data records from 1; a CSV header is not
/// a row.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("file contains no data rows")]
    NoRows,

    #[error("row {row}: '{value}' is not a valid date")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: column '{column}' must be a finite non-negative number, got {value}")]
    InvalidAmount {
        row: usize,
        column: &'static str,
        value: f64,
    },

    #[error("row {row}: column '{column}' is null")]
    NullCell { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' must be a non-negative integer, got {value}")]
    NegativeCount {
        row: usize,
        column: &'static str,
        value: i64,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (recommended)
/// * `.json`    – `[{ "date": "2024-01-01", "country": "US", ... }, ...]`
/// * `.parquet` – same column names; `date` may be a string, date or timestamp column
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.is_empty() {
        return Err(LoadError::NoRows).with_context(|| format!("loading {}", path.display()));
    }

    log::info!(
        "Loaded {} sales records ({} countries, {} store types) from {}",
        dataset.len(),
        dataset.countries().len(),
        dataset.store_types().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row validation shared by the text formats
// ---------------------------------------------------------------------------

/// A date cell: text, or epoch milliseconds as written by `df.to_json()`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    EpochMillis(i64),
}

impl RawDate {
    fn resolve(&self, row: usize) -> Result<NaiveDate, LoadError> {
        let parsed = match self {
            RawDate::Text(s) => parse_date(s),
            RawDate::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.date_naive()),
        };
        parsed.ok_or_else(|| LoadError::InvalidDate {
            row,
            value: match self {
                RawDate::Text(s) => s.clone(),
                RawDate::EpochMillis(ms) => ms.to_string(),
            },
        })
    }
}

/// One row exactly as it appears in a CSV or JSON file.
#[derive(Debug, Deserialize)]
struct RawRecord {
    date: RawDate,
    country: String,
    store_type: String,
    store_id: String,
    product_category: String,
    total_sales: f64,
    avg_order_value: f64,
    loyalty_member_count: u64,
}

impl RawRecord {
    fn validate(self, row: usize) -> Result<SalesRecord, LoadError> {
        Ok(SalesRecord {
            date: self.date.resolve(row)?,
            country: self.country,
            store_type: self.store_type,
            store_id: self.store_id,
            product_category: self.product_category,
            total_sales: check_amount(self.total_sales, row, "total_sales")?,
            avg_order_value: check_amount(self.avg_order_value, row, "avg_order_value")?,
            loyalty_member_count: self.loyalty_member_count,
        })
    }
}

/// Accepts plain dates and datetimes; any time part is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn check_amount(value: f64, row: usize, column: &'static str) -> Result<f64, LoadError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LoadError::InvalidAmount { row, column, value })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with at least [`REQUIRED_COLUMNS`]; extra columns
/// are ignored.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()).into());
        }
    }

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawRecord>().enumerate() {
        let row_no = i + 1;
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.validate(row_no)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "date": "2024-01-01",
///     "country": "US",
///     "store_type": "Mall",
///     "store_id": "S1",
///     "product_category": "Beverage",
///     "total_sales": 100.0,
///     "avg_order_value": 5.0,
///     "loyalty_member_count": 10
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: serde_json::Value = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let i = idx + 1;
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        if let Some(col) = REQUIRED_COLUMNS.iter().find(|c| !obj.contains_key(**c)) {
            return Err(LoadError::MissingColumn(col.to_string()).into());
        }
        let raw: RawRecord =
            serde_json::from_value(row.clone()).with_context(|| format!("JSON row {i}"))?;
        records.push(raw.validate(i)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the sales table.
///
/// Columns are cast to their canonical Arrow type before reading, so files
/// written by **Pandas** (timestamp dates, int64 counts) and by **Polars**
/// (date32 dates, large strings) both work.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        read_batch(&batch, records.len() + 1, &mut records)?;
    }

    Ok(Dataset::from_records(records))
}

/// The eight required columns of one batch, normalised.
struct SalesColumns {
    date: ArrayRef,
    country: ArrayRef,
    store_type: ArrayRef,
    store_id: ArrayRef,
    product_category: ArrayRef,
    total_sales: ArrayRef,
    avg_order_value: ArrayRef,
    loyalty_member_count: ArrayRef,
}

fn read_batch(batch: &RecordBatch, first_row: usize, out: &mut Vec<SalesRecord>) -> Result<()> {
    let column = |name: &str, to: &DataType| -> Result<ArrayRef> {
        let col = batch
            .column_by_name(name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
        // Text dates go through parse_date so datetime strings are accepted too.
        if name == "date" && matches!(col.data_type(), DataType::Utf8 | DataType::LargeUtf8) {
            return Ok(col.clone());
        }
        cast(col.as_ref(), to).with_context(|| format!("casting column '{name}' to {to}"))
    };

    let cols = SalesColumns {
        date: column("date", &DataType::Date32)?,
        country: column("country", &DataType::Utf8)?,
        store_type: column("store_type", &DataType::Utf8)?,
        store_id: column("store_id", &DataType::Utf8)?,
        product_category: column("product_category", &DataType::Utf8)?,
        total_sales: column("total_sales", &DataType::Float64)?,
        avg_order_value: column("avg_order_value", &DataType::Float64)?,
        loyalty_member_count: {
            let name = "loyalty_member_count";
            let col = batch
                .column_by_name(name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
            // Signed sources keep their sign so negatives are reported, not nulled.
            let to = if col.data_type().is_unsigned_integer() {
                DataType::UInt64
            } else {
                DataType::Int64
            };
            column(name, &to)?
        },
    };

    out.reserve(batch.num_rows());
    for i in 0..batch.num_rows() {
        let row = first_row + i;
        out.push(SalesRecord {
            date: date_at(&cols.date, i, row)?,
            country: string_at(&cols.country, i, row, "country")?,
            store_type: string_at(&cols.store_type, i, row, "store_type")?,
            store_id: string_at(&cols.store_id, i, row, "store_id")?,
            product_category: string_at(&cols.product_category, i, row, "product_category")?,
            total_sales: check_amount(
                float_at(&cols.total_sales, i, row, "total_sales")?,
                row,
                "total_sales",
            )?,
            avg_order_value: check_amount(
                float_at(&cols.avg_order_value, i, row, "avg_order_value")?,
                row,
                "avg_order_value",
            )?,
            loyalty_member_count: count_at(&cols.loyalty_member_count, i, row, "loyalty_member_count")?,
        });
    }
    Ok(())
}

// -- Arrow cell helpers --

fn date_at(col: &ArrayRef, i: usize, row: usize) -> Result<NaiveDate, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::NullCell { row, column: "date" });
    }
    match col.data_type() {
        DataType::Utf8 => {
            let s = col.as_string::<i32>().value(i);
            parse_date(s).ok_or_else(|| LoadError::InvalidDate { row, value: s.to_string() })
        }
        DataType::LargeUtf8 => {
            let s = col.as_string::<i64>().value(i);
            parse_date(s).ok_or_else(|| LoadError::InvalidDate { row, value: s.to_string() })
        }
        _ => {
            let arr = col.as_primitive::<Date32Type>();
            arr.value_as_date(i).ok_or_else(|| LoadError::InvalidDate {
                row,
                value: arr.value(i).to_string(),
            })
        }
    }
}

fn count_at(col: &ArrayRef, i: usize, row: usize, column: &'static str) -> Result<u64, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::NullCell { row, column });
    }
    if col.data_type() == &DataType::UInt64 {
        return Ok(col.as_primitive::<UInt64Type>().value(i));
    }
    let value = col.as_primitive::<Int64Type>().value(i);
    u64::try_from(value).map_err(|_| LoadError::NegativeCount { row, column, value })
}

fn string_at(col: &ArrayRef, i: usize, row: usize, column: &'static str) -> Result<String, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::NullCell { row, column });
    }
    Ok(col.as_string::<i32>().value(i).to_string())
}

fn float_at(col: &ArrayRef, i: usize, row: usize, column: &'static str) -> Result<f64, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::NullCell { row, column });
    }
    Ok(col.as_primitive::<Float64Type>().value(i))
}
