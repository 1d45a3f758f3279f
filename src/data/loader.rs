use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use encoding_rs::WINDOWS_1252;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Cell, Column, SurveyTable};

/// The 2018 General Social Survey extract the dashboard is built on.
pub const DEFAULT_SOURCE: &str =
    "https://github.com/jkropko/DS-6001/raw/master/localdata/gss2018.csv";

/// Raw answers meaning "not applicable / don't know / not asked".
pub const MISSING_SENTINELS: &[&str] = &[
    "IAP",
    "IAP,DK,NA,uncodeable",
    "NOT SURE",
    "DK",
    "IAP, DK, NA, uncodeable",
    ".a",
    "CAN'T CHOOSE",
];

/// Generic null markers every tabular reader treats as missing.
const NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "NULL", "null", "None", "<NA>", "#N/A",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the raw survey table from a URL or a local path.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – windows-1252 encoded text, header row with column names
/// * `.parquet` – typed columns, e.g. an offline snapshot of the same extract
///
/// Cells are left uncleaned apart from missing-value sentinels, which become
/// [`Cell::Absent`].
pub fn load_source(source: &str) -> Result<SurveyTable> {
    let bytes = if is_remote(source) {
        fetch(source)?
    } else {
        std::fs::read(source).with_context(|| format!("reading {source}"))?
    };

    match source_extension(source).as_str() {
        "csv" => parse_csv(&bytes),
        "parquet" | "pq" => parse_parquet(bytes),
        other => bail!("Unsupported source extension: .{other}"),
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn source_extension(source: &str) -> String {
    let without_query = source.split(['?', '#']).next().unwrap_or(source);
    Path::new(without_query)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    log::info!("Fetching survey data from {url}");
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("requesting {url}"))?;
    let bytes = response
        .bytes()
        .with_context(|| format!("reading response body from {url}"))?;
    log::debug!("Fetched {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

/// Map a raw field to a cell, turning sentinels and null markers into `Absent`.
pub fn raw_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if MISSING_SENTINELS.contains(&trimmed) || NULL_MARKERS.contains(&trimmed) {
        Cell::Absent
    } else {
        Cell::Text(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse windows-1252 CSV bytes. Every present field is kept as text; numeric
/// columns are recognised later during cleaning.
pub fn parse_csv(bytes: &[u8]) -> Result<SurveyTable> {
    let text = decode_windows_1252(bytes).context("decoding CSV as windows-1252")?;
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(raw_cell(value));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();
    Ok(SurveyTable::new(columns)?)
}

/// Decode windows-1252 text as web browsers do.
pub fn decode_windows_1252(bytes: &[u8]) -> Result<Cow<'_, str>> {
    WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .context("malformed windows-1252 text")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet snapshot of the survey.
///
/// String columns go through the same sentinel mapping as CSV fields; integer
/// and float columns become numbers directly. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
pub fn parse_parquet(data: Vec<u8>) -> Result<SurveyTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(data))
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = schema
                .fields()
                .iter()
                .map(|f| Column::new(f.name().clone(), Vec::new()))
                .collect();
        }

        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                let cell = extract_cell(array, row)
                    .with_context(|| format!("column '{}' row {row}", column.name))?;
                column.cells.push(cell);
            }
        }
    }

    Ok(SurveyTable::new(columns)?)
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Absent);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => raw_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => raw_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => number_or_absent(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => number_or_absent(col.as_primitive::<Float64Type>().value(row)),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(cell)
}

fn number_or_absent(v: f64) -> Cell {
    if !v.is_finite() {
        Cell::Absent
    } else {
        Cell::Number(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sentinels_become_absent() {
        for s in MISSING_SENTINELS {
            assert_eq!(raw_cell(s), Cell::Absent, "{s}");
        }
        assert_eq!(raw_cell(""), Cell::Absent);
        assert_eq!(raw_cell(" agree "), Cell::Text("agree".to_string()));
        assert_eq!(raw_cell("89 or older"), Cell::Text("89 or older".to_string()));
    }

    #[test]
    fn test_decode_windows_1252() {
        assert_eq!(decode_windows_1252(b"can\x92t").unwrap(), "can\u{2019}t");
        assert_eq!(decode_windows_1252(b"caf\xe9").unwrap(), "caf\u{e9}");
        assert_eq!(decode_windows_1252(b"\x80 5").unwrap(), "\u{20ac} 5");
    }

    #[test]
    fn test_parse_csv_keeps_text_and_marks_missing() {
        let csv = b"id,sex,satjob\n1,male,very satisfied\n2,female,IAP\n3,,DK\n";
        let table = parse_csv(csv).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.column_names(), vec!["id", "sex", "satjob"]);
        let satjob = table.column("satjob").unwrap();
        assert_eq!(
            satjob.cells,
            vec![
                Cell::Text("very satisfied".to_string()),
                Cell::Absent,
                Cell::Absent
            ]
        );
        assert_eq!(table.column("sex").unwrap().cells[2], Cell::Absent);
    }

    #[test]
    fn test_parse_csv_rejects_ragged_rows() {
        let csv = b"id,sex\n1,male\n2\n";
        assert!(parse_csv(csv).is_err());
    }

    #[test]
    fn test_load_source_from_local_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"id,age\n1,89 or older\n2,34\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let table = load_source(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.column("age").unwrap().cells[0],
            Cell::Text("89 or older".to_string())
        );
    }

    #[test]
    fn test_load_source_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let err = load_source(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported source extension"));
    }

    #[test]
    fn test_source_extension_ignores_query() {
        assert_eq!(source_extension("https://host/data/gss.CSV?raw=1"), "csv");
        assert_eq!(source_extension("snapshot.parquet"), "parquet");
        assert_eq!(source_extension("noext"), "");
    }
}
