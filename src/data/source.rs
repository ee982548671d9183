use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::data::INFER_SCHEMA_ROWS;

use super::{excel, sniff};

/// Errors that can occur while loading or reading a dataset
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    #[error("File is empty")]
    EmptyFile,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

/// Input formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-delimited text
    Csv,
    /// First sheet of an .xlsx / .xls workbook
    Excel,
    /// Array of records
    Json,
    /// Delimited text with a sniffed delimiter
    Text,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DataError::UnsupportedFormat("no file extension".to_string()))?;

        match extension.to_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xls" => Ok(FileFormat::Excel),
            "json" => Ok(FileFormat::Json),
            "txt" => Ok(FileFormat::Text),
            ext => Err(DataError::UnsupportedFormat(format!(".{}", ext))),
        }
    }
}

/// Dataset wraps the Polars DataFrame loaded from a single file.
///
/// It is created whole by [`Dataset::load`] and never mutated afterwards;
/// loading another file replaces it.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    file_path: Option<PathBuf>,
}

impl Dataset {
    /// Load data from a file, dispatching on its extension
    pub fn load(path: &Path) -> Result<Self, DataError> {
        profiling::scope!("Dataset::load");

        let format = FileFormat::from_path(path)?;
        let frame = match format {
            FileFormat::Csv => read_delimited(path, b',')?,
            FileFormat::Excel => excel::read_first_sheet(path)?,
            FileFormat::Json => read_json(path)?,
            FileFormat::Text => {
                let separator = sniff::sniff_file(path)?;
                tracing::debug!(separator = %(separator as char).escape_debug(), "sniffed delimiter");
                read_delimited(path, separator)?
            }
        };

        tracing::info!(
            path = %path.display(),
            ?format,
            rows = frame.height(),
            columns = frame.width(),
            "dataset loaded"
        );

        Ok(Self {
            frame,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Create a Dataset from an already-built DataFrame
    #[cfg(test)]
    pub fn from_dataframe(frame: DataFrame) -> Self {
        Self {
            frame,
            file_path: None,
        }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.frame
    }

    /// Column names in file order
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Get column values as a Series
    pub fn column_values(&self, name: &str) -> Result<Series, DataError> {
        self.frame
            .column(name)
            .map(|c| c.as_materialized_series().clone())
            .map_err(|_| DataError::ColumnNotFound(name.to_string()))
    }

    /// Integer and float columns count as numeric; booleans and text do not
    pub fn is_numeric(&self, name: &str) -> bool {
        self.frame
            .column(name)
            .map(|c| {
                let dtype = c.dtype();
                dtype.is_integer() || dtype.is_float()
            })
            .unwrap_or(false)
    }

    pub fn is_temporal(&self, name: &str) -> bool {
        self.frame
            .column(name)
            .map(|c| matches!(c.dtype(), DataType::Datetime(_, _) | DataType::Date))
            .unwrap_or(false)
    }

    /// Names of all numeric columns, in file order
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| self.is_numeric(name))
            .collect()
    }

    /// Get a column's numeric values as Vec<f64>
    /// Missing and non-numeric values become NaN
    /// Datetime/Date columns are converted to Unix timestamps (seconds since epoch)
    pub fn column_as_f64(&self, name: &str) -> Result<Vec<f64>, DataError> {
        let series = self.column_values(name)?;

        match series.dtype() {
            DataType::Datetime(unit, _) => {
                let per_second = match unit {
                    TimeUnit::Nanoseconds => 1_000_000_000.0,
                    TimeUnit::Microseconds => 1_000_000.0,
                    TimeUnit::Milliseconds => 1_000.0,
                };
                let raw = series.cast(&DataType::Int64)?;
                return Ok(raw
                    .i64()?
                    .into_iter()
                    .map(|opt| opt.map(|ts| ts as f64 / per_second).unwrap_or(f64::NAN))
                    .collect());
            }
            DataType::Date => {
                let raw = series.cast(&DataType::Int32)?;
                return Ok(raw
                    .i32()?
                    .into_iter()
                    .map(|opt| opt.map(|days| days as f64 * 86400.0).unwrap_or(f64::NAN))
                    .collect());
            }
            _ => {}
        }

        // Try to cast to f64, if that fails, extract as best we can
        match series.cast(&DataType::Float64) {
            Ok(s) => Ok(s
                .f64()?
                .into_iter()
                .map(|opt| opt.unwrap_or(f64::NAN))
                .collect()),
            Err(_) => {
                if let Ok(str_series) = series.str() {
                    Ok(str_series
                        .into_iter()
                        .map(|opt| opt.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN))
                        .collect())
                } else {
                    Ok(vec![f64::NAN; series.len()])
                }
            }
        }
    }

    /// Get a column's values in display form; missing cells are None
    pub fn column_labels(&self, name: &str) -> Result<Vec<Option<String>>, DataError> {
        let series = self.column_values(name)?;
        let as_text = series.cast(&DataType::String)?;
        Ok(as_text
            .str()?
            .into_iter()
            .map(|opt| opt.map(str::to_string))
            .collect())
    }
}

fn read_delimited(path: &Path, separator: u8) -> Result<DataFrame, DataError> {
    let frame = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(separator)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_try_parse_dates(true)
        .finish()?
        .collect()?;
    Ok(frame)
}

fn read_json(path: &Path) -> Result<DataFrame, DataError> {
    let file = std::fs::File::open(path)?;
    Ok(JsonReader::new(file).finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_loading() {
        let file = write_temp(".csv", "x,y,z\n1,2,3\n4,5,6\n7,8,9\n");

        let ds = Dataset::load(file.path()).unwrap();

        assert_eq!(ds.shape(), (3, 3));
        assert_eq!(ds.column_names(), vec!["x", "y", "z"]);
        assert_eq!(ds.column_as_f64("x").unwrap(), vec![1.0, 4.0, 7.0]);
        assert_eq!(ds.column_as_f64("y").unwrap(), vec![2.0, 5.0, 8.0]);
        assert_eq!(ds.file_path(), Some(file.path()));
    }

    #[test]
    fn test_uppercase_extension() {
        let file = write_temp(".CSV", "a,b\n1,2\n");
        let ds = Dataset::load(file.path()).unwrap();
        assert_eq!(ds.shape(), (1, 2));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".xyz", "a,b\n1,2\n");
        let err = Dataset::load(file.path()).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ref ext) if ext == ".xyz"));
    }

    #[test]
    fn test_missing_extension() {
        let file = write_temp("", "a,b\n1,2\n");
        let err = Dataset::load(file.path()).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_tab_separated_text() {
        let file = write_temp(".txt", "name\tscore\nann\t1.5\nbob\t2.5\n");

        let ds = Dataset::load(file.path()).unwrap();

        assert_eq!(ds.column_names(), vec!["name", "score"]);
        assert_eq!(ds.column_as_f64("score").unwrap(), vec![1.5, 2.5]);
        assert!(ds.is_numeric("score"));
        assert!(!ds.is_numeric("name"));
    }

    #[test]
    fn test_semicolon_separated_text() {
        let file = write_temp(".txt", "a;b;c\n1;2;3\n4;5;6\n");
        let ds = Dataset::load(file.path()).unwrap();
        assert_eq!(ds.shape(), (2, 3));
    }

    #[test]
    fn test_json_records() {
        let file = write_temp(
            ".json",
            r#"[{"city": "Oslo", "temp": 3.5}, {"city": "Rome", "temp": 17.0}]"#,
        );

        let ds = Dataset::load(file.path()).unwrap();

        assert_eq!(ds.height(), 2);
        assert!(ds.has_column("city"));
        assert_eq!(ds.column_as_f64("temp").unwrap(), vec![3.5, 17.0]);
        assert_eq!(
            ds.column_labels("city").unwrap(),
            vec![Some("Oslo".to_string()), Some("Rome".to_string())]
        );
    }

    #[test]
    fn test_excel_workbook() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/sales.xlsx");

        let ds = Dataset::load(&path).unwrap();

        assert_eq!(ds.shape(), (4, 4));
        assert_eq!(ds.column_names(), vec!["region", "units", "price", "date"]);
        assert_eq!(ds.numeric_column_names(), vec!["units", "price"]);
        assert_eq!(ds.column_as_f64("units").unwrap(), vec![12.0, 7.0, 3.0, 9.0]);
        assert_eq!(ds.column_labels("region").unwrap()[1].as_deref(), Some("South"));

        // 2024-01-01 onwards, one day apart
        assert!(ds.is_temporal("date"));
        let dates = ds.column_as_f64("date").unwrap();
        assert_eq!(dates[0], 1_704_067_200.0);
        assert_eq!(dates[3] - dates[0], 3.0 * 86_400.0);
    }

    #[test]
    fn test_datetime_parsing() {
        let file = write_temp(".csv", "date,value\n2024-01-01,10.5\n2024-01-02,15.3\n2024-01-03,12.8\n");

        let ds = Dataset::load(file.path()).unwrap();
        assert!(ds.is_temporal("date"), "Date column should be detected as temporal");
        assert!(!ds.is_numeric("date"));

        let timestamps = ds.column_as_f64("date").unwrap();
        assert_eq!(timestamps.len(), 3);
        let start_ts = 1704067200.0; // 2024-01-01 00:00:00 UTC
        let end_ts = 1704326400.0; // 2024-01-04 00:00:00 UTC
        for &ts in &timestamps {
            assert!(ts >= start_ts && ts <= end_ts, "Timestamp {} out of range", ts);
        }
    }

    #[test]
    fn test_missing_values() {
        let file = write_temp(".csv", "k,v\na,1\n,\nc,3\n");

        let ds = Dataset::load(file.path()).unwrap();

        let values = ds.column_as_f64("v").unwrap();
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
        assert_eq!(ds.column_labels("k").unwrap()[1], None);
    }

    #[test]
    fn test_numeric_column_names() {
        let file = write_temp(".csv", "label,a,flag,b\nx,1,true,2.5\ny,2,false,3.5\n");
        let ds = Dataset::load(file.path()).unwrap();
        assert_eq!(ds.numeric_column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_column() {
        let file = write_temp(".csv", "a\n1\n");
        let ds = Dataset::load(file.path()).unwrap();
        assert!(matches!(
            ds.column_as_f64("nope"),
            Err(DataError::ColumnNotFound(_))
        ));
    }
}
