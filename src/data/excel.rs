//! Spreadsheet loading through calamine
//!
//! The first worksheet is read; its first row supplies the column names.

use std::path::Path;

use calamine::{Data, DataType as _, Reader, open_workbook_auto};
use polars::prelude::*;

use super::DataError;

static EMPTY: Data = Data::Empty;

pub fn read_first_sheet(path: &Path) -> Result<DataFrame, DataError> {
    profiling::scope!("read_first_sheet");

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(DataError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let names: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell_text(cell) {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("Unnamed: {}", idx),
        })
        .collect();

    let mut cells: Vec<Vec<&Data>> = vec![Vec::with_capacity(range.height()); names.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).unwrap_or(&EMPTY));
        }
    }

    let columns = names
        .iter()
        .zip(&cells)
        .map(|(name, values)| Column::from(build_series(name, values)))
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Type a column from its cells: all numbers -> Float64, all booleans ->
/// Boolean, all dates -> Datetime(ms), otherwise String. Empty cells are
/// null and do not vote.
pub fn build_series(name: &str, cells: &[&Data]) -> Series {
    let filled = || cells.iter().filter(|c| !matches!(c, Data::Empty));

    if filled().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i as f64),
                Data::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), values);
    }

    if filled().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), values);
    }

    if filled().all(|c| is_date(c)) {
        let millis: Int64Chunked = cells
            .iter()
            .map(|c| {
                c.as_datetime()
                    .filter(|_| is_date(c))
                    .map(|dt| dt.and_utc().timestamp_millis())
            })
            .collect();
        return millis
            .with_name(name.into())
            .into_datetime(TimeUnit::Milliseconds, None)
            .into_series();
    }

    let values: Vec<Option<String>> = cells.iter().map(|c| cell_text(c)).collect();
    Series::new(name.into(), values)
}

/// Date and time cells; durations stay text
fn is_date(cell: &Data) -> bool {
    match cell {
        Data::DateTime(dt) => dt.is_datetime(),
        Data::DateTimeIso(_) => true,
        _ => false,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => Some(
            cell.as_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
        other => Some(other.to_string()),
    }
}
