use super::Dataset;

/// Textual summary shown in the preview pane: shape, column names and the
/// first `rows` rows.
pub fn render_preview(ds: &Dataset, rows: usize) -> String {
    let (height, width) = ds.shape();
    let columns = ds
        .column_names()
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Data Shape: ({}, {})\n\nColumns: [{}]\n\nFirst {} rows:\n{}",
        height,
        width,
        columns,
        rows,
        ds.dataframe().head(Some(rows))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_preview_header() {
        let frame = df!(
            "city" => ["Oslo", "Rome", "Lima"],
            "temp" => [3.5, 17.0, 19.5],
        )
        .unwrap();
        let ds = Dataset::from_dataframe(frame);

        let text = render_preview(&ds, 2);

        assert!(text.starts_with("Data Shape: (3, 2)\n\nColumns: ['city', 'temp']\n\nFirst 2 rows:\n"));
        assert!(text.contains("Oslo"));
        assert!(text.contains("Rome"));
        assert!(!text.contains("Lima"));
    }
}
