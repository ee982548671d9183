//! Dataset + configuration -> chart
//!
//! All validation happens here, before anything is drawn. Selection
//! problems come back as warnings, anything that goes wrong while computing
//! the chart as a plot error.

use polars::prelude::PolarsError;

use crate::constants::chart::MAX_BINS;
use crate::data::{DataError, Dataset};
use crate::data::stats;
use crate::error::{Result, VizError};
use crate::state::{ChartConfig, ChartType};

use super::{Chart, ChartData, Slice, aggregate};

pub fn build(dataset: Option<&Dataset>, config: &ChartConfig) -> Result<Chart> {
    profiling::scope!("chart::build");

    let ds = dataset.ok_or(VizError::NoData)?;
    let primary = config
        .primary
        .as_deref()
        .ok_or_else(|| VizError::Selection("Please select at least one column.".to_string()))?;
    require_column(ds, primary)?;
    let secondary = config.secondary.as_deref();

    let kind = config.kind();
    let mut x_label = Some(primary.to_string());
    let mut y_label = secondary.map(str::to_string);

    let data = match &config.chart_type {
        ChartType::Bar => match secondary {
            Some(value_column) => bar_means(ds, primary, value_column)?,
            None => {
                y_label = Some("count".to_string());
                bar_counts(ds, primary)?
            }
        },
        ChartType::Line => line(ds, primary, secondary)?,
        ChartType::Pie => {
            x_label = None;
            y_label = None;
            pie(ds, primary)?
        }
        ChartType::Scatter => {
            let y_column = secondary
                .ok_or_else(|| VizError::Selection("Scatter plot requires two columns.".to_string()))?;
            scatter(ds, primary, y_column)?
        }
        ChartType::Histogram { bins } => {
            let bins = parse_bins(bins)?;
            y_label = Some("Frequency".to_string());
            let values = numeric_values(ds, primary)?;
            let hist = stats::histogram(&values, bins)
                .ok_or_else(|| VizError::plot(format!("Column '{}' has no numeric values", primary)))?;
            ChartData::Histogram(hist)
        }
        ChartType::Boxplot => {
            x_label = None;
            y_label = Some(primary.to_string());
            let values = numeric_values(ds, primary)?;
            let summary = stats::box_summary(&values)
                .ok_or_else(|| VizError::plot(format!("Column '{}' has no numeric values", primary)))?;
            ChartData::Boxplot(summary)
        }
        ChartType::Heatmap { show_correlation } => {
            if !show_correlation {
                return Err(VizError::Unsupported(
                    "General heatmap not yet implemented.".to_string(),
                ));
            }
            x_label = None;
            y_label = None;
            correlation_heatmap(ds)?
        }
    };

    let chart = Chart {
        kind,
        title: format!("{} Chart of {}", kind, primary),
        x_label,
        y_label,
        data,
    };
    tracing::info!(title = %chart.title, summary = %chart.summary(), "chart built");
    Ok(chart)
}

fn require_column(ds: &Dataset, name: &str) -> Result<()> {
    if ds.has_column(name) {
        Ok(())
    } else {
        Err(VizError::plot(format!("Column '{}' not found", name)))
    }
}

/// Column access failures while building are chart failures, not load failures
fn column_error(e: DataError) -> VizError {
    VizError::plot(e.to_string())
}

fn polars_error(e: PolarsError) -> VizError {
    VizError::plot(e.to_string())
}

fn parse_bins(text: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(bins) if (1..=MAX_BINS).contains(&bins) => Ok(bins),
        Ok(bins) if bins > MAX_BINS => Err(VizError::plot(format!(
            "Number of bins must be at most {}, got {}",
            MAX_BINS, bins
        ))),
        _ => Err(VizError::plot(format!(
            "Number of bins must be a positive integer, got '{}'",
            text
        ))),
    }
}

/// Numeric view of a column that must hold numbers or dates
fn numeric_values(ds: &Dataset, name: &str) -> Result<Vec<f64>> {
    require_column(ds, name)?;
    if !(ds.is_numeric(name) || ds.is_temporal(name)) {
        return Err(VizError::plot(format!("Column '{}' has no numeric data to plot", name)));
    }
    ds.column_as_f64(name).map_err(column_error)
}

fn bar_counts(ds: &Dataset, column: &str) -> Result<ChartData> {
    let counts = aggregate::value_counts(ds.dataframe(), column).map_err(polars_error)?;
    if counts.is_empty() {
        return Err(VizError::plot(format!("Column '{}' has no values", column)));
    }
    let (categories, values) = counts.into_iter().map(|(label, n)| (label, n as f64)).unzip();
    Ok(ChartData::Bars { categories, values })
}

fn bar_means(ds: &Dataset, key_column: &str, value_column: &str) -> Result<ChartData> {
    require_column(ds, value_column)?;
    if !ds.is_numeric(value_column) {
        return Err(VizError::plot(format!(
            "Column '{}' has no numeric data to average",
            value_column
        )));
    }

    let means =
        aggregate::group_means(ds.dataframe(), key_column, value_column).map_err(polars_error)?;
    if means.is_empty() {
        return Err(VizError::plot(format!("Column '{}' has no values", key_column)));
    }
    let (categories, values) = means.into_iter().unzip();
    Ok(ChartData::Bars { categories, values })
}

fn line(ds: &Dataset, x_column: &str, y_column: Option<&str>) -> Result<ChartData> {
    let Some(y_column) = y_column else {
        // Series against its row position
        let values = numeric_values(ds, x_column)?;
        let points = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| [i as f64, v])
            .collect();
        return Ok(ChartData::Line {
            points,
            tick_labels: None,
            x_temporal: false,
        });
    };

    let ys = numeric_values(ds, y_column)?;
    let x_temporal = ds.is_temporal(x_column);

    if ds.is_numeric(x_column) || x_temporal {
        let xs = ds.column_as_f64(x_column).map_err(column_error)?;
        let points = xs
            .iter()
            .zip(&ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| [x, y])
            .collect();
        return Ok(ChartData::Line {
            points,
            tick_labels: None,
            x_temporal,
        });
    }

    // Text x column: plot against row position, label the ticks
    let labels: Vec<String> = ds
        .column_labels(x_column)
        .map_err(column_error)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();
    let points = ys
        .iter()
        .enumerate()
        .filter(|(_, y)| y.is_finite())
        .map(|(i, &y)| [i as f64, y])
        .collect();
    Ok(ChartData::Line {
        points,
        tick_labels: Some(labels),
        x_temporal: false,
    })
}

fn pie(ds: &Dataset, column: &str) -> Result<ChartData> {
    let counts = aggregate::value_counts(ds.dataframe(), column).map_err(polars_error)?;
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Err(VizError::plot(format!("Column '{}' has no values", column)));
    }

    let slices = counts
        .into_iter()
        .map(|(label, count)| Slice {
            label,
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();
    Ok(ChartData::Pie(slices))
}

fn scatter(ds: &Dataset, x_column: &str, y_column: &str) -> Result<ChartData> {
    let xs = numeric_values(ds, x_column)?;
    let ys = numeric_values(ds, y_column)?;
    let points = xs
        .iter()
        .zip(&ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| [x, y])
        .collect();
    Ok(ChartData::Scatter(points))
}

fn correlation_heatmap(ds: &Dataset) -> Result<ChartData> {
    let columns = ds.numeric_column_names();
    if columns.is_empty() {
        return Err(VizError::Data(
            "No numeric columns for correlation heatmap.".to_string(),
        ));
    }

    let values = stats::correlation_matrix(ds.dataframe(), &columns).map_err(polars_error)?;
    Ok(ChartData::Heatmap { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChartKind;
    use polars::prelude::*;
    use std::collections::HashMap;

    fn sales() -> Dataset {
        Dataset::from_dataframe(
            df!(
                "category" => ["A", "A", "B", "C", "C", "C"],
                "amount" => [1.0, 3.0, 5.0, 2.0, 4.0, 6.0],
                "units" => [1i64, 2, 3, 4, 5, 6],
            )
            .unwrap(),
        )
    }

    fn config(kind: ChartKind, primary: &str, secondary: Option<&str>) -> ChartConfig {
        let mut config = ChartConfig::default();
        config.set_chart_type(kind);
        config.primary = Some(primary.to_string());
        config.secondary = secondary.map(str::to_string);
        config
    }

    #[test]
    fn test_no_dataset() {
        let err = build(None, &config(ChartKind::Bar, "category", None)).unwrap_err();
        assert!(matches!(err, VizError::NoData));
    }

    #[test]
    fn test_no_primary_column() {
        let ds = sales();
        let err = build(Some(&ds), &ChartConfig::default()).unwrap_err();
        assert!(matches!(err, VizError::Selection(ref m) if m == "Please select at least one column."));
    }

    #[test]
    fn test_unknown_column() {
        let ds = sales();
        let err = build(Some(&ds), &config(ChartKind::Bar, "nope", None)).unwrap_err();
        assert!(matches!(err, VizError::Plot(_)));
    }

    #[test]
    fn test_bar_counts() {
        let ds = sales();
        let chart = build(Some(&ds), &config(ChartKind::Bar, "category", None)).unwrap();

        assert_eq!(chart.title, "Bar Chart of category");
        assert_eq!(chart.y_label.as_deref(), Some("count"));
        let ChartData::Bars { categories, values } = chart.data else {
            panic!("expected bars");
        };
        let counts: HashMap<String, f64> = categories.into_iter().zip(values).collect();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts["A"], 2.0);
        assert_eq!(counts["B"], 1.0);
        assert_eq!(counts["C"], 3.0);
    }

    #[test]
    fn test_bar_group_means() {
        let ds = sales();
        let chart = build(Some(&ds), &config(ChartKind::Bar, "category", Some("amount"))).unwrap();

        assert_eq!(chart.x_label.as_deref(), Some("category"));
        assert_eq!(chart.y_label.as_deref(), Some("amount"));
        assert_eq!(
            chart.data,
            ChartData::Bars {
                categories: vec!["A".into(), "B".into(), "C".into()],
                values: vec![2.0, 5.0, 4.0],
            }
        );
    }

    #[test]
    fn test_bar_means_need_numeric_values() {
        let ds = sales();
        let err = build(Some(&ds), &config(ChartKind::Bar, "amount", Some("category"))).unwrap_err();
        assert!(matches!(err, VizError::Plot(_)));
    }

    #[test]
    fn test_scatter_requires_two_columns() {
        let ds = sales();
        let err = build(Some(&ds), &config(ChartKind::Scatter, "amount", None)).unwrap_err();
        assert!(matches!(err, VizError::Selection(ref m) if m == "Scatter plot requires two columns."));

        let chart = build(Some(&ds), &config(ChartKind::Scatter, "amount", Some("units"))).unwrap();
        let ChartData::Scatter(points) = chart.data else {
            panic!("expected scatter");
        };
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], [1.0, 1.0]);
    }

    #[test]
    fn test_line_with_text_x() {
        let ds = sales();
        let chart = build(Some(&ds), &config(ChartKind::Line, "category", Some("amount"))).unwrap();

        let ChartData::Line {
            points,
            tick_labels,
            x_temporal,
        } = chart.data
        else {
            panic!("expected line");
        };
        assert_eq!(points[2], [2.0, 5.0]);
        assert_eq!(tick_labels.unwrap()[2], "B");
        assert!(!x_temporal);
    }

    #[test]
    fn test_line_single_column_needs_numbers() {
        let ds = sales();
        let chart = build(Some(&ds), &config(ChartKind::Line, "amount", None)).unwrap();
        let ChartData::Line { points, .. } = chart.data else {
            panic!("expected line");
        };
        assert_eq!(points.len(), 6);
        assert_eq!(points[5], [5.0, 6.0]);

        let err = build(Some(&ds), &config(ChartKind::Line, "category", None)).unwrap_err();
        assert!(matches!(err, VizError::Plot(_)));
    }

    #[test]
    fn test_pie_fractions() {
        let ds = sales();
        let chart = build(Some(&ds), &config(ChartKind::Pie, "category", None)).unwrap();

        let ChartData::Pie(slices) = chart.data else {
            panic!("expected pie");
        };
        assert_eq!(slices[0].label, "C");
        assert_eq!(slices[0].percent_label(), "50.0%");
        let total: f64 = slices.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_bins() {
        let ds = sales();
        let mut cfg = config(ChartKind::Histogram, "amount", None);
        let chart = build(Some(&ds), &cfg).unwrap();
        let ChartData::Histogram(hist) = chart.data else {
            panic!("expected histogram");
        };
        assert_eq!(hist.counts.len(), 10);
        assert_eq!(hist.counts.iter().sum::<usize>(), 6);

        for bad in ["abc", "0", "-3", "", "10001", "18446744073709551615"] {
            cfg.chart_type = ChartType::Histogram {
                bins: bad.to_string(),
            };
            let err = build(Some(&ds), &cfg).unwrap_err();
            assert!(matches!(err, VizError::Plot(_)), "bins {:?}", bad);
        }
    }

    #[test]
    fn test_histogram_bins_upper_bound() {
        let ds = sales();
        let mut cfg = config(ChartKind::Histogram, "amount", None);

        cfg.chart_type = ChartType::Histogram {
            bins: MAX_BINS.to_string(),
        };
        let chart = build(Some(&ds), &cfg).unwrap();
        let ChartData::Histogram(hist) = chart.data else {
            panic!("expected histogram");
        };
        assert_eq!(hist.counts.len(), MAX_BINS);

        cfg.chart_type = ChartType::Histogram {
            bins: usize::MAX.to_string(),
        };
        let err = build(Some(&ds), &cfg).unwrap_err();
        assert!(matches!(err, VizError::Plot(ref m) if m.contains("at most")));
    }

    #[test]
    fn test_histogram_of_text_column_fails() {
        let ds = sales();
        let err = build(Some(&ds), &config(ChartKind::Histogram, "category", None)).unwrap_err();
        assert!(matches!(err, VizError::Plot(_)));
    }

    #[test]
    fn test_boxplot() {
        let ds = sales();
        let chart = build(Some(&ds), &config(ChartKind::Boxplot, "units", None)).unwrap();
        assert_eq!(chart.y_label.as_deref(), Some("units"));
        let ChartData::Boxplot(summary) = chart.data else {
            panic!("expected boxplot");
        };
        assert_eq!(summary.count, 6);
        assert_eq!(summary.median, 3.5);
    }

    #[test]
    fn test_heatmap_correlation() {
        let ds = sales();
        let chart = build(Some(&ds), &config(ChartKind::Heatmap, "category", None)).unwrap();
        let ChartData::Heatmap { columns, values } = chart.data else {
            panic!("expected heatmap");
        };
        assert_eq!(columns, vec!["amount", "units"]);
        assert_eq!(values.len(), 2);
        assert!((values[0][0] - 1.0).abs() < 1e-12);
        assert_eq!(values[0][1], values[1][0]);
    }

    #[test]
    fn test_heatmap_without_numeric_columns() {
        let ds = Dataset::from_dataframe(df!("name" => ["a", "b"]).unwrap());
        let err = build(Some(&ds), &config(ChartKind::Heatmap, "name", None)).unwrap_err();
        assert!(matches!(err, VizError::Data(ref m) if m == "No numeric columns for correlation heatmap."));
    }

    #[test]
    fn test_general_heatmap_is_unsupported() {
        let ds = sales();
        let mut cfg = config(ChartKind::Heatmap, "amount", None);
        cfg.chart_type = ChartType::Heatmap {
            show_correlation: false,
        };
        let err = build(Some(&ds), &cfg).unwrap_err();
        assert!(matches!(err, VizError::Unsupported(ref m) if m == "General heatmap not yet implemented."));
    }
}
