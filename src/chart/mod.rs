//! Chart values and the code that builds, hosts and exports them
//!
//! A [`Chart`] is plain data: everything needed to draw it on screen with
//! egui_plot or to a file with plotters. Building it is the only step that
//! looks at the dataset.

pub mod aggregate;
pub mod builder;
pub mod export;
pub mod host;

pub use builder::build;
pub use export::{SaveError, export};
pub use host::{ChartHost, HostedChart};

use chrono::{DateTime, Utc};

use crate::constants::chart::{MISSING_COLOR, PALETTE};
use crate::data::stats::{BoxSummary, Histogram};
use crate::state::ChartKind;

/// One pie wedge
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    /// Share of the total, in [0, 1]
    pub fraction: f64,
}

impl Slice {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

/// Computed geometry of a chart, one variant per chart kind
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// One bar per category, in display order
    Bars {
        categories: Vec<String>,
        values: Vec<f64>,
    },
    Line {
        points: Vec<[f64; 2]>,
        /// Category names for x = 0, 1, 2 ... when the x column is text
        tick_labels: Option<Vec<String>>,
        /// x holds Unix seconds
        x_temporal: bool,
    },
    Pie(Vec<Slice>),
    Scatter(Vec<[f64; 2]>),
    Histogram(Histogram),
    Boxplot(BoxSummary),
    /// Square correlation matrix; `values[row][col]`, NaN where undefined
    Heatmap {
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
    },
}

/// A built chart, ready to display or export
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub data: ChartData,
}

impl Chart {
    /// Short description for logs and the chart pane
    pub fn summary(&self) -> String {
        match &self.data {
            ChartData::Bars { categories, .. } => format!("{} bars", categories.len()),
            ChartData::Line { points, .. } => format!("{} points", points.len()),
            ChartData::Pie(slices) => format!("{} slices", slices.len()),
            ChartData::Scatter(points) => format!("{} points", points.len()),
            ChartData::Histogram(hist) => format!(
                "{} bins, {} values",
                hist.counts.len(),
                hist.counts.iter().sum::<usize>()
            ),
            ChartData::Boxplot(summary) => format!(
                "{} values, {} outliers",
                summary.count,
                summary.outliers.len()
            ),
            ChartData::Heatmap { columns, .. } => {
                format!("{} x {} correlation matrix", columns.len(), columns.len())
            }
        }
    }
}

/// Series colour `index`, cycling through the palette
pub fn palette(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Blue-white-red colour for a correlation coefficient in [-1, 1]
pub fn diverging_color(value: f64) -> (u8, u8, u8) {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    if !value.is_finite() {
        return MISSING_COLOR;
    }

    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COLD, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, WARM, v)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    (lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Heatmap cell text
pub fn annotation(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        String::new()
    }
}

/// Axis text for an x value holding Unix seconds
pub fn format_timestamp(seconds: f64) -> String {
    let secs = seconds.floor() as i64;
    let nanos = ((seconds.fract() * 1_000_000_000.0) as u32).min(999_999_999);
    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => format!("{:.0}", seconds),
    }
}

/// Axis text for a plain number
pub fn format_axis_value(value: f64) -> String {
    if value.abs() < 0.01 && value != 0.0 {
        format!("{:.2e}", value)
    } else if value.abs() >= 1000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Start and end angle of each pie wedge, in radians counter-clockwise from
/// the positive x axis, beginning at 0
pub fn wedge_angles(slices: &[Slice]) -> Vec<(f64, f64)> {
    let mut start = 0.0;
    slices
        .iter()
        .map(|slice| {
            let end = start + slice.fraction * std::f64::consts::TAU;
            let span = (start, end);
            start = end;
            span
        })
        .collect()
}

/// Outline of a wedge of the unit circle: the centre followed by points
/// along the arc from `start` to `end`
pub fn wedge_outline(start: f64, end: f64) -> Vec<(f64, f64)> {
    let steps = (((end - start).to_degrees() / 2.0).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push((0.0, 0.0));
    for i in 0..=steps {
        let angle = start + (end - start) * i as f64 / steps as f64;
        points.push((angle.cos(), angle.sin()));
    }
    points
}

/// Category name for tick `value`, if it sits on a category position
pub fn category_tick(labels: &[String], value: f64) -> Option<&str> {
    if value < 0.0 || (value - value.round()).abs() > 1e-6 {
        return None;
    }
    labels.get(value.round() as usize).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverging_color_endpoints() {
        assert_eq!(diverging_color(-1.0), (59, 76, 192));
        assert_eq!(diverging_color(0.0), (221, 221, 221));
        assert_eq!(diverging_color(1.0), (180, 4, 38));
        assert_eq!(diverging_color(5.0), (180, 4, 38));
        assert_eq!(diverging_color(f64::NAN), MISSING_COLOR);
    }

    #[test]
    fn test_annotation() {
        assert_eq!(annotation(0.12345), "0.12");
        assert_eq!(annotation(-1.0), "-1.00");
        assert_eq!(annotation(f64::NAN), "");
    }

    #[test]
    fn test_percent_label() {
        let slice = Slice {
            label: "A".to_string(),
            count: 1,
            fraction: 1.0 / 3.0,
        };
        assert_eq!(slice.percent_label(), "33.3%");
    }

    #[test]
    fn test_category_tick() {
        let labels = vec!["mon".to_string(), "tue".to_string()];
        assert_eq!(category_tick(&labels, 1.0), Some("tue"));
        assert_eq!(category_tick(&labels, 0.5), None);
        assert_eq!(category_tick(&labels, 2.0), None);
        assert_eq!(category_tick(&labels, -1.0), None);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1704067200.0), "2024-01-01");
    }

    #[test]
    fn test_wedges_cover_the_circle() {
        let slices: Vec<Slice> = [0.5, 0.25, 0.25]
            .iter()
            .map(|&fraction| Slice {
                label: String::new(),
                count: 1,
                fraction,
            })
            .collect();

        let angles = wedge_angles(&slices);

        assert_eq!(angles[0].0, 0.0);
        assert!((angles[0].1 - std::f64::consts::PI).abs() < 1e-12);
        assert!((angles[2].1 - std::f64::consts::TAU).abs() < 1e-12);

        let outline = wedge_outline(angles[1].0, angles[1].1);
        assert_eq!(outline[0], (0.0, 0.0));
        assert!((outline[1].0 + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(0.0), "0.00");
        assert_eq!(format_axis_value(2.5), "2.50");
        assert_eq!(format_axis_value(12345.6), "12346");
        assert_eq!(format_axis_value(0.001), "1.00e-3");
    }
}
