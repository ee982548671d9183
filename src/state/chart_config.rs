//! Chart configuration: the selected chart type with its options, plus the
//! primary and secondary columns

use std::fmt;

use crate::constants::chart::{DEFAULT_BINS, DEFAULT_SHOW_CORRELATION};

/// Chart kinds offered by the type picker, without their options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
    Histogram,
    Boxplot,
    Heatmap,
}

impl ChartKind {
    /// Picker order
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Boxplot,
        ChartKind::Heatmap,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
            ChartKind::Scatter => "Scatter",
            ChartKind::Histogram => "Histogram",
            ChartKind::Boxplot => "Boxplot",
            ChartKind::Heatmap => "Heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chart type together with the options only that type has
#[derive(Debug, Clone, PartialEq)]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
    /// Bin count as typed; parsed when the chart is built
    Histogram { bins: String },
    Boxplot,
    Heatmap { show_correlation: bool },
}

impl ChartType {
    /// The type for `kind` with its default options
    pub fn with_defaults(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Bar => ChartType::Bar,
            ChartKind::Line => ChartType::Line,
            ChartKind::Pie => ChartType::Pie,
            ChartKind::Scatter => ChartType::Scatter,
            ChartKind::Histogram => ChartType::Histogram {
                bins: DEFAULT_BINS.to_string(),
            },
            ChartKind::Boxplot => ChartType::Boxplot,
            ChartKind::Heatmap => ChartType::Heatmap {
                show_correlation: DEFAULT_SHOW_CORRELATION,
            },
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartType::Bar => ChartKind::Bar,
            ChartType::Line => ChartKind::Line,
            ChartType::Pie => ChartKind::Pie,
            ChartType::Scatter => ChartKind::Scatter,
            ChartType::Histogram { .. } => ChartKind::Histogram,
            ChartType::Boxplot => ChartKind::Boxplot,
            ChartType::Heatmap { .. } => ChartKind::Heatmap,
        }
    }
}

impl Default for ChartType {
    fn default() -> Self {
        ChartType::with_defaults(ChartKind::default())
    }
}

/// What the next "Generate Chart" will draw
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartConfig {
    pub chart_type: ChartType,

    /// X column; every chart needs one
    pub primary: Option<String>,

    /// Y column; optional except for scatter plots
    pub secondary: Option<String>,
}

impl ChartConfig {
    pub fn kind(&self) -> ChartKind {
        self.chart_type.kind()
    }

    /// Switch chart type. The options always start over from the defaults,
    /// also when `kind` is already selected.
    pub fn set_chart_type(&mut self, kind: ChartKind) {
        tracing::debug!(%kind, "chart type selected");
        self.chart_type = ChartType::with_defaults(kind);
    }

    /// Suggest columns after a load: the first column as primary and the
    /// second, when there is one, as secondary
    pub fn set_columns(&mut self, names: &[String]) {
        self.primary = names.first().cloned();
        self.secondary = names.get(1).cloned();
    }
}
