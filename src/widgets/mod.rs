//! Reusable UI widgets for the data visualizer

mod chart_options;
mod column_picker;

pub use chart_options::ChartOptions;
pub use column_picker::ColumnPicker;
