//! Per-chart-type options sub-form

use egui::{Response, Ui};

use crate::state::ChartType;

/// Editor for the options carried by the selected chart type
pub struct ChartOptions<'a> {
    chart_type: &'a mut ChartType,
}

impl<'a> ChartOptions<'a> {
    pub fn new(chart_type: &'a mut ChartType) -> Self {
        Self { chart_type }
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        ui.vertical(|ui| match self.chart_type {
            ChartType::Histogram { bins } => {
                ui.horizontal(|ui| {
                    ui.label("Number of bins:");
                    ui.add(egui::TextEdit::singleline(bins).desired_width(60.0));
                });
            }
            ChartType::Heatmap { show_correlation } => {
                ui.checkbox(show_correlation, "Show correlation");
            }
            _ => {
                ui.weak("No additional options");
            }
        })
        .response
    }
}
