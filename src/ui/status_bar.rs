use eframe::egui;

use crate::app::DataVisualizer;

pub fn render_status_bar(app: &DataVisualizer, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(app.state.ui.status.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if app.state.has_data() {
                    ui.label(format!(
                        "Rows: {} | Cols: {}",
                        app.state.row_count(),
                        app.state.column_count()
                    ));
                }
                if let Some(hosted) = app.state.host.current() {
                    ui.separator();
                    ui.label(hosted.chart().summary());
                }
            });
        });
    });
}
