use eframe::egui::{self, ComboBox};

use crate::app::DataVisualizer;
use crate::state::ChartKind;
use crate::widgets::{ChartOptions, ColumnPicker};

use super::render_preview_pane;

/// Render the left column: file loading, chart configuration and preview
pub fn render_controls(app: &mut DataVisualizer, ui: &mut egui::Ui) {
    ui.heading("Data");
    if ui.button("📂 Load Data File").clicked() {
        app.open_file_dialog();
    }

    // Display current file
    if let Some(path) = app.state.dataset.as_ref().and_then(|ds| ds.file_path()) {
        ui.label(format!(
            "📄 {}",
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("Unknown")
        ))
        .on_hover_text(path.display().to_string());
    }

    ui.separator();
    ui.heading("Chart Configuration");

    let current = app.state.chart_config.kind();
    ComboBox::from_label("Chart Type")
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for kind in ChartKind::ALL {
                // Picking the current kind again still resets its options
                if ui.selectable_label(kind == current, kind.label()).clicked() {
                    app.state.chart_config.set_chart_type(kind);
                }
            }
        });

    let columns = app.state.column_names();
    ColumnPicker::new("X-axis / Category:", &mut app.state.chart_config.primary, &columns).show(ui);
    ColumnPicker::new("Y-axis / Value:", &mut app.state.chart_config.secondary, &columns)
        .optional(true)
        .show(ui);

    egui::CollapsingHeader::new("⚙ Options")
        .id_salt("chart_options")
        .default_open(true)
        .show(ui, |ui| {
            ChartOptions::new(&mut app.state.chart_config.chart_type).show(ui);
        });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui.button("📊 Generate Chart").clicked() {
            app.run_action("generate", |app| app.generate_chart());
        }
        if ui.button("💾 Save Chart").clicked() {
            app.run_action("save", |app| app.save_chart_dialog());
        }
        if ui.button("🗑 Clear Chart").clicked() {
            app.clear_chart();
        }
    });

    ui.separator();
    render_preview_pane(app, ui);
}
