use eframe::egui::{self, RichText};

use crate::app::DataVisualizer;
use crate::constants::layout::PREVIEW_HEIGHT;

/// Render the monospace data preview with its copy button
pub fn render_preview_pane(app: &mut DataVisualizer, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.heading("Data Preview");
        let has_preview = !app.state.ui.preview.is_empty();
        if ui
            .add_enabled(has_preview, egui::Button::new("📋 Copy"))
            .on_hover_text("Copy the preview to the clipboard")
            .clicked()
        {
            app.run_action("copy", DataVisualizer::copy_preview);
        }
    });

    egui::ScrollArea::both()
        .id_salt("preview_scroll")
        .max_height(PREVIEW_HEIGHT)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            if app.state.ui.preview.is_empty() {
                ui.weak("Load a CSV, Excel, JSON or text file, or drop one onto the window");
            } else {
                ui.add(egui::Label::new(RichText::new(&app.state.ui.preview).monospace()).extend());
            }
        });
}
