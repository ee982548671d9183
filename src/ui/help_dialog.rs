use crate::app::DataVisualizer;

pub fn render_help_dialog(app: &mut DataVisualizer, ctx: &eframe::egui::Context) {
    if app.state.ui.show_help {
        eframe::egui::Window::new("⌨ Keyboard Shortcuts")
            .anchor(eframe::egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Keyboard");
                ui.label("F11 - Toggle fullscreen");
                ui.label("ESC - Exit fullscreen");
                ui.label("F1 - Toggle help");

                ui.separator();
                ui.heading("Chart Navigation");
                ui.label("Scroll - Scroll the chart vertically");
                ui.label("Shift + Scroll - Scroll the chart horizontally");
                ui.label("Zoom In, then drag - Zoom to the selected area");
                ui.label("Pan, then drag - Move the view");
                ui.label("Double-click - Reset view");

                ui.separator();
                ui.heading("Files");
                ui.label("Drop a CSV, Excel, JSON or text file onto the window to load it");

                ui.separator();
                if ui.button("Close").clicked() {
                    app.state.ui.show_help = false;
                }
            });
    }
}
