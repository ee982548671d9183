use eframe::egui::{self, Color32, RichText};

use crate::app::DataVisualizer;
use crate::error::Severity;

/// Modal window for the pending notification, if any
pub fn render_notification(app: &mut DataVisualizer, ctx: &egui::Context) {
    let Some(notification) = &app.state.ui.notification else {
        return;
    };

    let (icon, color) = match notification.severity {
        Severity::Info => ("ℹ", Color32::from_rgb(0x34, 0x98, 0xdb)),
        Severity::Warning => ("⚠", Color32::from_rgb(0xf3, 0x9c, 0x12)),
        Severity::Error => ("❌", Color32::from_rgb(0xe7, 0x4c, 0x3c)),
    };

    let mut dismissed = false;
    egui::Window::new(format!("{} {}", icon, notification.title))
        .id(egui::Id::new("notification"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(RichText::new(&notification.message).color(color));
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
        app.state.ui.dismiss_notification();
    }
}
