use std::error::Error as _;
use std::path::{Path, PathBuf};

use eframe::egui::{self, CentralPanel, ViewportCommand};
use egui_extras::{Size, StripBuilder};

use crate::chart;
use crate::config::AppConfig;
use crate::constants::data::OPEN_EXTENSIONS;
use crate::constants::{export, layout, status};
use crate::data::{Dataset, render_preview};
use crate::error::{Result, Severity, VizError};
use crate::state::{AppState, FullscreenChange, Notification, WindowGeometry};
use crate::ui;

pub struct DataVisualizer {
    pub state: AppState,
}

impl Default for DataVisualizer {
    fn default() -> Self {
        Self::with_config(AppConfig::default())
    }
}

impl DataVisualizer {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        if config.dark_mode {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    /// Run a user action. Failures are logged, shown in the status line and
    /// raised as a notification; they never propagate further.
    pub fn run_action(&mut self, action: &str, f: impl FnOnce(&mut Self) -> Result<()>) {
        if let Err(err) = f(self) {
            self.report(action, &err);
        }
    }

    fn report(&mut self, action: &str, err: &VizError) {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        match err.severity() {
            Severity::Error => {
                tracing::error!(action, error = %err, causes = ?causes, "action failed")
            }
            _ => tracing::warn!(action, error = %err, "action rejected"),
        }

        self.state.ui.set_status(err.status_line());
        self.state.ui.notify(Notification::from_error(err));
    }

    /// Ask for a data file and load it; cancelling does nothing
    pub fn open_file_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("All Data Files", &OPEN_EXTENSIONS)
            .add_filter("CSV Files", &["csv"])
            .add_filter("Excel Files", &["xlsx", "xls"])
            .add_filter("JSON Files", &["json"])
            .add_filter("Text Files", &["txt"])
            .pick_file();

        if let Some(path) = picked {
            self.run_action("load", |app| app.load_file(&path));
        }
    }

    /// Load `path` as the new dataset. On failure the previous dataset,
    /// column selection and chart stay as they were.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        profiling::scope!("load_file");

        let dataset = Dataset::load(path)?;
        let columns = dataset.column_names();
        let (rows, cols) = dataset.shape();
        if dataset.is_empty() {
            tracing::warn!(path = %path.display(), "file contains no data");
        }

        self.state.chart_config.set_columns(&columns);
        tracing::debug!(?columns, "column pickers updated");
        self.state.ui.preview = render_preview(&dataset, self.state.config.preview_rows);
        self.state.dataset = Some(dataset);
        self.state.ui.set_status(format!(
            "Loaded {} - {} rows, {} columns",
            path.display(),
            rows,
            cols
        ));
        Ok(())
    }

    /// Build a chart from the current selection and host it. The old chart is
    /// dropped before building, so a failed build leaves the viewport empty.
    pub fn generate_chart(&mut self) -> Result<()> {
        profiling::scope!("generate_chart");

        if !self.state.has_data() {
            return Err(VizError::NoData);
        }
        if self.state.chart_config.primary.is_none() {
            return Err(VizError::Selection(
                "Please select at least one column.".to_string(),
            ));
        }

        self.drop_chart();
        let chart = chart::build(self.state.dataset.as_ref(), &self.state.chart_config)?;
        let kind = chart.kind;
        self.state.host.install(chart);
        self.state.ui.set_status(format!(
            "Generated {} chart - Use scrollbars to navigate",
            kind
        ));
        Ok(())
    }

    /// Ask for a destination and export the current chart there
    pub fn save_chart_dialog(&mut self) -> Result<()> {
        if !self.state.host.has_chart() {
            return Err(VizError::NoChart);
        }

        let picked = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .add_filter("JPEG Image", &["jpg", "jpeg"])
            .add_filter("PDF Document", &["pdf"])
            .add_filter("SVG Image", &["svg"])
            .set_file_name(export::DEFAULT_FILE_NAME)
            .save_file();

        match picked {
            Some(path) => self.save_chart(&with_default_extension(path)),
            None => Ok(()),
        }
    }

    pub fn save_chart(&mut self, path: &Path) -> Result<()> {
        let chart = self.state.host.chart().ok_or(VizError::NoChart)?;
        chart::export(Some(chart), path)?;

        let message = format!("Chart saved to {}", path.display());
        self.state.ui.set_status(message.clone());
        self.state.ui.notify(Notification::info("Saved", message));
        Ok(())
    }

    /// Drop the hosted chart. Returns false when there was none.
    pub fn clear_chart(&mut self) -> bool {
        let cleared = self.drop_chart();
        if cleared {
            self.state.ui.set_status(status::CHART_CLEARED);
        }
        cleared
    }

    fn drop_chart(&mut self) -> bool {
        self.state.viewport.reset_navigation();
        self.state.host.clear()
    }

    pub fn zoom_in(&mut self) -> bool {
        if !self.state.host.has_chart() {
            return false;
        }
        self.state.viewport.zoom_in();
        self.state.ui.set_status(status::ZOOM_MODE);
        true
    }

    pub fn zoom_out(&mut self) -> bool {
        if !self.state.host.has_chart() {
            return false;
        }
        self.state.viewport.zoom_out();
        self.state.ui.set_status(status::ZOOMED_OUT);
        true
    }

    pub fn toggle_pan(&mut self) -> bool {
        if !self.state.host.has_chart() {
            return false;
        }
        if self.state.viewport.toggle_pan() {
            self.state.ui.set_status(status::PAN_ON);
        } else {
            self.state.ui.set_status(status::PAN_OFF);
        }
        true
    }

    pub fn reset_view(&mut self) -> bool {
        if !self.state.host.has_chart() {
            return false;
        }
        self.state.viewport.reset_view();
        self.state.ui.set_status(status::VIEW_RESET);
        true
    }

    /// Flip fullscreen; the caller forwards the change to the window
    pub fn toggle_fullscreen(&mut self, current: Option<WindowGeometry>) -> FullscreenChange {
        let change = self.state.viewport.toggle_fullscreen(current);
        match change {
            FullscreenChange::Enter => self.state.ui.set_status(status::FULLSCREEN_ON),
            FullscreenChange::Exit { .. } => self.state.ui.set_status(status::FULLSCREEN_OFF),
        }
        change
    }

    pub fn exit_fullscreen(&mut self) -> Option<FullscreenChange> {
        let change = self.state.viewport.exit_fullscreen()?;
        self.state.ui.set_status(status::FULLSCREEN_OFF);
        Some(change)
    }

    pub fn copy_preview(&mut self) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(self.state.ui.preview.clone())?;
        self.state.ui.set_status(status::PREVIEW_COPIED);
        Ok(())
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let (toggle_fullscreen, escape, toggle_help, dropped) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::F11),
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F1),
                i.raw.dropped_files.first().and_then(|f| f.path.clone()),
            )
        });

        if toggle_fullscreen {
            let change = self.toggle_fullscreen(window_geometry(ctx));
            apply_fullscreen(ctx, change);
        }
        if escape {
            if let Some(change) = self.exit_fullscreen() {
                apply_fullscreen(ctx, change);
            }
        }
        if toggle_help {
            self.state.ui.toggle_help();
        }
        if let Some(path) = dropped {
            self.run_action("load", |app| app.load_file(&path));
        }
    }
}

/// A save name typed without an extension gets the default one
fn with_default_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(export::DEFAULT_EXTENSION);
    }
    path
}

/// Current outer position and inner size of the native window
pub fn window_geometry(ctx: &egui::Context) -> Option<WindowGeometry> {
    ctx.input(|i| {
        let viewport = i.viewport();
        match (viewport.outer_rect, viewport.inner_rect) {
            (Some(outer), Some(inner)) => Some(WindowGeometry {
                position: outer.min,
                size: inner.size(),
            }),
            _ => None,
        }
    })
}

/// Forward a fullscreen change to the native window
pub fn apply_fullscreen(ctx: &egui::Context, change: FullscreenChange) {
    match change {
        FullscreenChange::Enter => ctx.send_viewport_cmd(ViewportCommand::Fullscreen(true)),
        FullscreenChange::Exit { restore } => {
            ctx.send_viewport_cmd(ViewportCommand::Fullscreen(false));
            if let Some(geometry) = restore {
                ctx.send_viewport_cmd(ViewportCommand::OuterPosition(geometry.position));
                ctx.send_viewport_cmd(ViewportCommand::InnerSize(geometry.size));
            }
        }
    }
}

impl eframe::App for DataVisualizer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::scope!("update");

        // Plot memory of dropped charts
        for id in self.state.host.take_released() {
            ctx.data_mut(|d| d.remove::<egui_plot::PlotMemory>(id));
        }

        self.handle_input(ctx);

        ui::render_status_bar(self, ctx);

        CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .size(Size::relative(layout::CONTROL_FRACTION))
                .size(Size::remainder())
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        ui::render_controls(self, ui);
                    });
                    strip.cell(|ui| {
                        ui::render_chart_view(self, ui);
                    });
                });
        });

        ui::render_notification(self, ctx);
        ui::render_help_dialog(self, ctx);

        profiling::finish_frame!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ChartKind, NavMode};
    use egui::{Pos2, Vec2};
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn loaded() -> (tempfile::TempDir, DataVisualizer) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "sales.csv",
            "category,amount,units\nA,1.0,1\nA,3.0,2\nB,5.0,3\nC,2.0,4\nC,4.0,5\nC,6.0,6\n",
        );
        let mut app = DataVisualizer::default();
        app.load_file(&path).unwrap();
        (dir, app)
    }

    #[test]
    fn test_load_populates_columns_and_status() {
        let (dir, app) = loaded();

        assert_eq!(app.state.row_count(), 6);
        assert_eq!(app.state.column_names(), vec!["category", "amount", "units"]);
        assert_eq!(app.state.chart_config.primary.as_deref(), Some("category"));
        assert_eq!(app.state.chart_config.secondary.as_deref(), Some("amount"));
        assert!(app.state.ui.preview.contains("category"));

        let expected = format!(
            "Loaded {} - 6 rows, 3 columns",
            dir.path().join("sales.csv").display()
        );
        assert_eq!(app.state.ui.status, expected);
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let (dir, mut app) = loaded();
        let bad = write_csv(&dir, "notes.xyz", "a,b\n1,2\n");

        app.run_action("load", |app| app.load_file(&bad));

        assert_eq!(app.state.column_count(), 3);
        assert_eq!(app.state.chart_config.primary.as_deref(), Some("category"));
        assert_eq!(app.state.ui.status, "Error loading file");
        let notification = app.state.ui.notification.as_ref().unwrap();
        assert_eq!(notification.severity, Severity::Error);
    }

    #[test]
    fn test_generate_without_data() {
        let mut app = DataVisualizer::default();
        app.run_action("generate", DataVisualizer::generate_chart);

        assert!(!app.state.host.has_chart());
        assert_eq!(app.state.ui.notification.as_ref().unwrap().title, "No Data");
    }

    #[test]
    fn test_generate_and_regenerate() {
        let (_dir, mut app) = loaded();
        app.state.chart_config.secondary = None;

        for _ in 0..3 {
            app.generate_chart().unwrap();
        }

        assert_eq!(app.state.host.live_count(), 1);
        assert_eq!(app.state.host.pending_release(), 2);
        assert_eq!(
            app.state.ui.status,
            "Generated Bar chart - Use scrollbars to navigate"
        );
    }

    #[test]
    fn test_failed_build_leaves_viewport_empty() {
        let (_dir, mut app) = loaded();
        app.generate_chart().unwrap();

        app.state.chart_config.set_chart_type(ChartKind::Scatter);
        app.state.chart_config.secondary = None;
        app.run_action("generate", DataVisualizer::generate_chart);

        assert!(!app.state.host.has_chart());
        assert_eq!(app.state.ui.status, "Scatter plot requires two columns.");
        assert_eq!(
            app.state.ui.notification.as_ref().unwrap().title,
            "Selection Error"
        );
    }

    #[test]
    fn test_navigation_needs_a_chart() {
        let (_dir, mut app) = loaded();
        assert!(!app.zoom_in());
        assert!(!app.toggle_pan());
        assert!(!app.reset_view());
        assert!(!app.clear_chart());

        app.generate_chart().unwrap();
        assert!(app.toggle_pan());
        assert_eq!(app.state.viewport.mode, NavMode::Pan);
        assert_eq!(app.state.ui.status, status::PAN_ON);

        assert!(app.clear_chart());
        assert_eq!(app.state.viewport.mode, NavMode::None);
        assert_eq!(app.state.ui.status, status::CHART_CLEARED);
    }

    #[test]
    fn test_save_without_chart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = DataVisualizer::default();

        let err = app.save_chart(&dir.path().join("chart.png")).unwrap_err();

        assert!(matches!(err, VizError::NoChart));
    }

    #[test]
    fn test_save_chart() {
        let (dir, mut app) = loaded();
        app.generate_chart().unwrap();
        let path = dir.path().join("out.svg");

        app.save_chart(&path).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(app.state.ui.notification.as_ref().unwrap().title, "Saved");
        assert!(app.state.ui.status.starts_with("Chart saved to"));
    }

    #[test]
    fn test_fullscreen_status() {
        let mut app = DataVisualizer::default();
        let geometry = WindowGeometry {
            position: Pos2::new(10.0, 20.0),
            size: Vec2::new(800.0, 600.0),
        };

        assert_eq!(app.toggle_fullscreen(Some(geometry)), FullscreenChange::Enter);
        assert_eq!(app.state.ui.status, status::FULLSCREEN_ON);

        assert_eq!(
            app.exit_fullscreen(),
            Some(FullscreenChange::Exit {
                restore: Some(geometry)
            })
        );
        assert_eq!(app.state.ui.status, status::FULLSCREEN_OFF);
        assert_eq!(app.exit_fullscreen(), None);
    }

    #[test]
    fn test_default_extension() {
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/chart")),
            PathBuf::from("/tmp/chart.png")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/chart.svg")),
            PathBuf::from("/tmp/chart.svg")
        );
    }
}
