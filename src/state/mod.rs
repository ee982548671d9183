//! Application state management
//!
//! The controller owns one [`AppState`]. Each concern lives in its own
//! module: chart selection, viewport navigation and the UI feedback state.

mod chart_config;
mod ui;
mod viewport;

pub use chart_config::{ChartConfig, ChartKind, ChartType};
pub use ui::{Notification, UiState};
pub use viewport::{FullscreenChange, NavMode, ViewportState, WindowGeometry};

use crate::chart::ChartHost;
use crate::config::AppConfig;
use crate::data::Dataset;

/// Main application state container
#[derive(Default)]
pub struct AppState {
    /// Currently loaded dataset, replaced wholesale by each load
    pub dataset: Option<Dataset>,

    /// Chart type, columns and per-type options
    pub chart_config: ChartConfig,

    /// The single live chart
    pub host: ChartHost,

    /// Zoom, pan and fullscreen state
    pub viewport: ViewportState,

    /// Status line, notification and dialogs
    pub ui: UiState,

    /// Start-up settings
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Check if data is loaded
    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(Dataset::column_names)
            .unwrap_or_default()
    }

    /// Get the number of rows in the current dataset
    pub fn row_count(&self) -> usize {
        self.dataset.as_ref().map(Dataset::height).unwrap_or(0)
    }

    /// Get the number of columns in the current dataset
    pub fn column_count(&self) -> usize {
        self.dataset.as_ref().map(Dataset::width).unwrap_or(0)
    }
}
