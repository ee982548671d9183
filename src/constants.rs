//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the application, making them easier to maintain and configure.

/// Chart building defaults
pub mod chart {
    /// Default histogram bin count, kept as text like the entry field
    pub const DEFAULT_BINS: &str = "10";

    /// Largest accepted histogram bin count
    pub const MAX_BINS: usize = 10_000;

    /// Heatmap shows the correlation matrix unless switched off
    pub const DEFAULT_SHOW_CORRELATION: bool = true;

    /// Whisker reach in multiples of the inter-quartile range
    pub const WHISKER_IQR: f64 = 1.5;

    /// Series colours, in the order chart types pick them
    pub const PALETTE: [(u8, u8, u8); 7] = [
        (0x34, 0x98, 0xdb), // Blue
        (0xe7, 0x4c, 0x3c), // Red
        (0x2e, 0xcc, 0x71), // Green
        (0xf3, 0x9c, 0x12), // Orange
        (0x9b, 0x59, 0xb6), // Purple
        (0x1a, 0xbc, 0x9c), // Teal
        (0x34, 0x49, 0x5e), // Slate
    ];

    /// Title text colour
    pub const TITLE_COLOR: (u8, u8, u8) = (0x2c, 0x3e, 0x50);

    /// Plot area background
    pub const FACE_COLOR: (u8, u8, u8) = (0xf8, 0xf9, 0xfa);

    /// Heatmap cells without a defined coefficient
    pub const MISSING_COLOR: (u8, u8, u8) = (0xd0, 0xd0, 0xd0);
}

/// Image export defaults
pub mod export {
    /// Output resolution for every format
    pub const DPI: u32 = 300;

    /// Figure size in inches
    pub const FIGURE_WIDTH_IN: f64 = 10.0;
    pub const FIGURE_HEIGHT_IN: f64 = 6.0;

    /// Points per inch, the unit of PDF page sizes and font sizes
    pub const POINTS_PER_INCH: f64 = 72.0;

    /// JPEG quality for .jpg output and the PDF page image
    pub const JPEG_QUALITY: u8 = 92;

    /// Suggested file name in the save dialog
    pub const DEFAULT_FILE_NAME: &str = "chart.png";

    /// Extension appended when the user types a bare name
    pub const DEFAULT_EXTENSION: &str = "png";
}

/// Data loading defaults
pub mod data {
    /// Rows shown in the preview pane
    pub const PREVIEW_ROWS: usize = 10;

    /// Rows used for CSV schema inference
    pub const INFER_SCHEMA_ROWS: usize = 100;

    /// Lines sampled when sniffing a text file's delimiter
    pub const SNIFF_LINES: usize = 10;

    /// Delimiter candidates for .txt files, in order of preference
    pub const DELIMITER_CANDIDATES: [u8; 5] = [b',', b'\t', b';', b'|', b' '];

    /// Extensions offered by the open dialog
    pub const OPEN_EXTENSIONS: [&str; 5] = ["csv", "xlsx", "xls", "json", "txt"];
}

/// UI layout defaults
pub mod layout {
    /// Initial window size
    pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];

    /// Share of the window width taken by the control column
    pub const CONTROL_FRACTION: f32 = 0.36;

    /// On-screen chart size (10 x 6 inch figure at 100 px per inch)
    pub const CHART_WIDTH: f32 = 1000.0;
    pub const CHART_HEIGHT: f32 = 600.0;

    /// Preview pane height
    pub const PREVIEW_HEIGHT: f32 = 220.0;
}

/// Status line texts
pub mod status {
    pub const READY: &str = "Ready to load data";
    pub const ZOOM_MODE: &str = "Zoom mode activated - select area to zoom in";
    pub const ZOOMED_OUT: &str = "Zoomed out";
    pub const PAN_ON: &str = "Pan mode activated - click and drag to pan";
    pub const PAN_OFF: &str = "Pan mode deactivated";
    pub const VIEW_RESET: &str = "View reset to original";
    pub const FULLSCREEN_ON: &str = "Fullscreen mode - press ESC to exit";
    pub const FULLSCREEN_OFF: &str = "Exited fullscreen mode";
    pub const CHART_CLEARED: &str = "Chart cleared";
    pub const PREVIEW_COPIED: &str = "Preview copied to clipboard";
}

/// Configuration file paths
pub mod config {
    /// Configuration file name, looked up in the working directory
    pub const CONFIG_FILE: &str = "data-visualizer.json";

    /// Environment variable overriding the configuration path
    pub const CONFIG_ENV: &str = "DATA_VISUALIZER_CONFIG";

    /// Log level used when RUST_LOG is unset
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

/// Window title
pub const APP_TITLE: &str = "Data Visualizer";
