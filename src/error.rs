//! Error types for the data visualizer
//!
//! Every user action reports failure through [`VizError`]. The controller
//! turns it into a modal notification plus a one-line status update, so each
//! variant knows its own title, severity and status text.

use thiserror::Error;

use crate::chart::SaveError;
use crate::data::DataError;

/// How loudly a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Main error type for user-triggered actions
#[derive(Error, Debug)]
pub enum VizError {
    /// Unreadable or unsupported file, or a parse failure
    #[error("Failed to load file: {0}")]
    Load(#[from] DataError),

    /// Chart requested before any dataset was loaded
    #[error("Please load a file first.")]
    NoData,

    /// Required column selection missing
    #[error("{0}")]
    Selection(String),

    /// Dataset cannot satisfy the request (e.g. no numeric columns)
    #[error("{0}")]
    Data(String),

    /// Requested mode exists in the UI but is not supported
    #[error("{0}")]
    Unsupported(String),

    /// Any failure while computing the chart
    #[error("Error creating chart: {0}")]
    Plot(String),

    /// Export requested without a chart
    #[error("Please generate a chart first.")]
    NoChart,

    /// Failure writing the export file
    #[error("Failed to save chart: {0}")]
    Save(#[from] SaveError),

    /// System clipboard unavailable
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Result type alias for controller actions
pub type Result<T> = std::result::Result<T, VizError>;

impl VizError {
    pub fn plot(message: impl Into<String>) -> Self {
        VizError::Plot(message.into())
    }

    /// Get a user-friendly error message suitable for the modal notification
    pub fn user_message(&self) -> String {
        match self {
            VizError::Load(e) => format!("Failed to load file:\n{}", e),
            VizError::Plot(msg) => format!("Error creating chart:\n{}", msg),
            VizError::Save(e) => format!("Failed to save chart:\n{}", e),
            VizError::Clipboard(e) => format!("Could not access the clipboard:\n{}", e),
            other => other.to_string(),
        }
    }

    /// Get a short title for the notification window
    pub fn title(&self) -> &'static str {
        match self {
            VizError::Load(DataError::UnsupportedFormat(_)) => "Unsupported Format",
            VizError::Load(_) => "Error",
            VizError::NoData => "No Data",
            VizError::Selection(_) => "Selection Error",
            VizError::Data(_) => "Data Error",
            VizError::Unsupported(_) => "Not Implemented",
            VizError::Plot(_) => "Plot Error",
            VizError::NoChart => "No Chart",
            VizError::Save(_) => "Save Error",
            VizError::Clipboard(_) => "Clipboard Error",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            VizError::NoData
            | VizError::Selection(_)
            | VizError::Data(_)
            | VizError::Unsupported(_)
            | VizError::NoChart => Severity::Warning,
            VizError::Load(_) | VizError::Plot(_) | VizError::Save(_) | VizError::Clipboard(_) => {
                Severity::Error
            }
        }
    }

    /// One-line text for the status bar
    pub fn status_line(&self) -> String {
        match self {
            VizError::Load(_) => "Error loading file".to_string(),
            VizError::Plot(_) => "Chart generation failed".to_string(),
            VizError::Save(_) => "Failed to save chart".to_string(),
            other => other.to_string(),
        }
    }
}
