//! UI interaction state

use crate::constants::status;
use crate::error::{Severity, VizError};

/// Modal message shown over the window until dismissed
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn from_error(err: &VizError) -> Self {
        Self {
            title: err.title().to_string(),
            message: err.user_message(),
            severity: err.severity(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    /// Single status line, overwritten by each action
    pub status: String,

    /// Modal message; a new one replaces the old
    pub notification: Option<Notification>,

    /// Show help window
    pub show_help: bool,

    /// Text of the preview pane
    pub preview: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: status::READY.to_string(),
            notification: None,
            show_help: false,
            preview: String::new(),
        }
    }
}

impl UiState {
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status() {
        let ui = UiState::default();
        assert_eq!(ui.status, "Ready to load data");
        assert!(ui.notification.is_none());
    }

    #[test]
    fn test_new_notification_replaces_old() {
        let mut ui = UiState::default();
        ui.notify(Notification::from_error(&VizError::NoData));
        ui.notify(Notification::info("Saved", "Chart saved to a.png"));

        let shown = ui.notification.as_ref().unwrap();
        assert_eq!(shown.title, "Saved");
        assert_eq!(shown.severity, Severity::Info);

        ui.dismiss_notification();
        assert!(ui.notification.is_none());
    }

    #[test]
    fn test_notification_from_error() {
        let n = Notification::from_error(&VizError::NoChart);
        assert_eq!(n.title, "No Chart");
        assert_eq!(n.message, "Please generate a chart first.");
        assert_eq!(n.severity, Severity::Warning);
    }
}
