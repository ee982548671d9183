//! Navigation and window state of the chart viewport

use egui::{Pos2, Vec2};

/// What a primary-button drag on the chart does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    #[default]
    None,
    /// Rectangle-select zoom
    Zoom,
    /// Click and drag moves the view
    Pan,
}

/// Outer position and inner size of the native window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub position: Pos2,
    pub size: Vec2,
}

/// Window change the UI has to request from the platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FullscreenChange {
    Enter,
    /// Leave fullscreen and put the window back where it was, if known
    Exit { restore: Option<WindowGeometry> },
}

#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    pub mode: NavMode,
    pub fullscreen: bool,
    /// Geometry remembered when fullscreen was entered
    saved_geometry: Option<WindowGeometry>,
    /// Plot bounds go back to the full extent on the next frame
    reset_pending: bool,
}

impl ViewportState {
    pub fn zoom_in(&mut self) {
        self.mode = NavMode::Zoom;
    }

    /// Leave zoom mode and show the whole chart again
    pub fn zoom_out(&mut self) {
        self.mode = NavMode::None;
        self.reset_pending = true;
    }

    /// Flip pan mode. Returns true when pan is now enabled.
    pub fn toggle_pan(&mut self) -> bool {
        self.mode = if self.mode == NavMode::Pan {
            NavMode::None
        } else {
            NavMode::Pan
        };
        self.pan_enabled()
    }

    pub fn pan_enabled(&self) -> bool {
        self.mode == NavMode::Pan
    }

    pub fn zoom_enabled(&self) -> bool {
        self.mode == NavMode::Zoom
    }

    /// Reset plot bounds on next frame
    pub fn reset_view(&mut self) {
        self.reset_pending = true;
    }

    /// Consume a pending reset
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_pending)
    }

    /// Back to plain navigation, used when the chart goes away
    pub fn reset_navigation(&mut self) {
        self.mode = NavMode::None;
        self.reset_pending = false;
    }

    /// Enter or leave fullscreen. `current` is the window geometry right now,
    /// remembered on entry so leaving can restore it.
    pub fn toggle_fullscreen(&mut self, current: Option<WindowGeometry>) -> FullscreenChange {
        if self.fullscreen {
            self.fullscreen = false;
            FullscreenChange::Exit {
                restore: self.saved_geometry.take(),
            }
        } else {
            self.fullscreen = true;
            self.saved_geometry = current;
            FullscreenChange::Enter
        }
    }

    /// Leave fullscreen if active; None when there is nothing to do
    pub fn exit_fullscreen(&mut self) -> Option<FullscreenChange> {
        if !self.fullscreen {
            return None;
        }
        Some(self.toggle_fullscreen(None))
    }

    #[cfg(test)]
    pub fn saved_geometry(&self) -> Option<WindowGeometry> {
        self.saved_geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> WindowGeometry {
        WindowGeometry {
            position: Pos2::new(120.0, 80.0),
            size: Vec2::new(1200.0, 800.0),
        }
    }

    #[test]
    fn test_fullscreen_round_trip_restores_geometry() {
        let mut viewport = ViewportState::default();

        assert_eq!(viewport.toggle_fullscreen(Some(geometry())), FullscreenChange::Enter);
        assert!(viewport.fullscreen);
        assert_eq!(viewport.saved_geometry(), Some(geometry()));

        let change = viewport.exit_fullscreen();

        assert_eq!(
            change,
            Some(FullscreenChange::Exit {
                restore: Some(geometry())
            })
        );
        assert!(!viewport.fullscreen);
        assert_eq!(viewport.saved_geometry(), None);
    }

    #[test]
    fn test_escape_outside_fullscreen_is_ignored() {
        let mut viewport = ViewportState::default();
        assert_eq!(viewport.exit_fullscreen(), None);
        assert!(!viewport.fullscreen);
    }

    #[test]
    fn test_toggle_pan() {
        let mut viewport = ViewportState::default();
        assert!(viewport.toggle_pan());
        assert_eq!(viewport.mode, NavMode::Pan);
        assert!(!viewport.toggle_pan());
        assert_eq!(viewport.mode, NavMode::None);
    }

    #[test]
    fn test_zoom_out_requests_reset() {
        let mut viewport = ViewportState::default();
        viewport.zoom_in();
        assert!(viewport.zoom_enabled());

        viewport.zoom_out();

        assert_eq!(viewport.mode, NavMode::None);
        assert!(viewport.take_reset());
        assert!(!viewport.take_reset());
    }

    #[test]
    fn test_reset_navigation() {
        let mut viewport = ViewportState::default();
        viewport.toggle_pan();
        viewport.reset_view();

        viewport.reset_navigation();

        assert_eq!(viewport.mode, NavMode::None);
        assert!(!viewport.take_reset());
    }
}
