mod chart_view;
mod controls;
mod help_dialog;
mod notification;
mod preview;
mod status_bar;

pub use chart_view::render_chart_view;
pub use controls::render_controls;
pub use help_dialog::render_help_dialog;
pub use notification::render_notification;
pub use preview::render_preview_pane;
pub use status_bar::render_status_bar;
