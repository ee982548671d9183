#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;
mod chart;
mod config;
mod constants;
mod data;
mod error;
mod state;
mod ui;
mod widgets;

use app::DataVisualizer;
use config::AppConfig;

/// RUST_LOG wins; otherwise the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() -> Option<puffin_http::Server> {
    puffin::set_scopes_on(true);
    let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&addr) {
        Ok(server) => {
            tracing::info!(%addr, "puffin server listening");
            Some(server)
        }
        Err(e) => {
            tracing::warn!("failed to start puffin server: {}", e);
            None
        }
    }
}

fn main() -> eframe::Result {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(&config.log_level);
    if let Some(e) = config_error {
        tracing::warn!("{}; using default settings", e);
    }

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = start_puffin_server();

    tracing::info!(?config, "starting {}", constants::APP_TITLE);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(constants::APP_TITLE)
            .with_inner_size(config.window_size)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        constants::APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(DataVisualizer::new(cc, config)))),
    )
}
