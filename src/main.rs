mod app;
mod clicker;
mod controller;
mod error;
mod hotkey;
mod keymap;
mod queue;
mod settings;
mod worker;

use eframe::egui;
use tracing::error;

use crate::clicker::{default_backend_factory, probe_backend};
use crate::controller::Notice;
use crate::settings::{config_file_path, load_settings};

fn main() -> eframe::Result<()> {
    setup_tracing();

    let settings = config_file_path().map(|p| load_settings(&p)).unwrap_or_default();

    let factory = default_backend_factory().filter(|f| match probe_backend(f) {
        Ok(()) => true,
        Err(e) => {
            error!("Click backend unavailable: {}", e);
            false
        }
    });
    let startup_notices = if factory.is_none() { vec![Notice::missing_backend()] } else { Vec::new() };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_resizable(false)
            .with_inner_size(egui::vec2(380.0, 300.0)),
        ..Default::default()
    };
    eframe::run_native(
        "Auto Clicker",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::AutoClickerApp::new(&cc.egui_ctx, settings, factory, startup_notices)))),
    )
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
