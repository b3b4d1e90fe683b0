mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::PenguinDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    // Datasets and wiring are checked before any window is shown.
    let config = DashboardConfig::load().context("loading dashboard configuration")?;
    let penguins = data::loader::load_penguins(&config).context("loading penguin dataset")?;
    let tips = data::loader::load_tips(&config).context("loading tips dataset")?;

    let title = config.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };
    let state = AppState::new(config, penguins, tips)?;

    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(PenguinDashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
