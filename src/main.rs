mod app;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod resolver;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use charts::StaticFigures;
use config::Config;
use state::AppState;

fn init_logger(config: &Config) {
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_logger(&config);
    log::debug!("Configuration: {config:?}");

    // Everything below runs once; any failure aborts before the window opens.
    let table = Arc::new(data::load_survey(&config.source)?);
    let figures = StaticFigures::build(&table).context("building static figures")?;
    let state = AppState::new(table, figures, config.debug);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GSS – Gender and Income",
        options,
        Box::new(move |cc| {
            if config.debug {
                cc.egui_ctx.set_debug_on_hover(true);
            }
            Ok(Box::new(DashboardApp::new(cc, state)))
        }),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
