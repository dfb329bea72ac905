use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use demo_core::{load_config, DemoController, Document};
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::DemoApp;

#[derive(Parser, Debug)]
#[command(about = "Interactive rule-based vs network-style shape recognition demo")]
struct Args {
    /// TOML settings file; defaults to ./demo.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Time scale for every staged delay.
    #[arg(long)]
    speed: Option<f64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref()).context("failed to load demo config")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    config.validate().context("invalid command line override")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!(speed = config.speed, seed = ?config.seed, "starting desktop demo");

    let surface = Arc::new(Mutex::new(Document::demo_markup(
        config.canvas_width,
        config.canvas_height,
    )));
    let controller = Arc::new(DemoController::from_config(Arc::clone(&surface), &config));

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(controller, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shape Approaches Demo")
            .with_inner_size([960.0, 820.0])
            .with_min_inner_size([720.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Shape Approaches Demo",
        options,
        Box::new(move |_cc| Ok(Box::new(DemoApp::new(cmd_tx, ui_rx, surface)))),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}
