use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use demo_core::{
    load_config, random::StdRandom, AnalyzeOutcome, DemoController, Document, Scheduler,
    TokioScheduler, VirtualClock,
};
use serde::Serialize;
use shared::{
    domain::{AnalysisOutcome, ShapeName},
    protocol::COMPARISON_SLOTS,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Runs one shape analysis without a window and prints the comparison")]
struct Args {
    /// circle, square, triangle or rectangle
    #[arg(long)]
    shape: String,
    /// Skip every staged delay.
    #[arg(long)]
    instant: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    speed: Option<f64>,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    shape: ShapeName,
    rule_based: &'a AnalysisOutcome,
    network_style: &'a AnalysisOutcome,
    slots: Vec<(&'static str, String)>,
}

#[tokio::main]
async fn main() -> Result<()> {
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
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let shape: ShapeName = args.shape.parse()?;
    info!(
        shape = %shape,
        instant = args.instant,
        speed = config.speed,
        seed = ?config.seed,
        "starting headless run"
    );

    let surface = Arc::new(Mutex::new(Document::demo_markup(
        config.canvas_width,
        config.canvas_height,
    )));
    let scheduler: Arc<dyn Scheduler> = if args.instant {
        Arc::new(VirtualClock::new())
    } else {
        Arc::new(TokioScheduler)
    };
    let controller = DemoController::new(
        Arc::clone(&surface),
        scheduler,
        Box::new(StdRandom::from_seed_option(config.seed)),
        config.timings(),
    );

    controller.init()?;
    controller.select_shape(shape)?;

    let (rule_based, network_style) = match controller.analyze().await {
        AnalyzeOutcome::Completed {
            rule_based,
            network_style,
        } => (rule_based, network_style),
        AnalyzeOutcome::Skipped => bail!("analysis did not start"),
        AnalyzeOutcome::Failed(message) => {
            warn!(error = %message, "headless run failed");
            bail!("analysis failed: {message}")
        }
    };
    info!(
        rule_confidence = rule_based.confidence,
        network_confidence = network_style.confidence,
        "headless run complete"
    );

    let slots: Vec<(&'static str, String)> = {
        let doc = surface
            .lock()
            .map_err(|err| anyhow::anyhow!("surface unavailable: {err}"))?;
        COMPARISON_SLOTS
            .into_iter()
            .map(|slot| (slot, doc.text(slot).unwrap_or_default().to_string()))
            .collect()
    };

    if args.json {
        let report = Report {
            shape,
            rule_based: &rule_based,
            network_style: &network_style,
            slots,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (slot, value) in &slots {
            println!("{slot:<10} {value}");
        }
    }

    Ok(())
}
