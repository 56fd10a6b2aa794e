use anyhow::Result;
use clap::Parser;
use env_logger::Builder;
use log::{debug, error, info, warn, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};
use ward_common::{ScenarioConfig, Trajectory};
use ward_engine::{simulate_with, SolverOptions};

mod chart;
mod session;

use session::{RenderSession, Ticket};

/// Command-line arguments for the visualizer
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (TOML)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Output chart file path (.png)
    #[arg(short, long, default_value = "ward_strain.png")]
    output: PathBuf,

    /// Width of the chart in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Height of the chart in pixels
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Re-render whenever the scenario file changes
    #[arg(long)]
    watch: bool,

    /// How often to check the scenario file in watch mode (milliseconds)
    #[arg(long, default_value_t = 500)]
    poll_ms: u64,
}

/// What one request produced: a chart to draw or a message to show instead.
#[derive(Debug)]
enum Frame {
    Chart(Trajectory),
    Failure(String),
}

fn main() -> Result<()> {
    // Initialize logger
    Builder::from_default_env()
        .filter(None, LevelFilter::Info)
        .init();

    let args = Args::parse();
    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    info!("Starting Ward Strain Visualizer...");
    info!("Scenario file: {}", args.config.display());
    info!("Output chart: {} ({}x{})", args.output.display(), args.width, args.height);

    let session = Arc::new(RenderSession::new());

    if !args.watch {
        let ticket = session.issue();
        let frame = compute_frame(&args.config);
        let failure = match &frame {
            Frame::Failure(message) => Some(message.clone()),
            Frame::Chart(_) => None,
        };
        session.commit(ticket, || publish(&frame, &args.output, (args.width, args.height)))?;
        if let Some(message) = failure {
            anyhow::bail!("Simulation failed: {}", message);
        }
        info!("Output saved to: {}", args.output.display());
        return Ok(());
    }

    info!("Watching {} every {} ms (Ctrl-C to stop).", args.config.display(), args.poll_ms);
    let mut last_seen: Option<SystemTime> = None;
    let mut first = true;
    loop {
        let modified = fs::metadata(&args.config).and_then(|m| m.modified()).ok();
        if first || modified != last_seen {
            first = false;
            last_seen = modified;
            let ticket = session.issue();
            info!("Scenario changed, starting request #{}", ticket.id());
            spawn_request(Arc::clone(&session), ticket, args.clone());
        }
        thread::sleep(Duration::from_millis(args.poll_ms));
    }
}

/// Computes and publishes one request on a worker thread.
fn spawn_request(session: Arc<RenderSession>, ticket: Ticket, args: Args) {
    thread::spawn(move || {
        if !session.is_current(ticket) {
            debug!("Request #{} superseded before it started", ticket.id());
            return;
        }
        let start_time = Instant::now();
        let frame = compute_frame(&args.config);
        let size = (args.width, args.height);
        match session.commit(ticket, || publish(&frame, &args.output, size)) {
            Ok(true) => info!(
                "Request #{} rendered in {:.2?}",
                ticket.id(),
                start_time.elapsed()
            ),
            Ok(false) => warn!("Discarded stale result of request #{}", ticket.id()),
            Err(e) => error!("Rendering request #{} failed: {:#}", ticket.id(), e),
        }
    });
}

/// Loads the scenario and runs the simulation; failures become a message frame.
fn compute_frame(config_path: &Path) -> Frame {
    let config = match ScenarioConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return Frame::Failure(format!("{:#}", e));
        }
    };
    let opts = SolverOptions::from(&config.solver);
    match simulate_with(config.initial_state(), &config.parameters(), config.timing.days, &opts) {
        Ok(trajectory) => {
            debug!("Simulated {} samples", trajectory.len());
            Frame::Chart(trajectory)
        }
        Err(e) => {
            error!("Simulation failed: {}", e);
            Frame::Failure(e.to_string())
        }
    }
}

fn publish(frame: &Frame, output: &Path, size: (u32, u32)) -> Result<()> {
    match frame {
        Frame::Chart(trajectory) => chart::render_chart(trajectory, output, size),
        Frame::Failure(message) => chart::render_error(message, output, size),
    }
}
