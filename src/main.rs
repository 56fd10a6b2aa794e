use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use ward_common::{OutputFormat, ScenarioConfig, Trajectory, TrajectorySummary};
use ward_engine::{capacity_sweep, simulate_with, SolverOptions, SweepPoint};

/// Command-line arguments for the simulation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (TOML)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Output format override: table, csv or json
    #[arg(short, long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Number of samples over [0, days], overriding the scenario
    #[arg(long)]
    days: Option<usize>,

    /// Compare the capacities listed in the [sweep] section instead of a single run
    #[arg(long)]
    sweep: bool,
}

fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "csv" => Ok(OutputFormat::Csv),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("unknown output format '{}'", other)),
    }
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    let args = Args::parse();
    info!("Starting Ward Strain Simulator...");

    // --- Load Configuration ---
    let config = ScenarioConfig::load(&args.config)?;
    let params = config.parameters();
    let initial = config.initial_state();
    let days = args.days.unwrap_or(config.timing.days);
    let format = args.format.unwrap_or(config.output.format);
    let opts = SolverOptions::from(&config.solver);
    debug!("Scenario: {:#?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.sweep {
        if config.sweep.capacities.is_empty() {
            anyhow::bail!("--sweep requires a non-empty [sweep] capacities list in {}", args.config.display());
        }
        let start_time = Instant::now();
        let points = capacity_sweep(initial, &params, days, &config.sweep.capacities, &opts);
        info!("Sweep finished in {:.3} ms.", start_time.elapsed().as_secs_f64() * 1000.0);
        write_sweep(&mut out, &points, format)?;
        return Ok(());
    }

    info!(
        "Simulating {} days: C={} alpha={} gamma={} S={} illness_prob={} population={} P0={} W0={}",
        days,
        params.capacity,
        params.admission_rate,
        params.discharge_rate,
        params.staff_availability,
        params.illness_prob,
        params.population,
        initial.current,
        initial.waiting
    );

    let start_time = Instant::now();
    let trajectory = match simulate_with(initial, &params, days, &opts) {
        Ok(trajectory) => trajectory,
        Err(e) => {
            error!("Simulation failed: {}", e);
            anyhow::bail!("Simulation failed: {}", e);
        }
    };
    info!(
        "Simulation finished in {:.3} ms ({} samples).",
        start_time.elapsed().as_secs_f64() * 1000.0,
        trajectory.len()
    );

    match format {
        OutputFormat::Table => write_table(&mut out, &trajectory, params.capacity)?,
        OutputFormat::Csv => write_csv(&mut out, &trajectory)?,
        OutputFormat::Json => write_json(&mut out, &trajectory)?,
    }

    info!("Simulation Complete.");
    Ok(())
}

fn write_table<W: Write>(out: &mut W, trajectory: &Trajectory, capacity: f64) -> Result<()> {
    writeln!(out, "{:>10} {:>18} {:>18}", "Time (days)", "Current Patients", "Waiting Patients")?;
    for s in trajectory {
        writeln!(out, "{:>10.3} {:>18.4} {:>18.4}", s.time, s.current, s.waiting)?;
    }
    if let Some(summary) = trajectory.summary(capacity) {
        writeln!(out)?;
        write_summary(out, &summary)?;
        if summary.samples_at_capacity > 0 {
            warn!(
                "Ward at or over capacity in {} of {} samples.",
                summary.samples_at_capacity,
                trajectory.len()
            );
        }
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, summary: &TrajectorySummary) -> Result<()> {
    writeln!(out, "Peak current patients:  {:.4}", summary.peak_current)?;
    writeln!(
        out,
        "Peak waiting patients:  {:.4} (t = {:.3} days)",
        summary.peak_waiting, summary.peak_waiting_time
    )?;
    writeln!(out, "Final current patients: {:.4}", summary.final_current)?;
    writeln!(out, "Final waiting patients: {:.4}", summary.final_waiting)?;
    writeln!(out, "Samples at capacity:    {}", summary.samples_at_capacity)?;
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, trajectory: &Trajectory) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["time_days", "current_patients", "waiting_patients"])?;
    for s in trajectory {
        writer.write_record(&[
            format!("{:.6}", s.time),
            format!("{:.6}", s.current),
            format!("{:.6}", s.waiting),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(out: &mut W, trajectory: &Trajectory) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, trajectory).context("Error serializing trajectory to JSON")?;
    writeln!(out)?;
    Ok(())
}

fn write_sweep<W: Write>(out: &mut W, points: &[SweepPoint], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record([
                "capacity",
                "peak_current",
                "peak_waiting",
                "final_current",
                "final_waiting",
                "samples_at_capacity",
                "error",
            ])?;
            for p in points {
                let record = match &p.outcome {
                    Ok(s) => vec![
                        format!("{}", p.capacity),
                        format!("{:.6}", s.peak_current),
                        format!("{:.6}", s.peak_waiting),
                        format!("{:.6}", s.final_current),
                        format!("{:.6}", s.final_waiting),
                        s.samples_at_capacity.to_string(),
                        String::new(),
                    ],
                    Err(e) => {
                        let mut row = vec![format!("{}", p.capacity)];
                        row.extend(std::iter::repeat(String::new()).take(5));
                        row.push(e.to_string());
                        row
                    }
                };
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = points
                .iter()
                .map(|p| match &p.outcome {
                    Ok(s) => serde_json::json!({ "capacity": p.capacity, "summary": s }),
                    Err(e) => serde_json::json!({ "capacity": p.capacity, "error": e.to_string() }),
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &rows).context("Error serializing sweep to JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            for p in points {
                writeln!(out, "== Capacity {} ==", p.capacity)?;
                match &p.outcome {
                    Ok(summary) => write_summary(out, summary)?,
                    Err(e) => {
                        error!("Capacity {} failed: {}", p.capacity, e);
                        writeln!(out, "error: {}", e)?;
                    }
                }
            }
        }
    }
    Ok(())
}
