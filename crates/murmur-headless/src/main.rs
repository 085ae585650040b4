mod metrics;
mod snapshots;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use metrics::MetricsWriter;
use murmur_core::sim::Flock;
use murmur_core::FlockConfig;
use snapshots::SnapshotWriter;

#[derive(Parser)]
#[command(name = "murmur-headless")]
#[command(about = "Headless CLI runner for Murmur flocking experiments")]
struct Cli {
    /// Configuration file path (reference tuning when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long, value_name = "DIR")]
    out: PathBuf,

    /// Override the spawn seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of steps
    #[arg(long)]
    steps: Option<u32>,

    /// Override the number of agents
    #[arg(long)]
    agents: Option<u32>,

    /// Write a metrics row every N steps
    #[arg(long, default_value = "50")]
    metrics_every: u32,

    /// Write an agent snapshot every N steps
    #[arg(long)]
    snapshot_every: Option<u32>,
}

/// How often the run reports
#[derive(Debug, Clone, Copy)]
struct RunOptions {
    metrics_every: u32,
    snapshot_every: Option<u32>,
}

#[derive(Debug)]
struct RunSummary {
    steps: u32,
    metrics_rows: u32,
    snapshots: u32,
    elapsed: Duration,
}

fn load_config(cli: &Cli) -> Result<FlockConfig, anyhow::Error> {
    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            serde_yaml::from_str(&std::fs::read_to_string(path)?)?
        }
        None => {
            log::info!("No configuration file given, using reference tuning");
            FlockConfig::default()
        }
    };

    if let Some(seed) = cli.seed {
        config.world.seed = seed;
    }
    if let Some(steps) = cli.steps {
        config.world.steps = steps;
    }
    if let Some(agents) = cli.agents {
        config.agents.count = agents;
    }

    Ok(config)
}

fn run(config: &FlockConfig, options: RunOptions, out: &Path) -> Result<RunSummary, anyhow::Error> {
    if config.world.steps == 0 {
        anyhow::bail!("Step count must be greater than 0.");
    }
    if options.metrics_every == 0 {
        anyhow::bail!("--metrics-every must be greater than 0.");
    }
    if options.snapshot_every == Some(0) {
        anyhow::bail!("--snapshot-every must be greater than 0.");
    }

    let mut flock = Flock::new(config)?;

    std::fs::create_dir_all(out)?;
    let mut metrics_writer = MetricsWriter::new(out)?;
    let snapshot_writer = SnapshotWriter::new(out)?;
    let mut snapshots = 0;

    // Initial state
    flock.update_stats();
    metrics_writer.write_step(0, &flock.stats, Duration::ZERO)?;
    if options.snapshot_every.is_some() {
        snapshot_writer.write_agents_snapshot(0, &flock)?;
        snapshots += 1;
    }

    log::info!("Starting simulation for {} steps...", config.world.steps);
    let start_time = Instant::now();

    for step in 1..=config.world.steps {
        let step_start = Instant::now();
        flock.step();
        let step_time = step_start.elapsed();

        if step % options.metrics_every == 0 {
            flock.update_stats();
            metrics_writer.write_step(step, &flock.stats, step_time)?;

            log::info!(
                "Step {}: mean speed={:.4}, mean neighbors={:.2}, isolated={}, time={:?}",
                step,
                flock.stats.mean_speed,
                flock.stats.mean_neighbors,
                flock.stats.isolated_count,
                step_time
            );
        }

        if let Some(every) = options.snapshot_every {
            if step % every == 0 {
                let path = snapshot_writer.write_agents_snapshot(step, &flock)?;
                snapshots += 1;
                log::debug!("Snapshot written to {}", path.display());
            }
        }
    }

    Ok(RunSummary {
        steps: config.world.steps,
        metrics_rows: metrics_writer.rows_written(),
        snapshots,
        elapsed: start_time.elapsed(),
    })
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    config.validate()?;
    config.log_summary();

    let options = RunOptions {
        metrics_every: cli.metrics_every,
        snapshot_every: cli.snapshot_every,
    };
    let summary = run(&config, options, &cli.out)?;

    log::info!(
        "Simulation of {} steps completed in {:?} ({} metrics rows, {} snapshots)",
        summary.steps,
        summary.elapsed,
        summary.metrics_rows,
        summary.snapshots
    );
    log::info!("Results written to {}", cli.out.display());

    Ok(())
}
