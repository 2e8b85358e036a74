use charge_sim_core::render::render_heatmap;
use charge_sim_core::{HookTarget, SimulationConfig, StepView};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Charge transport simulation with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "charge-sim-demo")]
#[command(about = "Headless charge transport simulation", long_about = None)]
struct Args {
    /// Number of ticks to run
    #[arg(short, long, default_value_t = 100)]
    steps: usize,

    /// JSON configuration file (missing keys take their default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named preset (default, heavy-friction)
    #[arg(short = 'p', long)]
    preset: Option<String>,

    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Mobility
    #[arg(long)]
    mu: Option<f32>,

    /// Friction coefficient
    #[arg(long)]
    friction: Option<f32>,

    /// Field solver permittivity
    #[arg(long)]
    epsilon: Option<f32>,

    /// Per-tick injection probability
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Unit charges placed before the first tick
    #[arg(short = 'i', long)]
    initial_charges: Option<usize>,

    /// Print a heatmap every N ticks (0 = only at the end)
    #[arg(short, long, default_value_t = 10)]
    report_interval: usize,

    /// Heatmap of the field instead of the charge
    #[arg(long)]
    show_field: bool,

    /// Colour the heatmap with ANSI escapes
    #[arg(long)]
    color: bool,

    /// Write one JSON frame per tick into this directory
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Print final statistics as JSON
    #[arg(long)]
    json: bool,
}

/// One dumped tick
#[derive(Serialize)]
struct Frame<'a> {
    step: usize,
    target: HookTarget,
    rows: usize,
    cols: usize,
    values: &'a [f32],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Charge Transport Simulation ===\n");
    println!(
        "Grid {}x{}, epsilon={}, mu={}, friction={}, threshold={}",
        config.rows, config.cols, config.epsilon, config.mu, config.friction, config.charge_threshold
    );
    if let Some(seed) = config.seed {
        println!("Seed: {}", seed);
    }

    let mut sim = match config.build() {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Failed to build simulation: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let target = if args.show_field {
        HookTarget::Field
    } else {
        HookTarget::Charge
    };

    if args.report_interval > 0 {
        let interval = args.report_interval;
        let color = args.color;
        sim.attach_hook(
            move |view, step| {
                if (step + 1) % interval == 0 {
                    print_report(&view, step, color);
                }
            },
            target,
        );
    }

    if let Some(dir) = &args.frames_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Cannot create frames directory {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
        info!("Writing frames to {}", dir.display());
        for frame_target in [HookTarget::Charge, HookTarget::Field] {
            let dir = dir.clone();
            sim.attach_hook(move |view, step| write_frame(&dir, &view, step), frame_target);
        }
    }

    println!("\nRunning {} ticks...\n", args.steps);
    sim.run(args.steps, config.charge_threshold);

    if needs_final_report(args.steps, args.report_interval) {
        let view = match target {
            HookTarget::Charge => StepView::Charge(sim.grid()),
            HookTarget::Field => StepView::Field(sim.field()),
        };
        print_report(&view, args.steps.saturating_sub(1), args.color);
    }

    let stats = sim.stats();
    if args.json {
        match serde_json::to_string_pretty(&stats) {
            Ok(text) => println!("{}", text),
            Err(e) => warn!("Failed to serialise statistics: {}", e),
        }
    } else {
        println!("\n=== Simulation Complete ===");
        println!("Ticks:              {}", stats.steps);
        println!("Injections:         {}", stats.injections);
        println!("Injected charge:    {:.1}", stats.injected_charge());
        println!("Final total charge: {:.4}", stats.total_charge);
        println!(
            "Cell range:         {:.4} .. {:.4}",
            stats.min_charge, stats.max_charge
        );
    }

    ExitCode::SUCCESS
}

/// Start from a file or preset, then apply explicit overrides
fn resolve_config(args: &Args) -> Result<SimulationConfig, String> {
    let mut config = if let Some(path) = &args.config {
        SimulationConfig::load(path).map_err(|e| format!("{}: {}", path.display(), e))?
    } else if let Some(name) = &args.preset {
        SimulationConfig::preset(name)
            .ok_or_else(|| format!("Unknown preset '{}' (default, heavy-friction)", name))?
    } else {
        SimulationConfig::default()
    };

    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(mu) = args.mu {
        config.mu = mu;
    }
    if let Some(friction) = args.friction {
        config.friction = friction;
    }
    if let Some(epsilon) = args.epsilon {
        config.epsilon = epsilon;
    }
    if let Some(threshold) = args.threshold {
        config.charge_threshold = threshold;
    }
    if let Some(initial) = args.initial_charges {
        config.initial_charges = initial;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

/// True unless the periodic hook already rendered the last tick
fn needs_final_report(steps: usize, report_interval: usize) -> bool {
    report_interval == 0 || steps % report_interval != 0
}

fn print_report(view: &StepView<'_>, step: usize, color: bool) {
    let values = view.values();
    let total: f64 = values.iter().map(|&v| f64::from(v)).sum();
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    println!(
        "Step {:5} | {:?} | sum {:10.4} | min {:9.4} | max {:9.4}",
        step,
        view.target(),
        total,
        min,
        max
    );
    print!("{}", render_heatmap(values, view.rows(), view.cols(), color));
    println!();
}

fn write_frame(dir: &Path, view: &StepView<'_>, step: usize) {
    let target = view.target();
    let frame = Frame {
        step,
        target,
        rows: view.rows(),
        cols: view.cols(),
        values: view.values(),
    };
    let name = match target {
        HookTarget::Charge => format!("charge_{:05}.json", step),
        HookTarget::Field => format!("field_{:05}.json", step),
    };
    let path = dir.join(name);
    match serde_json::to_vec(&frame) {
        Ok(bytes) => {
            if let Err(e) = fs::write(&path, bytes) {
                warn!("Failed to write frame {}: {}", path.display(), e);
            }
        }
        Err(e) => warn!("Failed to serialise frame {}: {}", step, e),
    }
}
