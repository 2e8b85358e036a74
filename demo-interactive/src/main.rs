//! Interactive Charge Simulation Demo
//!
//! A terminal front end for stepping the charge transport simulation by hand,
//! placing charges between ticks and inspecting the charge and field.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package charge-sim-interactive
//! ```
//!
//! # Commands
//!
//! - `step [n]` - Advance the simulation by n ticks (default 1)
//! - `place [n]` - Place n unit charges at random cells (default 1)
//! - `threshold [p]` - Show or set the per-tick injection probability
//! - `show [charge|field]` - Print a vertex heatmap (default charge)
//! - `status` - Show counters and the cell range
//! - `preset <name>` - Rebuild with a named preset (default, heavy-friction)
//! - `reset` - Zero the grid and counters
//! - `help` - Show available commands
//! - `quit` - Exit

use charge_sim_core::render::{render_heatmap, symmetric_scale, vertex_values, MIN_SCALE};
use charge_sim_core::{HookTarget, SimulationConfig, Simulator};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║        Charge Transport Simulation - Interactive          ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let mut config = SimulationConfig::heavy_friction();
    let Some(mut sim) = build_simulation(&config) else {
        return;
    };
    let mut step_index = 0usize;

    println!(
        "Created {}x{} grid with {} initial charge(s), mu={}, friction={}",
        config.rows,
        config.cols,
        config.initial_charges,
        sim.mu(),
        sim.friction()
    );

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("charge> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "step" | "s" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        step_simulation(&mut sim, &mut step_index, count, config.charge_threshold);
                    }
                    "place" | "p" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        place_charges(&mut sim, count);
                    }
                    "threshold" | "t" => match parts.get(1) {
                        None => println!("Injection threshold: {}", config.charge_threshold),
                        Some(raw) => match raw.parse::<f32>() {
                            Ok(p) if (0.0..=1.0).contains(&p) => {
                                config.charge_threshold = p;
                                println!("Injection threshold set to {}", p);
                            }
                            _ => println!("Usage: threshold <p>  (0.0 to 1.0)"),
                        },
                    },
                    "show" | "sh" => {
                        let target = match parts.get(1) {
                            None => Some(HookTarget::Charge),
                            Some(name) => HookTarget::from_name(name),
                        };
                        match target {
                            Some(target) => show_heatmap(&sim, target),
                            None => println!("Usage: show [charge|field]"),
                        }
                    }
                    "status" | "st" => show_status(&sim, config.charge_threshold),
                    "preset" => match parts.get(1) {
                        Some(name) => switch_preset(name, &mut config, &mut sim, &mut step_index),
                        None => println!("Usage: preset <default|heavy-friction>"),
                    },
                    "reset" | "r" => {
                        sim.reset();
                        step_index = 0;
                        println!("Simulation reset. Grid is empty; use 'place' to add charge.");
                    }
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => println!(
                        "Unknown command: {}. Type 'help' for available commands.",
                        parts[0]
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
}

fn build_simulation(config: &SimulationConfig) -> Option<Simulator> {
    match config.build() {
        Ok(sim) => Some(sim),
        Err(e) => {
            eprintln!("Failed to build simulation: {}", e);
            None
        }
    }
}

fn switch_preset(
    name: &str,
    config: &mut SimulationConfig,
    sim: &mut Simulator,
    step_index: &mut usize,
) {
    let Some(preset) = SimulationConfig::preset(name) else {
        println!("Unknown preset '{}'", name);
        return;
    };
    let next = SimulationConfig {
        charge_threshold: config.charge_threshold,
        ..preset
    };
    if let Some(new_sim) = build_simulation(&next) {
        *config = next;
        *sim = new_sim;
        *step_index = 0;
        println!(
            "Switched to '{}': mu={}, friction={}",
            name,
            sim.mu(),
            sim.friction()
        );
    }
}

fn step_simulation(sim: &mut Simulator, step_index: &mut usize, count: usize, threshold: f32) {
    println!("Stepping {} tick(s)...", count);

    for i in 0..count {
        let total_before = sim.grid().total_charge();
        let injections_before = sim.stats().injections;
        let start = Instant::now();

        sim.run_step(*step_index, threshold);
        *step_index += 1;

        let stats = sim.stats();
        let injected = stats.injections != injections_before;
        let time = start.elapsed();

        if i + 1 == count || injected {
            println!(
                "  Step {}: total {:.4} → {:.4}{}, Time: {}µs",
                *step_index,
                total_before,
                stats.total_charge,
                if injected { " (+1 injected)" } else { "" },
                time.as_micros()
            );
        }
    }
    println!("Done.");
}

fn place_charges(sim: &mut Simulator, count: usize) {
    for _ in 0..count {
        let (i, j) = sim.place_charge();
        println!("  Placed 1.0 at ({}, {}), cell now {:.4}", i, j, sim.grid().get(i, j));
    }
}

fn show_status(sim: &Simulator, threshold: f32) {
    let stats = sim.stats();
    println!("\n═══════════════ SIMULATION STATUS ═══════════════");
    println!("State:              {:?}", sim.state());
    println!("Grid:               {}x{}", sim.grid().rows(), sim.grid().cols());
    println!(
        "Parameters:         epsilon={}, mu={}, friction={}",
        sim.epsilon(),
        sim.mu(),
        sim.friction()
    );
    println!("Injection threshold: {}", threshold);
    println!("Ticks:              {}", stats.steps);
    println!("Injections:         {}", stats.injections);
    println!("Manual placements:  {}", stats.manual_placements);
    println!("Total charge:       {:.4}", stats.total_charge);
    println!(
        "Cell range:         {:.4} .. {:.4}",
        stats.min_charge, stats.max_charge
    );
    println!("Peak |charge|:      {:.4}", stats.peak_magnitude(MIN_SCALE));
    println!("══════════════════════════════════════════════════\n");
}

fn show_heatmap(sim: &Simulator, target: HookTarget) {
    let (title, values) = match target {
        HookTarget::Charge => ("CHARGE", sim.grid().cells()),
        HookTarget::Field => ("FIELD", sim.field().as_slice()),
    };
    let rows = sim.grid().rows();
    let cols = sim.grid().cols();

    println!("\n═══════════════ {} HEATMAP ═══════════════", title);
    let scale = symmetric_scale(vertex_values(values, rows, cols).as_slice());
    println!("Legend: · ░ ▒ ▓ █  = |value| from 0 to {:.4}", scale);
    println!("        blue = negative, red = positive\n");
    print!("{}", render_heatmap(values, rows, cols, true));
    println!("══════════════════════════════════════════════════\n");
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  step [n], s [n]      - Advance n ticks (default 1)");
    println!("  place [n], p [n]     - Place n unit charges at random cells");
    println!("  threshold [p], t     - Show or set the injection probability");
    println!("  show [charge|field]  - Print a vertex heatmap");
    println!("  status, st           - Show simulation status");
    println!("  preset <name>        - Rebuild with a preset (default, heavy-friction)");
    println!("  reset, r             - Zero the grid and counters");
    println!("  help, ?              - Show this help");
    println!("  quit, q              - Exit");
    println!("══════════════════════════════════════════════════\n");
}
