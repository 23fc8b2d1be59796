//! Cube CLI: drive a concurrent cube from the shell.
//!
//! - `cube rotate right 0 up 1`: apply rotations in order and print the state
//! - `cube show`: print the solved state
//! - `cube stress --threads 8 --ops 1000`: random concurrent workload

mod commands;
mod format;
mod parse;

use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use concurrent_cube::{Cube, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_state, format_stress, OutputMode, StressReport};
use parse::{check_layers, cube_options, matches_to_action, CliAction, CubeOptions};

fn main() {
    let matches = build_cli().get_matches();

    setup_logging(matches.get_flag("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let result = matches_to_action(&matches)
        .and_then(|action| run(action, &cube_options(&matches), output_mode));
    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(1);
        }
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG` (default `warn`).
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_cube(options: &CubeOptions) -> Result<Cube, String> {
    let mut builder = Cube::builder().size(options.size);
    if let Some(factor) = options.group_limit_factor {
        builder = builder.group_limit_factor(factor);
    }
    builder.build().map_err(|e| e.to_string())
}

fn run(action: CliAction, options: &CubeOptions, mode: OutputMode) -> Result<String, String> {
    let cube = build_cube(options)?;
    match action {
        CliAction::Rotate(moves) => {
            check_layers(&moves, cube.size())?;
            for (side, layer) in moves {
                cube.rotate(side, layer).map_err(|e| e.to_string())?;
            }
            let snapshot = cube.show().map_err(|e| e.to_string())?;
            Ok(format_state(&snapshot, mode))
        }
        CliAction::Show => {
            let snapshot = cube.show().map_err(|e| e.to_string())?;
            Ok(format_state(&snapshot, mode))
        }
        CliAction::Stress { threads, ops, seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            let report = stress(Arc::new(cube), threads, ops, seed)?;
            Ok(format_stress(&report, mode))
        }
    }
}

/// Run `ops` random operations on each of `threads` threads.
fn stress(cube: Arc<Cube>, threads: usize, ops: usize, seed: u64) -> Result<StressReport, String> {
    tracing::info!(threads, ops, seed, size = cube.size(), "stress run started");
    let started = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cube = Arc::clone(&cube);
            thread::spawn(move || -> concurrent_cube::Result<()> {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64));
                for i in 0..ops {
                    if i % 10 == 9 {
                        cube.show()?;
                    } else {
                        let side: Side = rng.gen();
                        let layer = cube.random_layer(&mut rng);
                        cube.rotate(side, layer)?;
                    }
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| "stress worker panicked".to_string())?
            .map_err(|e| e.to_string())?;
    }
    let elapsed = started.elapsed();

    let color_counts_ok = cube.show().map_err(|e| e.to_string())?.has_correct_color_counts();
    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, color_counts_ok, "stress run finished");

    Ok(StressReport::new(
        cube.size(),
        threads,
        ops,
        seed,
        elapsed,
        color_counts_ok,
        cube.metrics(),
    ))
}
