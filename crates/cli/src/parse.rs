//! ArgMatches → CliAction conversion.
//!
//! Translates clap's parsed arguments into a cube configuration plus the
//! action to run on it.

use clap::ArgMatches;
use concurrent_cube::{Side, DEFAULT_SIZE};

use crate::commands::{DEFAULT_OPS, DEFAULT_THREADS};

/// Cube settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeOptions {
    pub size: usize,
    pub group_limit_factor: Option<usize>,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Apply rotations in order, then print the state.
    Rotate(Vec<(Side, usize)>),
    /// Print the solved state.
    Show,
    /// Random concurrent workload.
    Stress {
        threads: usize,
        ops: usize,
        seed: Option<u64>,
    },
}

/// Read the global cube options.
pub fn cube_options(matches: &ArgMatches) -> CubeOptions {
    CubeOptions {
        size: matches.get_one::<usize>("size").copied().unwrap_or(DEFAULT_SIZE),
        group_limit_factor: matches.get_one::<usize>("group-limit-factor").copied(),
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "rotate" => parse_rotate(sub_matches),
        "show" => Ok(CliAction::Show),
        "stress" => parse_stress(sub_matches),
        other => Err(format!("Unknown command: {}", other)),
    }
}

// =========================================================================
// Rotate
// =========================================================================

fn parse_rotate(matches: &ArgMatches) -> Result<CliAction, String> {
    let raw: Vec<&String> = matches
        .get_many::<String>("moves")
        .ok_or("No rotations given")?
        .collect();
    if raw.len() % 2 != 0 {
        return Err(format!(
            "Rotations come in SIDE LAYER pairs, got {} values",
            raw.len()
        ));
    }

    raw.chunks(2)
        .map(|pair| {
            let side = pair[0].parse::<Side>().map_err(|e| e.to_string())?;
            let layer = pair[1]
                .parse::<usize>()
                .map_err(|e| format!("Invalid layer '{}': {}", pair[1], e))?;
            Ok((side, layer))
        })
        .collect::<Result<Vec<_>, String>>()
        .map(CliAction::Rotate)
}

/// Reject layers the cube does not have before touching it.
pub fn check_layers(moves: &[(Side, usize)], size: usize) -> Result<(), String> {
    match moves.iter().find(|(_, layer)| *layer >= size) {
        Some((side, layer)) => Err(format!(
            "Layer {} of {} is out of range for a cube of size {}",
            layer, side, size
        )),
        None => Ok(()),
    }
}

// =========================================================================
// Stress
// =========================================================================

fn parse_stress(matches: &ArgMatches) -> Result<CliAction, String> {
    let threads = matches.get_one::<usize>("threads").copied().unwrap_or(DEFAULT_THREADS);
    let ops = matches.get_one::<usize>("ops").copied().unwrap_or(DEFAULT_OPS);
    if threads == 0 {
        return Err("--threads must be positive".to_string());
    }
    Ok(CliAction::Stress {
        threads,
        ops,
        seed: matches.get_one::<u64>("seed").copied(),
    })
}
