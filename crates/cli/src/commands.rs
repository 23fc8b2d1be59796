//! clap command tree for the `cube` binary.

use clap::{value_parser, Arg, ArgAction, Command};
use concurrent_cube::DEFAULT_SIZE;

/// Worker threads for `stress` when `--threads` is absent.
pub const DEFAULT_THREADS: usize = 8;

/// Operations per thread for `stress` when `--ops` is absent.
pub const DEFAULT_OPS: usize = 1000;

/// Build the top-level command with every subcommand.
pub fn build_cli() -> Command {
    Command::new("cube")
        .about("Drive a concurrent N×N×N cube from the command line")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("size")
                .long("size")
                .short('n')
                .global(true)
                .value_parser(value_parser!(usize))
                .default_value(DEFAULT_SIZE.to_string())
                .help("Edge length of the cube"),
        )
        .arg(
            Arg::new("group-limit-factor")
                .long("group-limit-factor")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Admission limit per episode, as a multiple of the size"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print JSON instead of text"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log coordinator activity at debug level"),
        )
        .subcommand(
            Command::new("rotate")
                .about("Apply rotations in order and print the resulting state")
                .arg(
                    Arg::new("moves")
                        .required(true)
                        .num_args(2..)
                        .value_name("SIDE LAYER")
                        .help("Pairs of side (name or 0-5) and layer"),
                ),
        )
        .subcommand(Command::new("show").about("Print the solved state"))
        .subcommand(
            Command::new("stress")
                .about("Run random rotations and shows on many threads")
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .short('t')
                        .value_parser(value_parser!(usize))
                        .default_value(DEFAULT_THREADS.to_string()),
                )
                .arg(
                    Arg::new("ops")
                        .long("ops")
                        .short('k')
                        .value_parser(value_parser!(usize))
                        .default_value(DEFAULT_OPS.to_string())
                        .help("Operations per thread; every 10th is a show"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for the random workload"),
                ),
        )
}
