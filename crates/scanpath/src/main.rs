//! Command‑line entry point for the `scanpath` tool.
//!
//! Builds a compound scan from model and region descriptors and prints its
//! positions or shape.

use std::{
    fmt::Display,
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
    process,
};

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use scanpoints::{Model, Mutator, Region, registry};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// CLI command implementations.
mod cmd;
/// Descriptor parsers for models, regions and mutators.
mod descriptor;

use crate::descriptor::{Alternate, Offset, parse_model, parse_region};

#[derive(Parser)]
#[command(name = "scanpath")]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Top‑level CLI options and subcommands.
struct Cli {
    /// Sets the level of verbosity (`-v`, `-vv`, ...).
    #[arg(short, action = clap::ArgAction::Count, help = "Sets the level of verbosity")]
    v: u8,

    /// Command to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Models, regions and mutators that make up one scan.
#[derive(Args)]
struct ScanArgs {
    #[arg(
        required = true,
        value_name = "MODEL",
        value_parser = parse_model,
        help = &format!("Model descriptors, outermost first (kinds: {})", registry::MODEL_NAMES.join(", "))
    )]
    /// Model descriptors, outermost first.
    models: Vec<Model>,

    #[arg(
        short = 'r',
        long = "region",
        value_name = "REGION",
        value_parser = parse_region,
        help = "Region descriptor (rect:AX,AX:X0:Y0:W:H, circle:AX,AX:CX:CY:R, interval:AX:LO:HI)"
    )]
    /// Regions constraining the scan.
    regions: Vec<Region>,

    #[arg(
        short = 'a',
        long = "alternate",
        value_name = "INDEX[:PERIOD]",
        help = "Reverse model INDEX on alternate passes (every PERIOD passes)"
    )]
    /// Alternating mutators.
    alternate: Vec<Alternate>,

    #[arg(
        long = "offset",
        value_name = "INDEX:OFFSET[:SEED]",
        help = "Jitter every coordinate of model INDEX by up to OFFSET, seeded by SEED"
    )]
    /// Random offset mutators.
    offset: Vec<Offset>,
}

impl ScanArgs {
    /// Every requested mutator with its target model index, alternating
    /// mutators first.
    fn mutators(&self) -> Vec<(usize, Mutator)> {
        self.alternate
            .iter()
            .map(Alternate::attach)
            .chain(self.offset.iter().map(Offset::attach))
            .collect()
    }
}

#[derive(Subcommand)]
/// Subcommands supported by the `scanpath` tool.
enum Commands {
    #[command(about = "Print the positions of a scan as CSV")]
    /// Print scan positions.
    Points {
        /// The scan to generate.
        #[command(flatten)]
        scan: ScanArgs,

        #[arg(short = 'n', long = "limit", help = "Stop after this many positions")]
        /// Maximum number of positions to print.
        limit: Option<usize>,

        #[arg(long = "indices", help = "Add an index column per axis")]
        /// Print per-axis indices.
        indices: bool,

        #[arg(short = 'o', long = "output", help = "Write to a file instead of stdout")]
        /// Optional output file path.
        output: Option<PathBuf>,
    },

    #[command(about = "Print the size, rank and dimensions of a scan")]
    /// Print scan shape.
    Shape {
        /// The scan to inspect.
        #[command(flatten)]
        scan: ScanArgs,
    },

    #[command(
        name = "list-models",
        about = "List supported model kinds and descriptors"
    )]
    /// List supported models.
    ListModels,
}

/// Exit with an error message on failure, optionally printing a success
/// message to stderr.
fn report_ok<E: Display>(result: Result<(), E>, ok_msg: Option<&str>) {
    match result {
        Ok(()) => {
            if let Some(msg) = ok_msg {
                eprintln!("{msg}");
            }
        }
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

/// Install the stderr logger. `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

/// Handle the `points` subcommand.
fn handle_points(
    scan: &ScanArgs,
    limit: Option<usize>,
    indices: bool,
    output: Option<&Path>,
) -> Result<()> {
    let generator = cmd::build(&scan.models, &scan.regions, &scan.mutators())?;
    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            cmd::write_points(&generator, &mut out, limit, indices)?;
        }
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            cmd::write_points(&generator, &mut out, limit, indices)?;
        }
    }
    Ok(())
}

/// Handle the `shape` subcommand.
fn handle_shape(scan: &ScanArgs) -> Result<()> {
    let generator = cmd::build(&scan.models, &scan.regions, &scan.mutators())?;
    cmd::write_shape(&generator, &mut io::stdout().lock())
}

/// Handle the `list-models` subcommand.
fn handle_list_models() -> Result<()> {
    cmd::write_models(&mut io::stdout().lock())
}

fn main() {
    let cli = Cli::parse();
    report_ok(init_logging(cli.v), None);

    match cli.command {
        Commands::Points {
            scan,
            limit,
            indices,
            output,
        } => {
            let written = output.as_deref().map(|p| format!("Wrote {}", p.display()));
            report_ok(
                handle_points(&scan, limit, indices, output.as_deref()),
                written.as_deref(),
            );
        }
        Commands::Shape { scan } => report_ok(handle_shape(&scan), None),
        Commands::ListModels => report_ok(handle_list_models(), None),
    }
}
