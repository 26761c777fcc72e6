//! Command‑line entry point for the `hilbrick` tool.
//!
//! Builds a 3D Hilbert curve volume, writes PNG slices of it, and packs it
//! into an LDraw brick model. Also exposes the raw index ↔ coordinate
//! mapping.

use std::{fmt::Display, io, path::PathBuf, process};

use anyhow::Result;
use clap::{Parser, Subcommand};
use hilbrick::{
    hilbert::MAX_DIMENSIONS,
    volume::{Axis, SliceRange},
};
use tracing_subscriber::EnvFilter;

/// CLI command implementations.
mod cmd;
/// PNG slice output.
mod slices;

use crate::{
    cmd::{BuildOptions, LdrawOptions},
    slices::SliceOptions,
};

#[derive(Parser)]
#[command(name = "hilbrick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Top‑level CLI options and subcommands.
struct Cli {
    /// Sets the level of verbosity (`-v`, `-vv`, ...).
    #[arg(short, action = clap::ArgAction::Count, global = true, help = "Sets the level of verbosity")]
    v: u8,

    /// Command to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Axis to slice along when writing PNG files.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum SliceAxis {
    /// Slice across the first axis.
    X,
    /// Slice across the vertical axis.
    Y,
    /// Slice across the third axis.
    Z,
}

impl From<SliceAxis> for Axis {
    fn from(axis: SliceAxis) -> Self {
        match axis {
            SliceAxis::X => Self::X,
            SliceAxis::Y => Self::Y,
            SliceAxis::Z => Self::Z,
        }
    }
}

/// Curve and scaling options for the `build` subcommand.
#[derive(clap::Args)]
struct CurveArgs {
    #[arg(
        short = 'd',
        long = "dimension",
        default_value_t = 8,
        help = "Hilbert dimension per axis (power of two)"
    )]
    /// Curve side length (points per axis).
    dimension: u32,

    #[arg(
        short = 's',
        long = "target-size",
        default_value_t = 800,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Target max size used to compute scale"
    )]
    /// Size the scaled volume should fit in.
    target_size: u32,

    #[arg(
        short = 'y',
        long = "scale-y",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Scale factor for Y axis (default keeps Y unscaled)"
    )]
    /// Y scale factor.
    scale_y: u32,
}

/// PNG slice options for the `build` subcommand.
#[derive(clap::Args)]
struct SliceArgs {
    #[arg(
        short = 'o',
        long = "output-dir",
        default_value = "output",
        help = "Directory for PNG slices"
    )]
    /// Output directory.
    output_dir: PathBuf,

    #[arg(
        short = 'p',
        long = "prefix",
        default_value = "hilbert",
        help = "Output filename prefix"
    )]
    /// File name prefix.
    prefix: String,

    #[arg(
        short = 'a',
        long = "axis",
        value_enum,
        default_value = "y",
        help = "Axis to slice when saving PNG files"
    )]
    /// Slicing axis.
    axis: SliceAxis,

    #[arg(short = 'g', long = "grid", overrides_with = "no_grid", help = "Overlay grid planes (default)")]
    /// Explicitly enable the grid overlay.
    grid: bool,

    #[arg(short = 'G', long = "no-grid", overrides_with = "grid", help = "Do not overlay grid planes")]
    /// Disable the grid overlay.
    no_grid: bool,

    #[arg(short = 'i', long = "invert", overrides_with = "no_invert", help = "Invert output slices (default)")]
    /// Explicitly enable inversion.
    invert: bool,

    #[arg(short = 'I', long = "no-invert", overrides_with = "invert", help = "Do not invert output slices")]
    /// Disable inversion.
    no_invert: bool,

    #[arg(
        short = 'n',
        long = "normalize",
        overrides_with = "no_normalize",
        help = "Normalize slices before saving (default)"
    )]
    /// Explicitly enable normalization.
    normalize: bool,

    #[arg(
        short = 'N',
        long = "no-normalize",
        overrides_with = "normalize",
        help = "Save slices without normalization"
    )]
    /// Disable normalization.
    no_normalize: bool,

    #[arg(
        short = 'b',
        long = "slice-start",
        default_value_t = 1,
        help = "First slice index to save"
    )]
    /// First slice written.
    slice_start: usize,

    #[arg(
        short = 'e',
        long = "slice-end",
        help = "Slice index to stop before; defaults to past the last slice (negative offsets from the end are not accepted)"
    )]
    /// Exclusive end slice.
    slice_end: Option<usize>,

    #[arg(long = "write-pngs", overrides_with = "no_pngs", help = "Write PNG slices (default)")]
    /// Explicitly enable PNG output.
    write_pngs: bool,

    #[arg(long = "no-pngs", overrides_with = "write_pngs", help = "Disable PNG output")]
    /// Disable PNG output.
    no_pngs: bool,
}

/// LDraw model options for the `build` subcommand.
#[derive(clap::Args)]
struct LdrawArgs {
    #[arg(short = 'l', long = "ldr-output", help = "Write LDraw output to this file")]
    /// Model output path.
    ldr_output: Option<PathBuf>,

    #[arg(long = "ldr-color", default_value_t = 15, help = "LDraw color index")]
    /// Colour index for every brick.
    ldr_color: u32,

    #[arg(
        long = "ldr-threshold",
        default_value_t = 0.5,
        help = "Threshold for voxel occupancy"
    )]
    /// Occupancy threshold.
    ldr_threshold: f32,

    #[arg(
        long = "ldr-scale",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Override scale for LDraw output"
    )]
    /// X/Z scale override.
    ldr_scale: Option<u32>,

    #[arg(
        long = "ldr-scale-y",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Override Y scale for LDraw output"
    )]
    /// Y scale override.
    ldr_scale_y: Option<u32>,
}

#[derive(Subcommand)]
/// Subcommands supported by the `hilbrick` tool.
enum Commands {
    #[command(about = "Generate PNG slices and an optional LDraw model of a 3D Hilbert curve")]
    /// Build the curve volume and write outputs.
    Build {
        /// Curve and scale options.
        #[command(flatten)]
        curve: CurveArgs,
        /// PNG slice options.
        #[command(flatten)]
        slices: SliceArgs,
        /// LDraw options.
        #[command(flatten)]
        ldraw: LdrawArgs,
    },

    #[command(about = "Print the coordinate of a curve index")]
    /// Map an index to a coordinate.
    Point {
        #[arg(help = "Curve index")]
        /// Curve index.
        index: u64,

        #[arg(
            short = 'n',
            long = "dimensions",
            default_value_t = 3,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DIMENSIONS)),
            help = "Number of dimensions"
        )]
        /// Number of dimensions.
        dimensions: u32,
    },

    #[command(about = "Print the curve index of a coordinate")]
    /// Map a coordinate to an index.
    Index {
        #[arg(required = true, num_args = 1.., help = "Coordinate components")]
        /// Coordinate components, one per dimension.
        coords: Vec<u64>,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Exit with an error message if `result` failed.
fn exit_on_error<E: Display>(result: Result<(), E>) {
    if let Err(e) = result {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

/// Handle the `build` subcommand.
fn handle_build(curve: &CurveArgs, slice_args: SliceArgs, ldraw: LdrawArgs) -> Result<()> {
    // Each pair overrides the other, so at most one flag of a pair is set.
    let write_pngs = slice_args.write_pngs || !slice_args.no_pngs;
    let slices = write_pngs.then(|| SliceOptions {
        output_dir: slice_args.output_dir,
        axis: slice_args.axis.into(),
        range: SliceRange {
            start: slice_args.slice_start,
            end: slice_args.slice_end,
        },
        grid: slice_args.grid || !slice_args.no_grid,
        invert: slice_args.invert || !slice_args.no_invert,
        normalize: slice_args.normalize || !slice_args.no_normalize,
    });
    let ldraw = ldraw.ldr_output.map(|output| LdrawOptions {
        output,
        color: ldraw.ldr_color,
        threshold: ldraw.ldr_threshold,
        scale: ldraw.ldr_scale,
        scale_y: ldraw.ldr_scale_y,
    });

    let report = cmd::build(&BuildOptions {
        dimension: curve.dimension,
        target_size: curve.target_size,
        scale_y: curve.scale_y,
        prefix: slice_args.prefix,
        slices,
        ldraw,
    })?;

    println!(
        "Scale {}: wrote {} slice(s){}",
        report.scale,
        report.slices,
        report
            .bricks
            .map(|n| format!(" and {n} brick(s)"))
            .unwrap_or_default()
    );
    Ok(())
}

/// Handle the `point` subcommand.
fn handle_point(index: u64, dimensions: u32) -> Result<()> {
    let point = cmd::point(index, dimensions)?;
    let parts: Vec<String> = point.iter().map(u64::to_string).collect();
    println!("{}", parts.join(" "));
    Ok(())
}

/// Handle the `index` subcommand.
fn handle_index(coords: &[u64]) -> Result<()> {
    println!("{}", cmd::index(coords)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.v);

    match cli.command {
        Commands::Build {
            curve,
            slices,
            ldraw,
        } => exit_on_error(handle_build(&curve, slices, ldraw)),
        Commands::Point { index, dimensions } => exit_on_error(handle_point(index, dimensions)),
        Commands::Index { coords } => exit_on_error(handle_index(&coords)),
    }
}
