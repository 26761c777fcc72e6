//! Command handlers for the `hilbrick` CLI.
//!
//! These functions implement the top‑level subcommands and write the resulting
//! images and models to disk.

use std::path::PathBuf;

use anyhow::{Result, bail};
use hilbrick::{bricks, coordinate_to_index, index_to_coordinate, ldraw, point::Point, volume};
use tracing::info;

use crate::slices::{self, SliceOptions};

/// LDraw model output settings.
#[derive(Clone, Debug)]
pub struct LdrawOptions {
    /// Model file path.
    pub output: PathBuf,
    /// LDraw colour index for every brick.
    pub color: u32,
    /// Voxels at or above this value are filled with bricks.
    pub threshold: f32,
    /// X/Z scale override; defaults to the slice scale.
    pub scale: Option<u32>,
    /// Y scale override; defaults to the slice Y scale.
    pub scale_y: Option<u32>,
}

/// Parameters for the `build` subcommand.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Curve side length (points per axis).
    pub dimension: u32,
    /// Target size used to pick the X/Z scale.
    pub target_size: u32,
    /// Y scale factor.
    pub scale_y: u32,
    /// File name prefix; the dimension is appended.
    pub prefix: String,
    /// PNG slice output, when enabled.
    pub slices: Option<SliceOptions>,
    /// LDraw output, when requested.
    pub ldraw: Option<LdrawOptions>,
}

/// Outcome of a build.
#[derive(Debug)]
pub struct BuildReport {
    /// X/Z scale chosen from the target size.
    pub scale: u32,
    /// Number of PNG slices written.
    pub slices: usize,
    /// Number of bricks written to the model, if one was requested.
    pub bricks: Option<usize>,
}

/// Reject invalid parameters before doing any work.
pub fn validate(options: &BuildOptions) -> Result<()> {
    if !options.dimension.is_power_of_two() {
        bail!(
            "dimension must be a power of two, got {}",
            options.dimension
        );
    }
    if options.target_size < 1 {
        bail!("target-size must be at least 1");
    }
    if options.scale_y < 1 {
        bail!("scale-y must be at least 1");
    }
    if let Some(ldr) = &options.ldraw {
        if ldr.scale.is_some_and(|s| s < 1) {
            bail!("ldr-scale must be at least 1");
        }
        if ldr.scale_y.is_some_and(|s| s < 1) {
            bail!("ldr-scale-y must be at least 1");
        }
    }
    Ok(())
}

/// Build the curve volume and write the requested slices and model.
pub fn build(options: &BuildOptions) -> Result<BuildReport> {
    validate(options)?;

    let base = volume::build(options.dimension)?;
    let scale = volume::compute_scale(options.dimension, options.target_size);
    let stem = format!("{}{}", options.prefix, options.dimension);
    info!(
        dimension = options.dimension,
        scale,
        scale_y = options.scale_y,
        "built curve volume"
    );

    let mut written = 0;
    if let Some(slice_opts) = &options.slices {
        let mut png_volume = base.scaled(scale as usize, options.scale_y as usize)?;
        if slice_opts.grid {
            png_volume.apply_grid_overlay(scale as usize * 2 + 4)?;
        }
        written = slices::write_slices(&png_volume, slice_opts, &stem)?;
        info!(
            count = written,
            dir = %slice_opts.output_dir.display(),
            "wrote slices"
        );
    }

    let mut brick_count = None;
    if let Some(ldr) = &options.ldraw {
        let ldr_scale = ldr.scale.unwrap_or(scale);
        let ldr_scale_y = ldr.scale_y.unwrap_or(options.scale_y);
        let ldr_volume = base.scaled(ldr_scale as usize, ldr_scale_y as usize)?;
        let placements = bricks::pack(&ldr_volume, ldr.threshold);
        ldraw::save_ldraw(&ldr.output, &placements, ldr.color, &stem)?;
        info!(
            bricks = placements.len(),
            path = %ldr.output.display(),
            "wrote model"
        );
        brick_count = Some(placements.len());
    }

    Ok(BuildReport {
        scale,
        slices: written,
        bricks: brick_count,
    })
}

/// Coordinate of curve position `index` in `dimension` dimensions.
pub fn point(index: u64, dimension: u32) -> Result<Point> {
    Ok(index_to_coordinate(index, dimension)?)
}

/// Curve position of a coordinate.
pub fn index(coords: &[u64]) -> Result<u64> {
    Ok(coordinate_to_index(coords)?)
}
