//! PNG output for volume slices.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use hilbrick::volume::{Axis, SliceRange, Volume};
use image::{GrayImage, Luma};
use ndarray::ArrayView2;
use tracing::debug;

/// Where and how slices are written.
#[derive(Clone, Debug)]
pub struct SliceOptions {
    /// Directory receiving the PNG files.
    pub output_dir: PathBuf,
    /// Axis to slice along.
    pub axis: Axis,
    /// Which slices to write.
    pub range: SliceRange,
    /// Overlay grid planes before slicing.
    pub grid: bool,
    /// Write `1 - v` instead of `v`.
    pub invert: bool,
    /// Stretch each slice's value range to the full 0–255 span.
    pub normalize: bool,
}

/// Convert one slice to an 8-bit grayscale image.
///
/// Rows of the slice become image rows and columns become image columns.
pub fn slice_to_image(slice: ArrayView2<'_, f32>, invert: bool, normalize: bool) -> GrayImage {
    let values = if invert {
        slice.mapv(|v| 1.0 - v)
    } else {
        slice.to_owned()
    };
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let (rows, cols) = values.dim();

    GrayImage::from_fn(cols as u32, rows as u32, |col, row| {
        let v = values[[row as usize, col as usize]];
        let unit = match normalize {
            true if max > min => (v - min) / (max - min),
            true => 0.0,
            false => v,
        };
        Luma([(unit * 255.0).clamp(0.0, 255.0) as u8])
    })
}

/// File path for slice `index`.
fn slice_path(dir: &Path, stem: &str, index: usize) -> PathBuf {
    dir.join(format!("{stem}-{index:03}.png"))
}

/// Write the selected slices of `volume` as `<stem>-NNN.png` files.
///
/// Returns the number of files written.
pub fn write_slices(volume: &Volume, options: &SliceOptions, stem: &str) -> Result<usize> {
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "could not create output directory {}",
            options.output_dir.display()
        )
    })?;

    let slices: Vec<_> = volume.slices(options.axis, options.range).collect();
    let mut pb = pbr::ProgressBar::new(slices.len() as u64);
    pb.format("╢▌▌░╟");

    for (index, slice) in &slices {
        let path = slice_path(&options.output_dir, stem, *index);
        slice_to_image(slice.view(), options.invert, options.normalize)
            .save(&path)
            .with_context(|| format!("could not write {}", path.display()))?;
        debug!(path = %path.display(), "wrote slice");
        pb.inc();
    }

    pb.finish();
    Ok(slices.len())
}
