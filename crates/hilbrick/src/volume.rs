//! Dense voxel volumes and the builder that walks a 3D Hilbert curve into one.

use std::ops::Range;

use ndarray::{Array3, ArrayView2, Axis as NdAxis, s};
use tracing::debug;

use crate::{
    error::{self, Error},
    hilbert::Hilbert,
};

/// Value written to voxels on the curve path.
pub const FILLED: f32 = 1.0;
/// Value written to voxels on grid overlay planes.
pub const GRID: f32 = 0.5;

/// One of the three volume axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// First index of the volume.
    X,
    /// Second index of the volume, the vertical axis.
    Y,
    /// Third index of the volume.
    Z,
}

impl Axis {
    /// Matching `ndarray` axis.
    fn nd(self) -> NdAxis {
        match self {
            Self::X => NdAxis(0),
            Self::Y => NdAxis(1),
            Self::Z => NdAxis(2),
        }
    }
}

/// Slice indices to visit along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceRange {
    /// First slice to visit.
    pub start: usize,
    /// Exclusive end; `None` runs through the last slice.
    pub end: Option<usize>,
}

impl SliceRange {
    /// Clamp the range to an axis with `len` slices.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let end = self.end.unwrap_or(len).min(len);
        self.start.min(end)..end
    }
}

/// Check that a grid of `shape` can be addressed and allocated.
fn checked_shape(shape: (usize, usize, usize)) -> error::Result<(usize, usize, usize)> {
    let (x, y, z) = shape;
    let bytes = x
        .checked_mul(y)
        .and_then(|n| n.checked_mul(z))
        .and_then(|n| n.checked_mul(size_of::<f32>()))
        .filter(|&n| n <= isize::MAX as usize);
    match bytes {
        Some(_) => Ok(shape),
        None => Err(Error::Size(format!(
            "volume of {x}x{y}x{z} voxels is too large"
        ))),
    }
}

/// A dense grid of occupancy values indexed `[x, y, z]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Backing storage.
    data: Array3<f32>,
}

impl Volume {
    /// An empty volume of the given `(x, y, z)` shape.
    pub fn zeros(shape: (usize, usize, usize)) -> Self {
        Self {
            data: Array3::zeros(shape),
        }
    }

    /// Wrap an existing array.
    pub fn from_array(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// Shape as `(x, y, z)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Value at a voxel, or `None` outside the volume.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        self.data.get([x, y, z]).copied()
    }

    /// Borrow the backing array.
    pub fn as_array(&self) -> &Array3<f32> {
        &self.data
    }

    /// Boolean grid of voxels whose value is at least `threshold`.
    pub fn occupancy(&self, threshold: f32) -> Array3<bool> {
        self.data.mapv(|v| v >= threshold)
    }

    /// Number of voxels whose value is at least `threshold`.
    pub fn occupied_count(&self, threshold: f32) -> usize {
        self.data.iter().filter(|&&v| v >= threshold).count()
    }

    /// Nearest-neighbor zoom: every voxel becomes a block of
    /// `scale × scale_y × scale` voxels.
    ///
    /// Output cell `i` reads source cell `i / scale`, which can differ by one
    /// cell from a centre-aligned zoom such as `scipy.ndimage.zoom(order=0)`.
    pub fn scaled(&self, scale: usize, scale_y: usize) -> error::Result<Self> {
        if scale == 0 || scale_y == 0 {
            return Err(Error::Size(format!(
                "scale factors must be >= 1, got {scale} and {scale_y}"
            )));
        }
        let (x, y, z) = self.shape();
        let too_large = || Error::Size(format!("scaling {x}x{y}x{z} by {scale} overflows"));
        let shape = checked_shape((
            x.checked_mul(scale).ok_or_else(too_large)?,
            y.checked_mul(scale_y).ok_or_else(too_large)?,
            z.checked_mul(scale).ok_or_else(too_large)?,
        ))?;
        let data = Array3::from_shape_fn(shape, |(i, j, k)| {
            self.data[[i / scale, j / scale_y, k / scale]]
        });
        Ok(Self { data })
    }

    /// Mark the planes `x = k * step` and `z = k * step` with [`GRID`] for
    /// every `k` in `1..min(x, z) / step`.
    pub fn apply_grid_overlay(&mut self, step: usize) -> error::Result<()> {
        if step == 0 {
            return Err(Error::Size("grid step must be >= 1".to_string()));
        }
        let (x, _, z) = self.shape();
        let count = x.min(z) / step;
        for plane in (1..count).map(|k| k * step) {
            self.data.slice_mut(s![plane, .., ..]).fill(GRID);
            self.data.slice_mut(s![.., .., plane]).fill(GRID);
        }
        Ok(())
    }

    /// Iterate 2D slices along `axis`. Each view keeps the two remaining
    /// axes in `x, y, z` order.
    pub fn slices(
        &self,
        axis: Axis,
        range: SliceRange,
    ) -> impl Iterator<Item = (usize, ArrayView2<'_, f32>)> + '_ {
        let span = range.resolve(self.data.len_of(axis.nd()));
        span.map(move |index| (index, self.data.index_axis(axis.nd(), index)))
    }
}

/// Walk a 3D Hilbert curve with side `dimension` into a volume.
///
/// Curve points land on odd cells of a cube of side `2 * dimension + 1`, and
/// the cell between each pair of consecutive points is filled too, so the
/// path is 6-connected. `dimension` must be a power of two.
pub fn build(dimension: u32) -> error::Result<Volume> {
    let curve = Hilbert::from_dimensions(3, u64::from(dimension))?;
    let side = 2 * dimension as usize + 1;
    let mut volume = Volume::zeros(checked_shape((side, side, side))?);

    let mut last: Option<[usize; 3]> = None;
    for point in curve.points() {
        let cell = [
            2 * point[0] as usize + 1,
            2 * point[1] as usize + 1,
            2 * point[2] as usize + 1,
        ];
        volume.data[cell] = FILLED;
        if let Some(prev) = last {
            let mid = [
                (prev[0] + cell[0]) / 2,
                (prev[1] + cell[1]) / 2,
                (prev[2] + cell[2]) / 2,
            ];
            volume.data[mid] = FILLED;
        }
        last = Some(cell);
    }

    debug!(
        dimension,
        side,
        voxels = volume.occupied_count(FILLED),
        "built hilbert volume"
    );
    Ok(volume)
}

/// Largest power-of-two scale that fits a volume of `dimension` into
/// `target_size` voxels per side, counting a one-voxel margin on each side.
/// Never less than one.
pub fn compute_scale(dimension: u32, target_size: u32) -> u32 {
    let span = 2 * u64::from(dimension) + 2;
    let target = u64::from(target_size);
    let mut scale = 1u64;
    while scale * 2 * span <= target {
        scale *= 2;
    }
    scale as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Occupied cells as coordinates.
    fn occupied(volume: &Volume) -> Vec<[usize; 3]> {
        volume
            .as_array()
            .indexed_iter()
            .filter(|(_, v)| **v >= FILLED)
            .map(|((x, y, z), _)| [x, y, z])
            .collect()
    }

    #[test]
    fn single_cell_volume() -> error::Result<()> {
        let v = build(1)?;
        assert_eq!(v.shape(), (3, 3, 3));
        assert_eq!(occupied(&v), vec![[1, 1, 1]]);
        Ok(())
    }

    #[test]
    fn path_is_connected() -> error::Result<()> {
        for dimension in [2, 4, 8] {
            let v = build(dimension)?;
            let side = 2 * dimension as usize + 1;
            assert_eq!(v.shape(), (side, side, side));
            let points = dimension.pow(3) as usize;
            assert_eq!(v.occupied_count(FILLED), 2 * points - 1);
            // Border rows on the low side stay empty.
            assert!(occupied(&v).iter().all(|c| c.iter().all(|&i| i >= 1)));
        }
        Ok(())
    }

    #[test]
    fn first_cells_follow_curve() -> error::Result<()> {
        let v = build(2)?;
        assert_eq!(v.get(1, 1, 1), Some(FILLED));
        assert_eq!(v.get(2, 1, 1), Some(FILLED));
        assert_eq!(v.get(3, 1, 1), Some(FILLED));
        assert_eq!(v.get(0, 0, 0), Some(0.0));
        assert_eq!(v.get(5, 0, 0), None);
        Ok(())
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(build(0), Err(Error::Size(_))));
        assert!(matches!(build(3), Err(Error::Size(_))));
        assert!(matches!(build(6), Err(Error::Size(_))));
    }

    #[test]
    fn rejects_unallocatable_volumes() {
        assert!(matches!(build(1 << 21), Err(Error::Size(_))));
        assert!(matches!(build(1 << 20), Err(Error::Size(_))));

        let v = Volume::zeros((3, 3, 3));
        let huge = u32::MAX as usize;
        assert!(matches!(v.scaled(huge, 1), Err(Error::Size(_))));
        assert!(matches!(v.scaled(huge, huge), Err(Error::Size(_))));
        assert!(matches!(v.scaled(usize::MAX, 1), Err(Error::Size(_))));
    }

    #[test]
    fn scale_for_target() {
        assert_eq!(compute_scale(8, 800), 32);
        assert_eq!(compute_scale(8, 18), 1);
        assert_eq!(compute_scale(8, 36), 2);
        assert_eq!(compute_scale(8, 35), 1);
        assert_eq!(compute_scale(4, 1), 1);
        assert_eq!(compute_scale(1, 4), 1);
        assert_eq!(compute_scale(1, 8), 2);
    }

    #[test]
    fn scaling_replicates_blocks() -> error::Result<()> {
        let mut data = Array3::zeros((2, 1, 1));
        data[[1, 0, 0]] = 1.0;
        let v = Volume::from_array(data).scaled(2, 3)?;
        assert_eq!(v.shape(), (4, 3, 2));
        for y in 0..3 {
            for z in 0..2 {
                assert_eq!(v.get(0, y, z), Some(0.0));
                assert_eq!(v.get(1, y, z), Some(0.0));
                assert_eq!(v.get(2, y, z), Some(1.0));
                assert_eq!(v.get(3, y, z), Some(1.0));
            }
        }
        assert!(v.scaled(0, 1).is_err());
        assert!(v.scaled(1, 0).is_err());
        Ok(())
    }

    #[test]
    fn grid_overlay_planes() -> error::Result<()> {
        let mut v = Volume::zeros((10, 2, 7));
        v.apply_grid_overlay(3)?;
        // min(10, 7) / 3 == 2, so only the k == 1 planes are drawn.
        for y in 0..2 {
            for z in 0..7 {
                assert_eq!(v.get(3, y, z), Some(GRID));
            }
            for x in 0..10 {
                assert_eq!(v.get(x, y, 3), Some(GRID));
            }
        }
        assert_eq!(v.get(6, 0, 0), Some(0.0));
        assert_eq!(v.get(0, 0, 6), Some(0.0));
        assert!(v.apply_grid_overlay(0).is_err());
        Ok(())
    }

    #[test]
    fn slice_ranges() {
        let all = SliceRange::default();
        assert_eq!(all.resolve(5), 0..5);
        let tail = SliceRange {
            start: 1,
            end: None,
        };
        assert_eq!(tail.resolve(5), 1..5);
        let clamped = SliceRange {
            start: 2,
            end: Some(9),
        };
        assert_eq!(clamped.resolve(5), 2..5);
        let empty = SliceRange {
            start: 7,
            end: None,
        };
        assert!(empty.resolve(5).is_empty());
    }

    #[test]
    fn slices_keep_remaining_axes() {
        let v = Volume::zeros((2, 3, 4));
        let ys: Vec<_> = v.slices(Axis::Y, SliceRange::default()).collect();
        assert_eq!(ys.len(), 3);
        assert_eq!(ys[0].1.dim(), (2, 4));
        let xs: Vec<_> = v
            .slices(
                Axis::X,
                SliceRange {
                    start: 1,
                    end: None,
                },
            )
            .map(|(i, view)| (i, view.dim()))
            .collect();
        assert_eq!(xs, vec![(1, (3, 4))]);
        let zs = v.slices(Axis::Z, SliceRange::default()).count();
        assert_eq!(zs, 4);
    }
}
