//! Greedy tiling of an occupancy grid with a small catalog of bricks.
//!
//! Packing runs in two phases over one coverage mask:
//!
//! 1. Vertical posts. Every free cell whose two upper neighbours are free
//!    too gets a three-layer post, scanning `y`, then `z`, then `x`.
//! 2. Flat tiling. Each layer is scanned `z` then `x`, and every free cell
//!    anchors the first of 3×1, 1×3, 2×1, 1×2 that fits over free cells,
//!    falling back to a single-cell brick.
//!
//! The scan order decides ties and the order of the returned placements.

use ndarray::Array3;
use tracing::{debug, trace};

use crate::volume::Volume;

/// Width and depth of one grid cell in LDraw units.
pub const CELL_LDU: i64 = 40;
/// Height of one brick layer in LDraw units.
pub const LAYER_LDU: i64 = 24;

/// An entry in the brick catalog. Sizes are in grid cells; one cell spans
/// two studs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    /// LDraw part file name.
    pub id: &'static str,
    /// Cells along `x` when unrotated.
    pub width: usize,
    /// Cells along `z` when unrotated.
    pub depth: usize,
    /// Layers along `y`.
    pub height: usize,
}

/// 2×2 brick.
pub const BRICK_2X2: Part = Part {
    id: "3003.dat",
    width: 1,
    depth: 1,
    height: 1,
};
/// 2×4 brick.
pub const BRICK_2X4: Part = Part {
    id: "3001.dat",
    width: 2,
    depth: 1,
    height: 1,
};
/// 2×6 brick.
pub const BRICK_2X6: Part = Part {
    id: "2456.dat",
    width: 3,
    depth: 1,
    height: 1,
};
/// 2×2×3 brick used for vertical posts.
pub const BRICK_2X2X3: Part = Part {
    id: "30145.dat",
    width: 1,
    depth: 1,
    height: 3,
};

/// Every part the packer can emit.
pub const CATALOG: [Part; 4] = [BRICK_2X2, BRICK_2X4, BRICK_2X6, BRICK_2X2X3];

/// Flat placements in the order they are tried.
const FLAT_CHOICES: [(Part, Rotation); 4] = [
    (BRICK_2X6, Rotation::Identity),
    (BRICK_2X6, Rotation::Quarter),
    (BRICK_2X4, Rotation::Identity),
    (BRICK_2X4, Rotation::Quarter),
];

/// Orientation of a placed brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Unrotated.
    Identity,
    /// 90° about the vertical axis.
    Quarter,
}

impl Rotation {
    /// Row-major 3×3 rotation matrix.
    pub fn matrix(self) -> [i32; 9] {
        match self {
            Self::Identity => [1, 0, 0, 0, 1, 0, 0, 0, 1],
            Self::Quarter => [0, 0, 1, 0, 1, 0, -1, 0, 0],
        }
    }

    /// Cells covered along `(x, z)` by `part` in this orientation.
    pub fn footprint(self, part: Part) -> (usize, usize) {
        match self {
            Self::Identity => (part.width, part.depth),
            Self::Quarter => (part.depth, part.width),
        }
    }
}

/// A brick placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickPlacement {
    /// The catalog part.
    pub part: Part,
    /// Lowest-index cell covered, as `[x, y, z]`.
    pub anchor: [usize; 3],
    /// Orientation about the vertical axis.
    pub rotation: Rotation,
}

impl BrickPlacement {
    /// Cells covered along `(x, z)`.
    pub fn footprint(&self) -> (usize, usize) {
        self.rotation.footprint(self.part)
    }

    /// Centre of the brick in LDraw units.
    pub fn position(&self) -> [i64; 3] {
        let (width, depth) = self.footprint();
        let [x, y, z] = self.anchor.map(|c| c as i64);
        [
            x * CELL_LDU + (width as i64 * CELL_LDU) / 2,
            y * LAYER_LDU + (self.part.height as i64 * LAYER_LDU) / 2,
            z * CELL_LDU + (depth as i64 * CELL_LDU) / 2,
        ]
    }

    /// Every grid cell the brick occupies.
    pub fn cells(&self) -> impl Iterator<Item = [usize; 3]> + use<> {
        let (width, depth) = self.footprint();
        let [x, y, z] = self.anchor;
        let height = self.part.height;
        (0..height).flat_map(move |dy| {
            (0..depth).flat_map(move |dz| (0..width).map(move |dx| [x + dx, y + dy, z + dz]))
        })
    }
}

/// State for one packing run. The coverage mask never outlives it.
struct Packer<'a> {
    /// Cells that must be covered.
    occupied: &'a Array3<bool>,
    /// Cells already claimed by a placement.
    covered: Array3<bool>,
    /// Placements in emission order.
    placements: Vec<BrickPlacement>,
}

impl<'a> Packer<'a> {
    /// Start a run over `occupied` with nothing covered.
    fn new(occupied: &'a Array3<bool>) -> Self {
        Self {
            occupied,
            covered: Array3::from_elem(occupied.dim(), false),
            placements: Vec::new(),
        }
    }

    /// Whether a cell is occupied and not yet covered.
    fn free(&self, cell: [usize; 3]) -> bool {
        self.occupied[cell] && !self.covered[cell]
    }

    /// Whether a flat footprint anchored at `anchor` stays inside the grid
    /// and over free cells only.
    fn fits(&self, anchor: [usize; 3], (width, depth): (usize, usize)) -> bool {
        let (size_x, _, size_z) = self.occupied.dim();
        let [x, y, z] = anchor;
        if x + width > size_x || z + depth > size_z {
            return false;
        }
        (0..depth).all(|dz| (0..width).all(|dx| self.free([x + dx, y, z + dz])))
    }

    /// Record a placement and cover its cells.
    fn place(&mut self, part: Part, anchor: [usize; 3], rotation: Rotation) {
        let placement = BrickPlacement {
            part,
            anchor,
            rotation,
        };
        for cell in placement.cells() {
            self.covered[cell] = true;
        }
        trace!(part = part.id, ?anchor, ?rotation, "placed brick");
        self.placements.push(placement);
    }

    /// Phase one: three-layer posts over vertical runs.
    fn posts(&mut self) {
        let (size_x, size_y, size_z) = self.occupied.dim();
        for y in 0..size_y.saturating_sub(2) {
            for z in 0..size_z {
                for x in 0..size_x {
                    if (0..3).all(|dy| self.free([x, y + dy, z])) {
                        self.place(BRICK_2X2X3, [x, y, z], Rotation::Identity);
                    }
                }
            }
        }
    }

    /// Phase two: flat tiling of whatever the posts left uncovered.
    fn layers(&mut self) {
        let (size_x, size_y, size_z) = self.occupied.dim();
        for y in 0..size_y {
            for z in 0..size_z {
                for x in 0..size_x {
                    let anchor = [x, y, z];
                    if !self.free(anchor) {
                        continue;
                    }
                    let (part, rotation) = FLAT_CHOICES
                        .into_iter()
                        .find(|&(part, rotation)| self.fits(anchor, rotation.footprint(part)))
                        .unwrap_or((BRICK_2X2, Rotation::Identity));
                    self.place(part, anchor, rotation);
                }
            }
        }
    }
}

/// Cover every occupied cell with non-overlapping bricks.
///
/// Posts come first, then flat bricks layer by layer, `z` then `x` within a
/// layer.
pub fn pack_occupancy(occupied: &Array3<bool>) -> Vec<BrickPlacement> {
    let mut packer = Packer::new(occupied);
    packer.posts();
    let posts = packer.placements.len();
    packer.layers();
    debug!(
        posts,
        flat = packer.placements.len() - posts,
        "packed occupancy grid"
    );
    packer.placements
}

/// Threshold `volume` (values `>= threshold` are occupied) and pack it.
pub fn pack(volume: &Volume, threshold: f32) -> Vec<BrickPlacement> {
    pack_occupancy(&volume.occupancy(threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error, volume};

    /// A fully occupied grid.
    fn solid(shape: (usize, usize, usize)) -> Array3<bool> {
        Array3::from_elem(shape, true)
    }

    /// `(part, position, rotation)` triples for compact comparisons.
    fn summary(placements: &[BrickPlacement]) -> Vec<(&'static str, [i64; 3], Rotation)> {
        placements
            .iter()
            .map(|p| (p.part.id, p.position(), p.rotation))
            .collect()
    }

    #[test]
    fn horizontal_strip_is_one_long_brick() {
        let placements = pack_occupancy(&solid((3, 1, 1)));
        assert_eq!(
            summary(&placements),
            vec![("2456.dat", [60, 12, 20], Rotation::Identity)]
        );
        assert_eq!(placements[0].anchor, [0, 0, 0]);
    }

    #[test]
    fn depth_strip_is_rotated() {
        let placements = pack_occupancy(&solid((1, 1, 3)));
        assert_eq!(
            summary(&placements),
            vec![("2456.dat", [20, 12, 60], Rotation::Quarter)]
        );
        assert_eq!(placements[0].footprint(), (1, 3));
    }

    #[test]
    fn vertical_column_is_one_post() {
        let placements = pack_occupancy(&solid((1, 3, 1)));
        assert_eq!(
            summary(&placements),
            vec![("30145.dat", [20, 36, 20], Rotation::Identity)]
        );
    }

    #[test]
    fn runs_of_four_leave_a_unit() {
        assert_eq!(
            summary(&pack_occupancy(&solid((4, 1, 1)))),
            vec![
                ("2456.dat", [60, 12, 20], Rotation::Identity),
                ("3003.dat", [140, 12, 20], Rotation::Identity),
            ]
        );
        assert_eq!(
            summary(&pack_occupancy(&solid((1, 5, 1)))),
            vec![
                ("30145.dat", [20, 36, 20], Rotation::Identity),
                ("3003.dat", [20, 84, 20], Rotation::Identity),
                ("3003.dat", [20, 108, 20], Rotation::Identity),
            ]
        );
    }

    #[test]
    fn square_prefers_wide_bricks() {
        assert_eq!(
            summary(&pack_occupancy(&solid((2, 1, 2)))),
            vec![
                ("3001.dat", [40, 12, 20], Rotation::Identity),
                ("3001.dat", [40, 12, 60], Rotation::Identity),
            ]
        );
    }

    #[test]
    fn empty_grid_packs_nothing() {
        assert!(pack_occupancy(&Array3::from_elem((4, 4, 4), false)).is_empty());
        assert!(pack_occupancy(&Array3::from_elem((0, 0, 0), false)).is_empty());
        let v = Volume::zeros((3, 3, 3));
        assert!(pack(&v, 0.5).is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut data = Array3::zeros((1, 1, 1));
        data[[0, 0, 0]] = 0.5;
        let v = Volume::from_array(data);
        assert_eq!(pack(&v, 0.5).len(), 1);
        assert!(pack(&v, 0.6).is_empty());
    }

    #[test]
    fn packs_small_curve() -> error::Result<()> {
        let v = volume::build(2)?;
        assert_eq!(
            summary(&pack(&v, 0.5)),
            vec![
                ("30145.dat", [60, 60, 140], Rotation::Identity),
                ("2456.dat", [100, 36, 60], Rotation::Identity),
                ("3001.dat", [140, 36, 120], Rotation::Quarter),
                ("3003.dat", [100, 36, 140], Rotation::Identity),
                ("2456.dat", [100, 84, 60], Rotation::Identity),
                ("3001.dat", [140, 84, 120], Rotation::Quarter),
                ("3003.dat", [100, 84, 140], Rotation::Identity),
            ]
        );
        Ok(())
    }

    #[test]
    fn placement_cells() {
        let p = BrickPlacement {
            part: BRICK_2X4,
            anchor: [1, 2, 3],
            rotation: Rotation::Quarter,
        };
        assert_eq!(p.cells().collect::<Vec<_>>(), vec![[1, 2, 3], [1, 2, 4]]);
        let post = BrickPlacement {
            part: BRICK_2X2X3,
            anchor: [0, 0, 0],
            rotation: Rotation::Identity,
        };
        assert_eq!(post.cells().count(), 3);
    }

    #[test]
    fn rotations() {
        assert_eq!(Rotation::Identity.footprint(BRICK_2X6), (3, 1));
        assert_eq!(Rotation::Quarter.footprint(BRICK_2X6), (1, 3));
        assert_eq!(Rotation::Quarter.matrix(), [0, 0, 1, 0, 1, 0, -1, 0, 0]);
    }
}
