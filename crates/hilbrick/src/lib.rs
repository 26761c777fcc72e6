//! Hilbert curve voxel paths and greedy brick tiling.
//!
//! The crate maps linear indices to coordinates on an N‑dimensional Hilbert
//! curve, walks a 3D curve into a connected voxel path, and covers voxel
//! volumes with a small catalog of LDraw bricks.
//!
//! # Pipeline
//!
//! - [`volume::build`] turns a curve of side `d` into a voxel volume.
//! - [`volume::Volume::scaled`] zooms the volume to printable size.
//! - [`bricks::pack`] tiles the occupied voxels with bricks.
//! - [`ldraw::save_ldraw`] writes the placements as an LDraw model.

/// Brick catalog and the greedy packer.
pub mod bricks;
/// Error types used across the crate.
pub mod error;
/// Index ↔ coordinate mapping on the Hilbert curve.
pub mod hilbert;
/// LDraw serialization of brick placements.
pub mod ldraw;
/// Internal bit operations shared by the curve implementation.
#[doc(hidden)]
pub mod ops;
/// N‑dimensional points and helpers.
pub mod point;
/// Voxel volumes and the curve volume builder.
pub mod volume;

pub use crate::hilbert::{Hilbert, coordinate_to_index, index_to_coordinate};
