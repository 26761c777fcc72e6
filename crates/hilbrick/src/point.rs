//! Lightweight N‑dimensional point type used by the curve.

use std::{ops::Deref, vec::Vec};

use smallvec::SmallVec;

/// Compact N‑dimensional coordinate tuple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point(pub SmallVec<[u64; 8]>);

impl Point {
    /// Create a new `Point` from a backing vector.
    pub fn new(vec: impl Into<SmallVec<[u64; 8]>>) -> Self {
        Self(vec.into())
    }

    /// Sum of absolute per-axis differences between two points.
    ///
    /// Preconditions: both points must have the same dimensionality. In debug
    /// builds a mismatch triggers a `debug_assert!`; in release builds the
    /// distance covers the shared prefix of dimensions.
    pub fn manhattan(&self, other: &Self) -> u64 {
        debug_assert!(
            self.len() == other.len(),
            "Point::manhattan called with differing dimensions: {} vs {}",
            self.len(),
            other.len()
        );
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.abs_diff(*b))
            .sum()
    }

    /// Return the point's coordinates as a slice.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Dimensionality of the point.
    pub fn dimension(&self) -> u32 {
        self.0.len() as u32
    }
}

impl From<Point> for Vec<u64> {
    fn from(val: Point) -> Self {
        val.0.to_vec()
    }
}

impl From<&[u64]> for Point {
    fn from(val: &[u64]) -> Self {
        Self(SmallVec::from_slice(val))
    }
}

impl Deref for Point {
    type Target = [u64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
