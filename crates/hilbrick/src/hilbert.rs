//! Hilbert curve mapping between linear indices and N‑dimensional coordinates.
//!
//! The index is read as a sequence of base `2^n` digits, most significant
//! first. Each digit selects one of the `2^n` sub-cubes at its recursion
//! level. The sub-cube is found by Gray-coding the digit and rotating that
//! code onto the axis the current cube is travelling along, then reflecting
//! it into the cube's entry corner. The entry and exit corners of the chosen
//! sub-cube become the frame for the next level, which is what keeps
//! consecutive points adjacent.
//!
//! The top-level frame always starts at the origin and takes its first step
//! along the first coordinate axis, regardless of the number of levels, so a
//! curve over a cube of side `2^k` is a prefix of the curve over side
//! `2^(k+1)`.

use smallvec::SmallVec;

use crate::{
    error::{self, Error},
    ops,
    point::Point,
};

/// Largest supported number of dimensions. Keeps every per-level digit and
/// its rotation inside a `u64`.
pub const MAX_DIMENSIONS: u32 = 32;

/// Entry and exit corners of the hypercube at one recursion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    /// Corner where the curve enters the cube.
    start: u64,
    /// Corner where the curve leaves the cube.
    end: u64,
}

impl Frame {
    /// Frame for the outermost cube of a curve with `levels` recursion levels.
    fn initial(levels: u32, dimension: u32) -> Self {
        let exponent = (-i64::from(levels) - 1).rem_euclid(i64::from(dimension));
        Self {
            start: 0,
            end: 1 << exponent,
        }
    }

    /// Single axis bit along which the curve leaves the entry corner.
    fn travel_bit(self) -> u64 {
        let bit = self.start ^ self.end;
        debug_assert!(bit.is_power_of_two(), "frame corners must differ in one bit");
        bit
    }

    /// Map a raw digit to the corner of the sub-cube it selects.
    fn travel(self, mask: u64, digit: u64) -> u64 {
        let modulus = mask + 1;
        let encoded = ops::graycode(digit) * (self.travel_bit() * 2);
        let rotated = (encoded | (encoded / modulus)) & mask;
        rotated ^ self.start
    }

    /// Inverse of [`Frame::travel`]: recover the raw digit for a corner.
    fn untravel(self, mask: u64, corner: u64) -> u64 {
        let modulus = mask + 1;
        let rotated = (corner ^ self.start) * (modulus / (self.travel_bit() * 2));
        ops::igraycode((rotated | (rotated / modulus)) & mask)
    }

    /// Frame of the sub-cube selected by `digit`.
    fn child(self, mask: u64, digit: u64) -> Self {
        let start_digit = digit.saturating_sub(1) & !1;
        let end_digit = mask.min((digit + 1) | 1);
        Self {
            start: self.travel(mask, start_digit),
            end: self.travel(mask, end_digit),
        }
    }
}

/// Bitmask covering one digit of a curve in `dimension` dimensions.
#[inline]
fn digit_mask(dimension: u32) -> u64 {
    (1u64 << dimension) - 1
}

/// Reject dimension counts the mapping cannot represent.
fn check_dimension(dimension: u32) -> error::Result<()> {
    if dimension == 0 {
        return Err(Error::Shape("dimension must be >= 1".to_string()));
    }
    if dimension > MAX_DIMENSIONS {
        return Err(Error::Shape(format!(
            "dimension must be <= {MAX_DIMENSIONS}, got {dimension}"
        )));
    }
    Ok(())
}

/// Forward mapping for a dimension that has already been checked.
fn map_point(dimension: u32, index: u64) -> Point {
    let mask = digit_mask(dimension);
    let digits = ops::unpack_digits(index, dimension);
    let mut frame = Frame::initial(digits.len() as u32, dimension);
    let mut corners: SmallVec<[u64; 8]> = SmallVec::with_capacity(digits.len());
    for &digit in &digits {
        corners.push(frame.travel(mask, digit));
        frame = frame.child(mask, digit);
    }
    Point(ops::bit_transpose(dimension, &corners))
}

/// Inverse mapping for a non-empty coordinate with a checked dimension.
///
/// Returns `None` when the index does not fit in a `u64`.
fn map_index(coords: &[u64]) -> Option<u64> {
    let dimension = coords.len() as u32;
    let mask = digit_mask(dimension);
    let biggest = coords.iter().copied().max().unwrap_or(0);
    let corners = ops::bit_transpose(ops::bit_length(biggest), coords);
    let mut frame = Frame::initial(corners.len() as u32, dimension);
    let mut digits: SmallVec<[u64; 8]> = SmallVec::with_capacity(corners.len());
    for &corner in &corners {
        let digit = frame.untravel(mask, corner);
        digits.push(digit);
        frame = frame.child(mask, digit);
    }
    ops::pack_digits(&digits, dimension)
}

/// Compute the coordinate of curve position `index` in `dimension`
/// dimensions.
///
/// Index `0` is the origin and index `1` is one step along the first axis.
pub fn index_to_coordinate(index: u64, dimension: u32) -> error::Result<Point> {
    check_dimension(dimension)?;
    Ok(map_point(dimension, index))
}

/// Compute the curve position of a coordinate. The number of components
/// sets the dimension.
pub fn coordinate_to_index(coords: &[u64]) -> error::Result<u64> {
    if coords.is_empty() {
        return Err(Error::Coordinate(
            "coordinate must have at least one component".to_string(),
        ));
    }
    check_dimension(coords.len() as u32)?;
    map_index(coords).ok_or_else(|| {
        Error::Overflow(format!("index of coordinate {coords:?} exceeds 64 bits"))
    })
}

/// A Hilbert curve filling a hypercube of side `2^order`.
#[derive(Debug, Clone, Copy)]
pub struct Hilbert {
    /// The order of the curve. The side of the cube is `2^order`.
    pub order: u32,
    /// The number of dimensions of the curve.
    pub dimension: u32,
    /// Total number of points (`2^(order * dimension)`).
    length: u64,
}

impl Hilbert {
    /// Construct a curve to precisely fit a hypercube with a defined number of
    /// dimensions and a set size in each dimension. The size must be a power
    /// of two (`size == 2^order`) or the result is an error.
    pub fn from_dimensions(dimension: u32, size: u64) -> error::Result<Self> {
        check_dimension(dimension)?;
        if !size.is_power_of_two() {
            return Err(Error::Size(format!(
                "size must be a power of two, got {size}"
            )));
        }
        let order = size.trailing_zeros();
        let bits = order * dimension;
        if bits >= u64::BITS {
            return Err(Error::Overflow(format!(
                "{dimension}D curve of size {size} has more than 2^63 points"
            )));
        }
        Ok(Self {
            order,
            dimension,
            length: 1 << bits,
        })
    }

    /// Number of points on the curve.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Number of dimensions of the cube.
    pub fn dimensions(&self) -> u32 {
        self.dimension
    }

    /// Side length of the cube.
    pub fn side(&self) -> u64 {
        1 << self.order
    }

    /// Coordinate of curve position `index`.
    pub fn point(&self, index: u64) -> Point {
        debug_assert!(index < self.length, "index out of bounds");
        map_point(self.dimension, index % self.length)
    }

    /// Curve position of `p`, which must lie inside the cube.
    pub fn index(&self, p: &Point) -> error::Result<u64> {
        if p.dimension() != self.dimension {
            return Err(Error::Coordinate(format!(
                "expected {} components, got {}",
                self.dimension,
                p.dimension()
            )));
        }
        let side = self.side();
        if let Some(c) = p.iter().find(|&&c| c >= side) {
            return Err(Error::Coordinate(format!(
                "component {c} outside cube of side {side}"
            )));
        }
        coordinate_to_index(p)
    }

    /// Iterate over every point of the curve in order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.length).map(|index| map_point(self.dimension, index))
    }
}
