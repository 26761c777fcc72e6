//! Support operations for curve calculation.

use smallvec::{SmallVec, smallvec};

/// Convert a binary index to its Binary Reflected Gray Code (BRGC) form.
pub fn graycode(x: u64) -> u64 {
    x ^ (x >> 1)
}

/// Inverse Gray code: recover binary from a BRGC value `x`.
///
/// Folds the value onto itself with right shifts of 1, 2, 4, ... until the
/// shifted-out part is at most one bit wide.
pub fn igraycode(x: u64) -> u64 {
    let mut shift = 1u32;
    let mut b = x;
    loop {
        let div = b.checked_shr(shift).unwrap_or(0);
        b ^= div;
        if div <= 1 {
            return b;
        }
        shift <<= 1;
    }
}

/// Transpose a vector of n d-bit numbers into a vector of d n-bit numbers.
///
/// Bit `j` of source `k` becomes bit `n - k - 1` of output `d - j - 1`, so the
/// first source is the most significant bit of every output and the outputs
/// run from the highest source bit down to the lowest.
pub fn bit_transpose(d: u32, v: &[u64]) -> SmallVec<[u64; 8]> {
    let mut ret = smallvec![0; d as usize];
    for (off, x) in v.iter().enumerate() {
        for bit in 0..d.min(u64::BITS) {
            if x & (1 << bit) != 0 {
                ret[(d - bit - 1) as usize] |= 1 << (v.len() - off - 1);
            }
        }
    }
    ret
}

/// Number of bits needed to represent `x`, with a minimum of one.
#[inline]
pub fn bit_length(x: u64) -> u32 {
    (u64::BITS - x.leading_zeros()).max(1)
}

/// Split `index` into base `2^width` digits, most significant first.
///
/// The digit count is the minimum needed to represent `index`, and never
/// less than one.
pub fn unpack_digits(index: u64, width: u32) -> SmallVec<[u64; 8]> {
    let count = bit_length(index).div_ceil(width);
    let mask = (1u64 << width) - 1;
    (0..count)
        .rev()
        .map(|digit| index.checked_shr(digit * width).unwrap_or(0) & mask)
        .collect()
}

/// Join base `2^width` digits, most significant first, into a single value.
///
/// Returns `None` when the value does not fit in 64 bits.
pub fn pack_digits(digits: &[u64], width: u32) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &digit| {
        if acc.checked_shr(u64::BITS - width).unwrap_or(0) != 0 {
            return None;
        }
        Some(acc.checked_shl(width).unwrap_or(0) | digit)
    })
}
