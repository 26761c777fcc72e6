//! Error types shared by the curve, volume and brick modules.

use std::io;

use thiserror::Error;

/// Errors raised when inputs fall outside what the crate can represent.
#[derive(Debug, Error)]
pub enum Error {
    /// The number of spatial dimensions is unsupported.
    #[error("invalid shape: {0}")]
    Shape(String),
    /// A side length or scale factor is unsupported.
    #[error("invalid size: {0}")]
    Size(String),
    /// A coordinate lies outside the curve or is malformed.
    #[error("invalid coordinate: {0}")]
    Coordinate(String),
    /// The result would not fit the index type.
    #[error("overflow: {0}")]
    Overflow(String),
    /// Writing serialized output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
