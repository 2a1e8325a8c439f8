use std::io;
use thiserror::Error;

use super::icontype::OSType;

/// Errors produced while encoding or decoding ICNS data.
#[derive(Debug, Error)]
pub enum IcnsError {
    /// The source image cannot be encoded at all (e.g. it has no pixels, or
    /// its buffer does not match its declared dimensions).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The larger side of the source image is below the smallest supported
    /// icon resolution.
    #[error("image is too small ({width}x{height}); the larger side must be \
             at least {minimum} pixels")]
    ImageTooSmall {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
        /// Smallest supported icon resolution.
        minimum: u32,
    },

    /// The data does not begin with the `icns` magic literal.
    #[error("not an icns file (wrong magic literal {0:?})")]
    InvalidMagic([u8; 4]),

    /// A declared length runs past the end of the available data.
    #[error("truncated data: {needed} byte(s) needed at offset {offset}, \
             only {available} available")]
    Truncated {
        /// Offset of the read that failed.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left before the end of the data.
        available: usize,
    },

    /// A declared length is smaller than the header it belongs to.
    #[error("invalid length {length} for '{ostype}'")]
    InvalidLength {
        /// The container magic or element OSType carrying the length.
        ostype: OSType,
        /// The declared length.
        length: u32,
    },

    /// An element type with no known layout was found.
    #[error("unrecognized element '{ostype}' at offset {offset}")]
    UnrecognizedElement {
        /// The unknown OSType.
        ostype: OSType,
        /// Offset of the element header.
        offset: usize,
    },

    /// The container holds no image elements.
    #[error("the icns data contains no supported images")]
    NoImagesFound,

    /// The embedded raster codec failed on one element.
    #[error("failed to code '{ostype}' image: {source}")]
    Codec {
        /// OSType of the element being encoded or decoded.
        ostype: OSType,
        /// The codec's own error.
        #[source]
        source: io::Error,
    },

    /// The output sink rejected the encoded bytes.
    #[error("failed to write icns data: {0}")]
    Write(#[source] io::Error),

    /// The input source could not be read.
    #[error("failed to read icns data: {0}")]
    Read(#[source] io::Error),
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, IcnsError>;

impl IcnsError {
    pub(crate) fn codec(ostype: OSType, source: io::Error) -> IcnsError {
        IcnsError::Codec { ostype, source }
    }
}
