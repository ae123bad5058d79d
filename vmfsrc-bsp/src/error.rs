//! Error types

use thiserror::Error;

/// An error encountered while reading or writing a BSP file.
#[derive(Debug, Error)]
pub enum BspError {
    #[error("Invalid or missing header")]
    InvalidHeader,

    #[error("Loaded file is a zip archive")]
    ZipArchive,

    #[error("The GoldSrc format is not supported")]
    GoldSrcFormat,

    #[error("Unknown file ident: {0} ({1})")]
    UnknownIdent(i32, String),

    #[error("Read of {len} bytes at {pos} is past the end of the buffer ({cap} bytes)")]
    OutOfBounds { pos: usize, len: usize, cap: usize },

    #[error("Malformed lump data: {0}")]
    MalformedLump(&'static str),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Standard result type.
pub type Result<T> = std::result::Result<T, BspError>;
