//! Reading and writing Source engine BSP containers.
//!
//! A BSP file is a directory of typed, length-prefixed lumps, with a
//! secondary game-lump directory embedded in one of them. This crate parses
//! and emits that container across its dialects (endianness variants,
//! reordered descriptors, widened fields, XOR ciphering, per-lump LZMA
//! compression, sibling-file overlays) and exposes the lump tables as typed
//! slices through [data::BspReader].

pub mod app;
pub mod buffer;
pub mod data;
pub mod error;
pub mod file;
pub mod lump;
pub mod lump_file;
pub mod lump_type;
pub mod lzma;
pub mod xor;

pub use error::{BspError, Result};
pub use file::BspFile;
pub use lump_type::LumpType;
