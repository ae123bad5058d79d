//! External `<name>_l_<i>.lmp` files that override single lumps.

use std::fs;
use std::path::Path;

use crate::buffer::{BspBuffer, Endianness};
use crate::error::{BspError, Result};
use crate::file::MAX_LUMPFILES;
use crate::lump::Lump;
use crate::lump_type::LumpType;

/// Bytes in front of the payload: offset, index, version, map revision.
pub const LUMP_FILE_HEADER_SIZE: usize = 16;

/// A parsed lump file: one replacement lump plus the revision it was
/// exported at.
pub struct LumpFile {
    pub lump: Lump,
    pub map_rev: i32,
}

impl LumpFile {
    pub fn load(path: &Path, order: Endianness, bsp_version: i32) -> Result<LumpFile> {
        Self::from_bytes(fs::read(path)?, order, bsp_version)
    }

    pub fn from_bytes(data: Vec<u8>, order: Endianness, bsp_version: i32) -> Result<LumpFile> {
        if data.len() < LUMP_FILE_HEADER_SIZE {
            return Err(BspError::MalformedLump("lump file header truncated"));
        }

        let mut bb = BspBuffer::new(data, order);
        let ofs = bb.get_i32()?;
        let index = bb.get_i32()?;
        let version = bb.get_i32()?;
        let map_rev = bb.get_i32()?;

        if index < 0 || index as usize >= MAX_LUMPFILES {
            return Err(BspError::MalformedLump("lump file index out of range"));
        }
        if ofs < 0 || (ofs as usize) < LUMP_FILE_HEADER_SIZE || ofs as usize > bb.capacity() {
            return Err(BspError::MalformedLump("lump file payload offset out of range"));
        }

        let len = bb.capacity() - ofs as usize;
        let payload = bb.slice(ofs as usize, len)?.into_bytes();

        let mut lump = Lump::new(index as usize, LumpType::get(index as usize, bsp_version));
        lump.set_buffer(payload);
        lump.set_offset(ofs);
        lump.set_version(version);

        Ok(LumpFile { lump, map_rev })
    }
}
