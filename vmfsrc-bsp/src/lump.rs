//! Lump and game-lump records.

use std::path::PathBuf;

use log::debug;

use crate::error::Result;
use crate::lump_type::LumpType;
use crate::lzma;

/// One slot of the outer lump directory.
///
/// The buffer holds the raw payload, which may still be LZMA-enveloped; a
/// lump counts as compressed exactly when its buffer starts with the
/// envelope magic.
#[derive(Debug, Clone)]
pub struct Lump {
    index: usize,
    ltype: LumpType,
    buf: Vec<u8>,
    offset: i32,
    version: i32,
    four_cc: i32,
    parent_file: Option<PathBuf>,
}

impl Lump {
    pub fn new(index: usize, ltype: LumpType) -> Self {
        Lump {
            index,
            ltype,
            buf: Vec::new(),
            offset: 0,
            version: 0,
            four_cc: 0,
            parent_file: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn lump_type(&self) -> LumpType {
        self.ltype
    }

    /// Name used in diagnostics, e.g. `GameLump#35`.
    pub fn name(&self) -> String {
        format!("{:?}#{}", self.ltype, self.index)
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    pub fn set_buffer(&mut self, buf: Vec<u8>) {
        self.buf = buf;
    }

    pub fn length(&self) -> i32 {
        self.buf.len() as i32
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// Uncompressed size when the payload is enveloped, 0 otherwise.
    pub fn four_cc(&self) -> i32 {
        self.four_cc
    }

    pub fn set_four_cc(&mut self, four_cc: i32) {
        self.four_cc = four_cc;
    }

    /// The file the payload came from, when overridden by a sibling file.
    pub fn parent_file(&self) -> Option<&PathBuf> {
        self.parent_file.as_ref()
    }

    pub fn set_parent_file(&mut self, path: Option<PathBuf>) {
        self.parent_file = path;
    }

    pub fn is_compressed(&self) -> bool {
        lzma::is_compressed(&self.buf)
    }

    pub fn compress(&mut self) -> Result<()> {
        if self.is_compressed() {
            return Ok(());
        }
        let packed = lzma::compress(&self.buf)?;
        debug!(
            "Compressed {}: {} -> {} bytes",
            self.name(),
            self.buf.len(),
            packed.len()
        );
        self.four_cc = self.buf.len() as i32;
        self.buf = packed;
        Ok(())
    }

    pub fn uncompress(&mut self) -> Result<()> {
        if !self.is_compressed() {
            return Ok(());
        }
        self.buf = lzma::uncompress(&self.buf)?;
        self.four_cc = 0;
        Ok(())
    }
}

/// One entry of the secondary directory embedded in the game lump.
#[derive(Debug, Clone, Default)]
pub struct GameLump {
    four_cc: i32,
    flags: i32,
    version: i32,
    offset: i32,
    buf: Vec<u8>,
}

impl GameLump {
    pub fn new(four_cc: i32) -> Self {
        GameLump {
            four_cc,
            ..Default::default()
        }
    }

    pub fn four_cc(&self) -> i32 {
        self.four_cc
    }

    /// The four-character code as text; dummy entries get a placeholder.
    pub fn name(&self) -> String {
        let name = crate::file::unmake_id(self.four_cc);
        if name.trim_matches(|c: char| c.is_whitespace() || c == '\0').is_empty() {
            "<dummy>".to_string()
        } else {
            name
        }
    }

    pub fn flags(&self) -> i32 {
        self.flags
    }

    pub fn set_flags(&mut self, flags: i32) {
        self.flags = flags;
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// Offset relative to the start of the containing lump.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    pub fn set_buffer(&mut self, buf: Vec<u8>) {
        self.buf = buf;
    }

    pub fn length(&self) -> i32 {
        self.buf.len() as i32
    }

    pub fn is_compressed(&self) -> bool {
        lzma::is_compressed(&self.buf)
    }

    pub fn compress(&mut self) -> Result<()> {
        if self.is_compressed() {
            return Ok(());
        }
        self.buf = lzma::compress(&self.buf)?;
        self.flags |= 1;
        Ok(())
    }

    pub fn uncompress(&mut self) -> Result<()> {
        if !self.is_compressed() {
            return Ok(());
        }
        self.buf = lzma::uncompress(&self.buf)?;
        self.flags &= !1;
        Ok(())
    }
}
