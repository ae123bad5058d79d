#![allow(dead_code)]

//! Builds minimal BSP containers in memory for the loader tests.

pub const HEADER_SIZE: usize = 1036;
pub const LUMP_COUNT: usize = 64;

/// Four ASCII chars packed the way the engine packs idents, first char in
/// the lowest byte.
pub fn fourcc(s: &[u8; 4]) -> i32 {
    i32::from_le_bytes(*s)
}

/// Assembles a generic 64-lump container with gapless payloads.
pub struct FileBuilder {
    version: i32,
    map_rev: i32,
    little_endian: bool,
    l4d2_order: bool,
    payloads: Vec<Vec<u8>>,
    lump_versions: Vec<i32>,
}

impl FileBuilder {
    pub fn new(version: i32) -> Self {
        FileBuilder {
            version,
            map_rev: 1,
            little_endian: true,
            l4d2_order: false,
            payloads: vec![Vec::new(); LUMP_COUNT],
            lump_versions: vec![0; LUMP_COUNT],
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.little_endian = false;
        self
    }

    /// Write descriptors in the Left 4 Dead 2 field order.
    pub fn l4d2_order(mut self) -> Self {
        self.l4d2_order = true;
        self
    }

    pub fn map_rev(mut self, rev: i32) -> Self {
        self.map_rev = rev;
        self
    }

    pub fn lump(mut self, index: usize, payload: &[u8]) -> Self {
        self.payloads[index] = payload.to_vec();
        self
    }

    pub fn lump_version(mut self, index: usize, version: i32) -> Self {
        self.lump_versions[index] = version;
        self
    }

    fn w32(&self, out: &mut [u8], pos: usize, v: i32) {
        let bytes = if self.little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        };
        out[pos..pos + 4].copy_from_slice(&bytes);
    }

    /// The offset the lump at `index` will land at.
    pub fn offset_of(&self, index: usize) -> i32 {
        let mut next = HEADER_SIZE as i32;
        for i in 0..index {
            next += self.payloads[i].len() as i32;
        }
        next
    }

    pub fn build(&self) -> Vec<u8> {
        let total: usize = HEADER_SIZE + self.payloads.iter().map(Vec::len).sum::<usize>();
        let mut out = vec![0u8; total];

        out[0..4].copy_from_slice(if self.little_endian { b"VBSP" } else { b"PSBV" });
        self.w32(&mut out, 4, self.version);

        let mut next = HEADER_SIZE as i32;
        for i in 0..LUMP_COUNT {
            let base = 8 + i * 16;
            let len = self.payloads[i].len() as i32;
            let ofs = if len == 0 { 0 } else { next };

            if self.l4d2_order {
                self.w32(&mut out, base, self.lump_versions[i]);
                self.w32(&mut out, base + 4, ofs);
                self.w32(&mut out, base + 8, len);
            } else {
                self.w32(&mut out, base, ofs);
                self.w32(&mut out, base + 4, len);
                self.w32(&mut out, base + 8, self.lump_versions[i]);
            }
            self.w32(&mut out, base + 12, 0);

            if len > 0 {
                out[next as usize..next as usize + len as usize]
                    .copy_from_slice(&self.payloads[i]);
                next += len;
            }
        }

        self.w32(&mut out, 1032, self.map_rev);

        out
    }
}

/// A generic game-lump directory descriptor, absolute offsets.
pub fn game_lump_descriptor(four_cc: i32, flags: u16, version: u16, ofs: i32, len: i32) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    out.extend_from_slice(&four_cc.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(&ofs.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out
}

/// A widened Vindictus game-lump directory descriptor.
pub fn game_lump_descriptor_vin(
    four_cc: i32,
    flags: i32,
    version: i32,
    ofs: i32,
    len: i32,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(20);
    out.extend_from_slice(&four_cc.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(&ofs.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out
}
