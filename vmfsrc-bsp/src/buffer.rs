//! Positioned, endian-aware reads and writes over the raw bytes of a BSP file.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use na::Vector3;

use crate::error::{BspError, Result};

/// Byte order of a BSP file, detected from its ident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Turn a slice into an i32 in the given byte order.
/// # Panics
/// If slice is not 4 bytes long.
pub fn slice_to_i32(slice: &[u8], order: Endianness) -> i32 {
    match order {
        Endianness::Little => LittleEndian::read_i32(slice),
        Endianness::Big => BigEndian::read_i32(slice),
    }
}

/// Turn a slice into a u32 in the given byte order.
/// # Panics
/// If slice is not 4 bytes long.
pub fn slice_to_u32(slice: &[u8], order: Endianness) -> u32 {
    match order {
        Endianness::Little => LittleEndian::read_u32(slice),
        Endianness::Big => BigEndian::read_u32(slice),
    }
}

/// Turn a slice into an i16 in the given byte order.
/// # Panics
/// If slice is not 2 bytes long.
pub fn slice_to_i16(slice: &[u8], order: Endianness) -> i16 {
    match order {
        Endianness::Little => LittleEndian::read_i16(slice),
        Endianness::Big => BigEndian::read_i16(slice),
    }
}

/// Turn a slice into a u16 in the given byte order.
/// # Panics
/// If slice is not 2 bytes long.
pub fn slice_to_u16(slice: &[u8], order: Endianness) -> u16 {
    match order {
        Endianness::Little => LittleEndian::read_u16(slice),
        Endianness::Big => BigEndian::read_u16(slice),
    }
}

/// Turn a slice into an f32 in the given byte order.
/// # Panics
/// If slice is not 4 bytes long.
pub fn slice_to_f32(slice: &[u8], order: Endianness) -> f32 {
    f32::from_bits(slice_to_u32(slice, order))
}

/// Turn a slice of three floats into a 3D vector.
/// # Panics
/// If slice isn't 12 bytes long.
pub fn slice_to_vec3(slice: &[u8], order: Endianness) -> Vector3<f32> {
    Vector3::new(
        slice_to_f32(&slice[0..4], order),
        slice_to_f32(&slice[4..8], order),
        slice_to_f32(&slice[8..12], order),
    )
}

/// An owned byte buffer with an endianness attribute and a read/write cursor.
///
/// Multi-byte accessors dispatch on the buffer's byte order; sub-slices
/// inherit it.
#[derive(Debug, Clone)]
pub struct BspBuffer {
    data: Vec<u8>,
    order: Endianness,
    pos: usize,
}

impl BspBuffer {
    pub fn new(data: Vec<u8>, order: Endianness) -> Self {
        BspBuffer { data, order, pos: 0 }
    }

    /// A zero-filled buffer of the given size, for the write path.
    pub fn zeroed(len: usize, order: Endianness) -> Self {
        BspBuffer {
            data: vec![0; len],
            order,
            pos: 0,
        }
    }

    pub fn order(&self) -> Endianness {
        self.order
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn check(&self, pos: usize, len: usize) -> Result<&[u8]> {
        if pos + len > self.data.len() {
            return Err(BspError::OutOfBounds {
                pos,
                len,
                cap: self.data.len(),
            });
        }
        Ok(&self.data[pos..pos + len])
    }

    pub fn i32_at(&self, pos: usize) -> Result<i32> {
        Ok(slice_to_i32(self.check(pos, 4)?, self.order))
    }

    pub fn u32_at(&self, pos: usize) -> Result<u32> {
        Ok(slice_to_u32(self.check(pos, 4)?, self.order))
    }

    pub fn get_i32(&mut self) -> Result<i32> {
        let v = self.i32_at(self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        let v = self.u32_at(self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub fn get_u16(&mut self) -> Result<u16> {
        let v = slice_to_u16(self.check(self.pos, 2)?, self.order);
        self.pos += 2;
        Ok(v)
    }

    pub fn get_i16(&mut self) -> Result<i16> {
        let v = slice_to_i16(self.check(self.pos, 2)?, self.order);
        self.pos += 2;
        Ok(v)
    }

    pub fn get_f32(&mut self) -> Result<f32> {
        let v = slice_to_f32(self.check(self.pos, 4)?, self.order);
        self.pos += 4;
        Ok(v)
    }

    pub fn get_bytes(&mut self, len: usize) -> Result<&[u8]> {
        self.check(self.pos, len)?;
        let s = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(s)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.check(self.pos, len)?;
        self.pos += len;
        Ok(())
    }

    /// Copy out a sub-range as a new buffer with the same byte order.
    pub fn slice(&self, ofs: usize, len: usize) -> Result<BspBuffer> {
        Ok(BspBuffer::new(self.check(ofs, len)?.to_vec(), self.order))
    }

    fn check_mut(&mut self, pos: usize, len: usize) -> Result<&mut [u8]> {
        if pos + len > self.data.len() {
            return Err(BspError::OutOfBounds {
                pos,
                len,
                cap: self.data.len(),
            });
        }
        Ok(&mut self.data[pos..pos + len])
    }

    pub fn put_i32(&mut self, v: i32) -> Result<()> {
        let order = self.order;
        let pos = self.pos;
        let out = self.check_mut(pos, 4)?;
        match order {
            Endianness::Little => LittleEndian::write_i32(out, v),
            Endianness::Big => BigEndian::write_i32(out, v),
        }
        self.pos += 4;
        Ok(())
    }

    pub fn put_u32(&mut self, v: u32) -> Result<()> {
        self.put_i32(v as i32)
    }

    pub fn put_u16(&mut self, v: u16) -> Result<()> {
        let order = self.order;
        let pos = self.pos;
        let out = self.check_mut(pos, 2)?;
        match order {
            Endianness::Little => LittleEndian::write_u16(out, v),
            Endianness::Big => BigEndian::write_u16(out, v),
        }
        self.pos += 2;
        Ok(())
    }

    pub fn i32_to(&mut self, pos: usize, v: i32) -> Result<()> {
        let order = self.order;
        let out = self.check_mut(pos, 4)?;
        match order {
            Endianness::Little => LittleEndian::write_i32(out, v),
            Endianness::Big => BigEndian::write_i32(out, v),
        }
        Ok(())
    }

    /// Write raw bytes at an absolute position without moving the cursor.
    pub fn bytes_to(&mut self, pos: usize, src: &[u8]) -> Result<()> {
        self.check_mut(pos, src.len())?.copy_from_slice(src);
        Ok(())
    }
}

/// Concatenate several byte strings into one owned vector.
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

#[test]
fn reads_follow_byte_order() {
    let raw = vec![0x01, 0x02, 0x03, 0x04];

    let mut le = BspBuffer::new(raw.clone(), Endianness::Little);
    assert_eq!(le.get_i32().unwrap(), 0x04030201);

    let mut be = BspBuffer::new(raw, Endianness::Big);
    assert_eq!(be.get_i32().unwrap(), 0x01020304);
}

#[test]
fn sequential_reads_advance() {
    let mut buf = BspBuffer::new(
        vec![0x10, 0x00, 0x20, 0x00, 0x30, 0x00, 0x00, 0x00],
        Endianness::Little,
    );

    assert_eq!(buf.get_u16().unwrap(), 0x10);
    assert_eq!(buf.get_u16().unwrap(), 0x20);
    assert_eq!(buf.get_i32().unwrap(), 0x30);
    assert_eq!(buf.position(), 8);
}

#[test]
fn out_of_bounds_read_is_an_error() {
    let mut buf = BspBuffer::new(vec![0x00, 0x01], Endianness::Little);
    assert!(matches!(
        buf.get_i32(),
        Err(BspError::OutOfBounds { cap: 2, .. })
    ));
}

#[test]
fn slices_inherit_byte_order() {
    let buf = BspBuffer::new(vec![0, 0, 0x01, 0x02, 0x03, 0x04], Endianness::Big);
    let mut sub = buf.slice(2, 4).unwrap();
    assert_eq!(sub.order(), Endianness::Big);
    assert_eq!(sub.get_i32().unwrap(), 0x01020304);
}

#[test]
fn positional_writes_leave_cursor_alone() {
    let mut buf = BspBuffer::zeroed(8, Endianness::Little);
    buf.put_i32(7).unwrap();
    buf.bytes_to(4, &[0xAA, 0xBB]).unwrap();
    assert_eq!(buf.position(), 4);
    assert_eq!(buf.bytes(), &[7, 0, 0, 0, 0xAA, 0xBB, 0, 0]);
}
