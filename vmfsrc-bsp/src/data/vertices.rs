//! Parses vertex-style lumps: plain arrays of 3D points.

use na::Vector3;

use crate::buffer::{slice_to_vec3, Endianness};
use crate::error::{BspError, Result};

const VERTEX_SIZE: usize = 4 * 3;

pub fn from_data(data: &[u8], order: Endianness) -> Result<Box<[Vector3<f32>]>> {
    if data.len() % VERTEX_SIZE != 0 {
        return Err(BspError::MalformedLump("vertex lump length"));
    }
    let length = data.len() / VERTEX_SIZE;

    let mut verts = Vec::with_capacity(length);
    for n in 0..length {
        verts.push(slice_to_vec3(&data[n * VERTEX_SIZE..(n + 1) * VERTEX_SIZE], order));
    }

    Ok(verts.into_boxed_slice())
}

#[test]
fn vertices_parse() {
    let mut buf = Vec::new();
    for f in [1.0f32, 2.0, 3.0, -4.0, -5.0, -6.0] {
        buf.extend_from_slice(&f.to_le_bytes());
    }

    let verts = from_data(&buf, Endianness::Little).unwrap();
    assert_eq!(verts.len(), 2);
    assert_eq!(verts[0], Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(verts[1], Vector3::new(-4.0, -5.0, -6.0));
}
