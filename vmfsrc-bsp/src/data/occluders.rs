//! Parses the occlusion lump from a bsp file
//!
//! Unlike the array lumps this one is a small stream: a counted run of
//! occluder records, then their polygons, then the polygon vertex indices.

use na::Vector3;

use crate::buffer::{BspBuffer, Endianness};
use crate::error::Result;

/// One occluder volume.
#[derive(Debug, Clone, PartialEq)]
pub struct DOccluderData {
    pub flags: i32,
    pub fst_poly: i32,
    pub poly_count: i32,
    pub mins: Vector3<f32>,
    pub maxs: Vector3<f32>,
    pub area: i32,
}

/// One occluder polygon, a run of the occluder vertex-index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DOccluderPolyData {
    pub fst_vertex_index: i32,
    pub vertex_count: i32,
    pub plane_num: i32,
}

/// All three occluder tables, parsed out of the single occlusion lump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccluderLump {
    pub occluders: Box<[DOccluderData]>,
    pub polys: Box<[DOccluderPolyData]>,
    pub vertex_indices: Box<[i32]>,
}

fn get_vec3(r: &mut BspBuffer) -> Result<Vector3<f32>> {
    Ok(Vector3::new(r.get_f32()?, r.get_f32()?, r.get_f32()?))
}

/// Parse the occlusion lump. Lump version 0 predates the per-occluder area
/// field.
pub fn from_data(data: &[u8], order: Endianness, lump_version: i32) -> Result<OccluderLump> {
    if data.is_empty() {
        return Ok(OccluderLump::default());
    }

    let mut r = BspBuffer::new(data.to_vec(), order);

    let count = r.get_i32()?.max(0);
    let mut occluders = Vec::with_capacity(count as usize);
    for _ in 0..count {
        occluders.push(DOccluderData {
            flags: r.get_i32()?,
            fst_poly: r.get_i32()?,
            poly_count: r.get_i32()?,
            mins: get_vec3(&mut r)?,
            maxs: get_vec3(&mut r)?,
            area: if lump_version > 0 { r.get_i32()? } else { 0 },
        });
    }

    let poly_count = r.get_i32()?.max(0);
    let mut polys = Vec::with_capacity(poly_count as usize);
    for _ in 0..poly_count {
        polys.push(DOccluderPolyData {
            fst_vertex_index: r.get_i32()?,
            vertex_count: r.get_i32()?,
            plane_num: r.get_i32()?,
        });
    }

    let index_count = r.get_i32()?.max(0);
    let mut vertex_indices = Vec::with_capacity(index_count as usize);
    for _ in 0..index_count {
        vertex_indices.push(r.get_i32()?);
    }

    Ok(OccluderLump {
        occluders: occluders.into_boxed_slice(),
        polys: polys.into_boxed_slice(),
        vertex_indices: vertex_indices.into_boxed_slice(),
    })
}

#[test]
fn occlusion_stream_parses() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&1i32.to_le_bytes()); // occluder count
    for v in [0i32, 0, 1] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    for f in [-8.0f32, -8.0, -8.0, 8.0, 8.0, 8.0] {
        buf.extend_from_slice(&f.to_le_bytes());
    }
    buf.extend_from_slice(&3i32.to_le_bytes()); // area (v1)
    buf.extend_from_slice(&1i32.to_le_bytes()); // poly count
    for v in [0i32, 4, 7] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf.extend_from_slice(&4i32.to_le_bytes()); // index count
    for v in [0i32, 1, 2, 3] {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    let lump = from_data(&buf, Endianness::Little, 1).unwrap();
    assert_eq!(lump.occluders.len(), 1);
    assert_eq!(lump.occluders[0].poly_count, 1);
    assert_eq!(lump.occluders[0].area, 3);
    assert_eq!(lump.polys[0].vertex_count, 4);
    assert_eq!(lump.polys[0].plane_num, 7);
    assert_eq!(&lump.vertex_indices[..], &[0, 1, 2, 3]);
}

#[test]
fn empty_lump_is_empty() {
    let lump = from_data(&[], Endianness::Little, 1).unwrap();
    assert!(lump.occluders.is_empty());
}
