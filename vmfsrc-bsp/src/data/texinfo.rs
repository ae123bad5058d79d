//! Parses the texinfo lump from a bsp file

use na::Vector4;

use crate::buffer::{slice_to_f32, slice_to_i32, Endianness};
use crate::error::{BspError, Result};

const TEXINFO_SIZE: usize = (4 * 4 * 2) * 2 + 4 + 4;

/// Texture projection for a face: two texel axes and two lightmap axes,
/// each as (x, y, z, shift).
#[derive(Debug, Clone, PartialEq)]
pub struct DTexInfo {
    pub texture_vecs: [Vector4<f32>; 2],
    pub lightmap_vecs: [Vector4<f32>; 2],
    pub flags: i32,
    pub texdata: i32,
}

fn slice_to_vec4(slice: &[u8], order: Endianness) -> Vector4<f32> {
    Vector4::new(
        slice_to_f32(&slice[0..4], order),
        slice_to_f32(&slice[4..8], order),
        slice_to_f32(&slice[8..12], order),
        slice_to_f32(&slice[12..16], order),
    )
}

pub fn from_data(data: &[u8], order: Endianness) -> Result<Box<[DTexInfo]>> {
    if data.len() % TEXINFO_SIZE != 0 {
        return Err(BspError::MalformedLump("texinfo lump length"));
    }
    let length = data.len() / TEXINFO_SIZE;

    let mut texinfos = Vec::with_capacity(length);
    for n in 0..length {
        let raw = &data[n * TEXINFO_SIZE..(n + 1) * TEXINFO_SIZE];
        texinfos.push(DTexInfo {
            texture_vecs: [slice_to_vec4(&raw[0..16], order), slice_to_vec4(&raw[16..32], order)],
            lightmap_vecs: [
                slice_to_vec4(&raw[32..48], order),
                slice_to_vec4(&raw[48..64], order),
            ],
            flags: slice_to_i32(&raw[64..68], order),
            texdata: slice_to_i32(&raw[68..72], order),
        });
    }

    Ok(texinfos.into_boxed_slice())
}

#[test]
fn texinfo_parses() {
    let mut buf = Vec::new();
    for i in 0..16 {
        buf.extend_from_slice(&(i as f32).to_le_bytes());
    }
    buf.extend_from_slice(&0x1000i32.to_le_bytes());
    buf.extend_from_slice(&5i32.to_le_bytes());

    let infos = from_data(&buf, Endianness::Little).unwrap();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].texture_vecs[0], Vector4::new(0.0, 1.0, 2.0, 3.0));
    assert_eq!(infos[0].texture_vecs[1], Vector4::new(4.0, 5.0, 6.0, 7.0));
    assert_eq!(infos[0].flags, 0x1000);
    assert_eq!(infos[0].texdata, 5);
}
