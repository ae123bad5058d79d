//! Parses the models lump from a bsp file

use na::Vector3;

use crate::buffer::{slice_to_i32, slice_to_vec3, Endianness};
use crate::error::{BspError, Result};

const MODEL_SIZE: usize = (4 * 3 * 3) + (4 * 3);

/// One model record: the worldspawn geometry (index 0) or a brush entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DModel {
    pub mins: Vector3<f32>,
    pub maxs: Vector3<f32>,
    pub origin: Vector3<f32>,
    pub head_node: i32,
    pub fst_face: i32,
    pub num_face: i32,
}

pub fn from_data(data: &[u8], order: Endianness) -> Result<Box<[DModel]>> {
    if data.len() % MODEL_SIZE != 0 {
        return Err(BspError::MalformedLump("models lump length"));
    }
    let length = data.len() / MODEL_SIZE;

    let mut models = Vec::with_capacity(length);
    for n in 0..length {
        let raw = &data[n * MODEL_SIZE..(n + 1) * MODEL_SIZE];
        models.push(DModel {
            mins: slice_to_vec3(&raw[0..12], order),
            maxs: slice_to_vec3(&raw[12..24], order),
            origin: slice_to_vec3(&raw[24..36], order),
            head_node: slice_to_i32(&raw[36..40], order),
            fst_face: slice_to_i32(&raw[40..44], order),
            num_face: slice_to_i32(&raw[44..48], order),
        });
    }

    Ok(models.into_boxed_slice())
}

#[test]
fn models_parse() {
    let mut buf = Vec::new();
    for f in [-16.0f32, -16.0, -16.0, 16.0, 16.0, 16.0, 0.0, 0.0, 0.0] {
        buf.extend_from_slice(&f.to_le_bytes());
    }
    for v in [0i32, 0, 12] {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    let models = from_data(&buf, Endianness::Little).unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].head_node, 0);
    assert_eq!(models[0].num_face, 12);
    assert_eq!(models[0].maxs, Vector3::new(16.0, 16.0, 16.0));
}
