//! Parses the planes lump from a bsp file

use na::Vector3;

use crate::buffer::{slice_to_f32, slice_to_i32, slice_to_vec3, Endianness};
use crate::error::{BspError, Result};

/// The size of one plane record.
const PLANE_SIZE: usize = (4 * 3) + 4 + 4;

/// A splitting plane. Points with `normal · p < dist` lie behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct DPlane {
    pub normal: Vector3<f32>,
    pub dist: f32,
    pub axis_type: i32,
}

impl DPlane {
    /// The same plane facing the other way.
    pub fn flipped(&self) -> DPlane {
        DPlane {
            normal: -self.normal,
            dist: -self.dist,
            axis_type: self.axis_type,
        }
    }

    /// Signed distance of a point from the plane.
    pub fn distance(&self, point: &Vector3<f32>) -> f32 {
        self.normal.dot(point) - self.dist
    }
}

pub fn from_data(data: &[u8], order: Endianness) -> Result<Box<[DPlane]>> {
    if data.len() % PLANE_SIZE != 0 {
        return Err(BspError::MalformedLump("planes lump length"));
    }
    let length = data.len() / PLANE_SIZE;

    let mut planes = Vec::with_capacity(length);
    for n in 0..length {
        let raw = &data[n * PLANE_SIZE..(n + 1) * PLANE_SIZE];
        planes.push(DPlane {
            normal: slice_to_vec3(&raw[0..12], order),
            dist: slice_to_f32(&raw[12..16], order),
            axis_type: slice_to_i32(&raw[16..20], order),
        });
    }

    Ok(planes.into_boxed_slice())
}

#[test]
fn planes_parse_and_flip() {
    let mut buf = Vec::new();
    for f in [1.0f32, 0.0, 0.0, 64.0] {
        buf.extend_from_slice(&f.to_le_bytes());
    }
    buf.extend_from_slice(&0i32.to_le_bytes());

    let planes = from_data(&buf, Endianness::Little).unwrap();
    assert_eq!(planes.len(), 1);
    assert_eq!(planes[0].normal, Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(planes[0].dist, 64.0);

    let flip = planes[0].flipped();
    assert_eq!(flip.normal, Vector3::new(-1.0, 0.0, 0.0));
    assert_eq!(flip.dist, -64.0);

    assert_eq!(planes[0].distance(&Vector3::new(70.0, 5.0, 5.0)), 6.0);
}

#[test]
fn ragged_lump_is_invalid() {
    assert!(from_data(&[0u8; 21], Endianness::Little).is_err());
}
