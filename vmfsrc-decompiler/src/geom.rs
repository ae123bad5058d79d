//! Helper functions over nalgebra vectors

use na::{Rotation3, Vector3};

/// A point is usable when none of its components are NaN or infinite.
pub fn is_valid(v: &Vector3<f32>) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Snap every component to the nearest multiple of `grid`.
pub fn snap(v: &Vector3<f32>, grid: f32) -> Vector3<f32> {
    v.map(|c| (c / grid).round() * grid)
}

/// Rotate by euler angles in degrees, applied around the x, then y, then z
/// axis, the way the engine applies entity angles.
pub fn rotate_euler(v: &Vector3<f32>, angles: &Vector3<f32>) -> Vector3<f32> {
    let mut out = *v;
    if angles.x != 0.0 {
        out = Rotation3::from_axis_angle(&Vector3::x_axis(), angles.x.to_radians()) * out;
    }
    if angles.y != 0.0 {
        out = Rotation3::from_axis_angle(&Vector3::y_axis(), angles.y.to_radians()) * out;
    }
    if angles.z != 0.0 {
        out = Rotation3::from_axis_angle(&Vector3::z_axis(), angles.z.to_radians()) * out;
    }
    out
}
