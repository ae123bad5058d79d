//! Maps brush sides to the original faces they were compiled from.
//!
//! Brush sides don't reference faces directly, but both still carry the
//! plane they lie on. For each non-bevel side, the original faces on the
//! same plane are candidates; the one whose polygon contains the side's
//! center wins. The mapping recovers per-face data like smoothing groups.

use std::collections::HashMap;

use na::Vector3;

use vmfsrc_bsp::data::{BspData, DFace};

use crate::winding::WindingFactory;

const EPS_CONTAINS: f32 = 0.5;

pub struct SideFaceMapper {
    orig_faces: HashMap<usize, usize>,
}

impl SideFaceMapper {
    pub fn build(bsp: &BspData, factory: &mut WindingFactory) -> Self {
        let mut by_plane: HashMap<i32, Vec<usize>> = HashMap::new();
        for (i, face) in bsp.orig_faces.iter().enumerate() {
            if face.num_edge > 0 {
                by_plane.entry(face.pnum).or_default().push(i);
            }
        }

        let mut orig_faces = HashMap::new();

        for (ibrush, brush) in bsp.brushes.iter().enumerate() {
            for s in 0..brush.num_side {
                let ibside = (brush.fst_side + s) as usize;
                let Some(side) = bsp.brush_sides.get(ibside) else {
                    continue;
                };
                if side.bevel {
                    continue;
                }
                let Some(candidates) = by_plane.get(&side.pnum) else {
                    continue;
                };

                let Some(plane) = bsp.planes.get(side.pnum as usize) else {
                    continue;
                };

                let Ok(wind) = factory.from_side(bsp, ibrush, ibside) else {
                    continue;
                };
                if wind.len() < 3 {
                    continue;
                }
                let center = wind.center();
                let normal = &plane.normal;

                for &iface in candidates {
                    let verts = face_winding(bsp, &bsp.orig_faces[iface]);
                    if verts.len() >= 3 && polygon_contains(&verts, normal, &center) {
                        orig_faces.insert(ibside, iface);
                        break;
                    }
                }
            }
        }

        SideFaceMapper { orig_faces }
    }

    /// The original face a brush side was compiled from, if one was found.
    pub fn orig_face_index(&self, ibside: usize) -> Option<usize> {
        self.orig_faces.get(&ibside).copied()
    }

    pub fn len(&self) -> usize {
        self.orig_faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orig_faces.is_empty()
    }
}

/// The vertex loop of a face, walked through the surfedge table.
fn face_winding(bsp: &BspData, face: &DFace) -> Vec<Vector3<f32>> {
    let mut verts = Vec::with_capacity(face.num_edge as usize);

    for i in 0..face.num_edge {
        let Some(&sedge) = bsp.surf_edges.get((face.fst_edge + i) as usize) else {
            return Vec::new();
        };

        let iedge = sedge.unsigned_abs() as usize;
        let Some(edge) = bsp.edges.get(iedge) else {
            return Vec::new();
        };

        let v = if sedge < 0 { edge.v[1] } else { edge.v[0] };
        let Some(&point) = bsp.verts.get(v as usize) else {
            return Vec::new();
        };

        verts.push(point);
    }

    verts
}

/// Point-in-convex-polygon test that tolerates either winding direction.
fn polygon_contains(verts: &[Vector3<f32>], normal: &Vector3<f32>, p: &Vector3<f32>) -> bool {
    let mut saw_pos = false;
    let mut saw_neg = false;

    for i in 0..verts.len() {
        let a = verts[i];
        let b = verts[(i + 1) % verts.len()];
        let d = (b - a).cross(&(p - a)).dot(normal);

        if d > EPS_CONTAINS {
            saw_pos = true;
        } else if d < -EPS_CONTAINS {
            saw_neg = true;
        }

        if saw_pos && saw_neg {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_accepts_inner_and_rejects_outer_points() {
        let square = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(16.0, 0.0, 0.0),
            Vector3::new(16.0, 16.0, 0.0),
            Vector3::new(0.0, 16.0, 0.0),
        ];
        let normal = Vector3::new(0.0, 0.0, 1.0);

        assert!(polygon_contains(&square, &normal, &Vector3::new(8.0, 8.0, 0.0)));
        assert!(!polygon_contains(&square, &normal, &Vector3::new(24.0, 8.0, 0.0)));

        // reversed winding still works
        let reversed: Vec<_> = square.iter().rev().copied().collect();
        assert!(polygon_contains(&reversed, &normal, &Vector3::new(8.0, 8.0, 0.0)));
    }
}
