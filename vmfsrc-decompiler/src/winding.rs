//! Convex polygon math for rebuilding brush faces.
//!
//! A compiled brush only stores half-spaces. To recover a face polygon, a
//! huge base polygon is laid onto the face's plane and clipped against every
//! other plane of the brush.

use std::collections::HashMap;

use log::warn;
use na::Vector3;

use vmfsrc_bsp::app::{self, AppId};
use vmfsrc_bsp::data::{BspData, DPlane};

use crate::error::BrushError;
use crate::geom;

/// Distance at which a point counts as lying on a clip plane.
const EPS_SPLIT: f32 = 0.01;

/// Distance under which two consecutive points collapse into one.
const EPS_DEGEN: f32 = 0.1;

const SIDE_FRONT: usize = 0;
const SIDE_BACK: usize = 1;
const SIDE_ON: usize = 2;

/// An ordered, convex, planar polygon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Winding {
    verts: Vec<Vector3<f32>>,
}

impl Winding {
    pub fn new(verts: Vec<Vector3<f32>>) -> Self {
        Winding { verts }
    }

    pub fn len(&self) -> usize {
        self.verts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    pub fn verts(&self) -> &[Vector3<f32>] {
        &self.verts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector3<f32>> {
        self.verts.iter()
    }

    /// Mean of all vertices.
    pub fn center(&self) -> Vector3<f32> {
        let mut c = Vector3::zeros();
        for v in &self.verts {
            c += v;
        }
        c / self.verts.len().max(1) as f32
    }

    /// Clip the polygon against a half-space, keeping what lies in front of
    /// `split`. With `keep_on` a polygon entirely on the plane survives;
    /// otherwise it is dropped.
    pub fn clip_plane(&self, split: &DPlane, keep_on: bool) -> Winding {
        let n = self.verts.len();
        if n == 0 {
            return Winding::default();
        }

        let mut dists = Vec::with_capacity(n + 1);
        let mut sides = Vec::with_capacity(n + 1);
        let mut counts = [0usize; 3];

        for v in &self.verts {
            let d = split.distance(v);
            let side = if d > EPS_SPLIT {
                SIDE_FRONT
            } else if d < -EPS_SPLIT {
                SIDE_BACK
            } else {
                SIDE_ON
            };
            counts[side] += 1;
            dists.push(d);
            sides.push(side);
        }
        dists.push(dists[0]);
        sides.push(sides[0]);

        if counts[SIDE_FRONT] == 0 {
            // coplanar polygons only survive when asked for
            if keep_on && counts[SIDE_ON] == n {
                return self.clone();
            }
            return Winding::default();
        }
        if counts[SIDE_BACK] == 0 {
            return self.clone();
        }

        let mut out = Vec::with_capacity(n + 4);

        for i in 0..n {
            let p1 = self.verts[i];

            match sides[i] {
                SIDE_ON => {
                    out.push(p1);
                    continue;
                }
                SIDE_FRONT => out.push(p1),
                _ => {}
            }

            if sides[i + 1] == SIDE_ON || sides[i + 1] == sides[i] {
                continue;
            }

            // the edge straddles the plane, emit the intersection
            let p2 = self.verts[(i + 1) % n];
            let t = dists[i] / (dists[i] - dists[i + 1]);

            let mut mid = Vector3::zeros();
            for j in 0..3 {
                // axial planes land exactly on the plane
                mid[j] = if split.normal[j] == 1.0 {
                    split.dist
                } else if split.normal[j] == -1.0 {
                    -split.dist
                } else {
                    p1[j] + t * (p2[j] - p1[j])
                };
            }
            out.push(mid);
        }

        Winding::new(out)
    }

    /// Drop vertices that collapse onto their neighbour.
    pub fn remove_degenerated(&self) -> Winding {
        let n = self.verts.len();
        let mut out = Vec::with_capacity(n);

        for i in 0..n {
            let j = (i + 1) % n;
            if (self.verts[i] - self.verts[j]).norm() > EPS_DEGEN {
                out.push(self.verts[i]);
            }
        }

        Winding::new(out)
    }

    /// Three vertices spanning the polygon's plane: the first vertex plus
    /// the earliest pair that isn't degenerate or collinear with it. Falls
    /// back to the literal first three vertices so a broken polygon still
    /// fails the caller's duplicate checks.
    ///
    /// # Panics
    /// If the winding has fewer than 3 vertices.
    pub fn build_plane(&self) -> [Vector3<f32>; 3] {
        let e1 = self.verts[0];
        let mut e2 = self.verts[1];
        let mut e3 = self.verts[2];

        let mut i2 = 1;
        for (i, v) in self.verts.iter().enumerate().skip(1) {
            if (v - e1).norm() > EPS_DEGEN {
                e2 = *v;
                i2 = i;
                break;
            }
        }

        for v in self.verts.iter().skip(i2 + 1) {
            if (e2 - e1).cross(&(v - e1)).norm() > EPS_DEGEN {
                e3 = *v;
                break;
            }
        }

        [e1, e2, e3]
    }

    /// Rotate every vertex by euler angles in degrees.
    pub fn rotate(&self, angles: &Vector3<f32>) -> Winding {
        Winding::new(
            self.verts
                .iter()
                .map(|v| geom::rotate_euler(v, angles))
                .collect(),
        )
    }

    /// Translate every vertex.
    pub fn translate(&self, offset: &Vector3<f32>) -> Winding {
        Winding::new(self.verts.iter().map(|v| v + offset).collect())
    }
}

/// Builds and caches windings from the compiled index tables.
///
/// All caches are keyed on the stable indices rather than floating point
/// content; they are write-once and never evicted.
pub struct WindingFactory {
    /// World half-extent used to bound base polygons.
    pub max_coord: i32,

    /// Radius of a base polygon, `ceil(sqrt(3) * max_coord)`.
    pub max_len: i32,

    face_cache: HashMap<usize, Winding>,
    side_cache: HashMap<(usize, usize), Winding>,
    areaportal_cache: HashMap<usize, Winding>,
    occluder_cache: HashMap<usize, Winding>,
    plane_cache: HashMap<usize, Winding>,
}

impl WindingFactory {
    pub fn new(coord_size: i32) -> Self {
        WindingFactory {
            max_coord: coord_size,
            max_len: (3f64.sqrt() * coord_size as f64).ceil() as i32,
            face_cache: HashMap::new(),
            side_cache: HashMap::new(),
            areaportal_cache: HashMap::new(),
            occluder_cache: HashMap::new(),
            plane_cache: HashMap::new(),
        }
    }

    /// Strata Source raised the world extent fourfold; everything else uses
    /// the classic coordinate limit.
    pub fn for_app_id(app_id: AppId) -> Self {
        let coord_size = match app_id {
            app::STRATA_SOURCE => 131072,
            _ => 32768,
        };
        WindingFactory::new(coord_size)
    }

    /// A winding made from a face's surfedge loop.
    pub fn from_face(&mut self, bsp: &BspData, iface: usize) -> Winding {
        if let Some(w) = self.face_cache.get(&iface) {
            return w.clone();
        }

        let face = &bsp.faces[iface];
        let mut verts = Vec::with_capacity(face.num_edge as usize);

        for i in 0..face.num_edge {
            let sedge = bsp.surf_edges[(face.fst_edge + i) as usize];

            let v = if sedge < 0 {
                // backwards wound edge
                bsp.edges[(-sedge) as usize].v[1]
            } else {
                bsp.edges[sedge as usize].v[0]
            };

            verts.push(bsp.verts[v as usize]);
        }

        let w = Winding::new(verts);
        self.face_cache.insert(iface, w.clone());
        w
    }

    /// A winding for one brush side: the side plane's base polygon clipped
    /// against every other non-bevel plane of the brush.
    pub fn from_side(
        &mut self,
        bsp: &BspData,
        ibrush: usize,
        ibside: usize,
    ) -> Result<Winding, BrushError> {
        let key = (ibrush, ibside);
        if let Some(w) = self.side_cache.get(&key) {
            return Ok(w.clone());
        }

        let brush = &bsp.brushes[ibrush];
        let bside = &bsp.brush_sides[ibside];

        let mut has_side = false;
        let mut w = self.from_plane(bsp, bside.pnum as usize);

        // clip to all other planes
        for i in 0..brush.num_side {
            let ibside2 = (brush.fst_side + i) as usize;

            // don't clip the plane to itself
            if ibside2 == ibside {
                has_side = true;
                continue;
            }

            let bside2 = &bsp.brush_sides[ibside2];

            // don't clip to bevel planes
            if bside2.bevel {
                continue;
            }

            // remove everything behind the plane
            let flip = bsp.planes[bside2.pnum as usize].flipped();
            w = w.clip_plane(&flip, false);
        }

        if !has_side {
            return Err(BrushError::SideNotInBrush {
                brush: ibrush,
                side: ibside,
            });
        }

        self.side_cache.insert(key, w.clone());

        Ok(w)
    }

    /// A winding from an areaportal's run of the clip-portal vertex table.
    pub fn from_areaportal(&mut self, bsp: &BspData, iap: usize) -> Winding {
        if let Some(w) = self.areaportal_cache.get(&iap) {
            return w.clone();
        }

        let ap = &bsp.areaportals[iap];
        let fst = ap.fst_clip_portal_vert as usize;
        let num = ap.num_clip_portal_verts as usize;

        let w = Winding::new(bsp.clip_portal_verts[fst..fst + num].to_vec());
        self.areaportal_cache.insert(iap, w.clone());
        w
    }

    /// A winding from an occluder polygon's vertex indices.
    pub fn from_occluder(&mut self, bsp: &BspData, ipoly: usize) -> Winding {
        if let Some(w) = self.occluder_cache.get(&ipoly) {
            return w.clone();
        }

        let poly = &bsp.occluder_polys[ipoly];
        let mut verts = Vec::with_capacity(poly.vertex_count as usize);

        for k in 0..poly.vertex_count {
            let pvi = bsp.occluder_verts[(poly.fst_vertex_index + k) as usize];
            verts.push(bsp.verts[pvi as usize]);
        }

        let w = Winding::new(verts);
        self.occluder_cache.insert(ipoly, w.clone());
        w
    }

    /// The huge square base polygon for a plane.
    pub fn from_plane(&mut self, bsp: &BspData, iplane: usize) -> Winding {
        if let Some(w) = self.plane_cache.get(&iplane) {
            return w.clone();
        }

        let w = self.base_winding(&bsp.planes[iplane]);
        self.plane_cache.insert(iplane, w.clone());
        w
    }

    fn base_winding(&self, pl: &DPlane) -> Winding {
        // find the dominant axis of the plane normal
        let mut dmax = -1.0f32;
        let mut idir = None;

        for i in 0..3 {
            let dc = pl.normal[i].abs();
            if dc > dmax {
                dmax = dc;
                idir = Some(i);
            }
        }

        // NaN'ed normals never win a comparison
        let Some(idir) = idir else {
            warn!("Plane with bad normal {:?}", pl.normal);
            return Winding::default();
        };

        // the "upwards" pointing vector; z unless the normal is mostly
        // vertical, then x
        let mut vup = if idir == 2 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };

        // remove the component along the normal and re-unitize
        let vdot = vup.dot(&pl.normal);
        vup -= pl.normal * vdot;
        vup = vup.normalize();

        // the point where the plane passes closest to the origin
        let org = pl.normal * pl.dist;

        // the "rightwards" pointing vector
        let vrt = vup.cross(&pl.normal);

        let vup = vup * self.max_len as f32;
        let vrt = vrt * self.max_len as f32;

        // move diagonally away from org to create the corner verts
        Winding::new(vec![
            org - vrt + vup, // left up
            org + vrt + vup, // right up
            org + vrt - vup, // right down
            org - vrt - vup, // left down
        ])
    }

    /// True while the winding still has one of the base polygon's far-out
    /// points, meaning the clip never bounded it.
    pub fn is_huge(&self, winding: &Winding) -> bool {
        winding
            .iter()
            .any(|v| v.iter().any(|c| c.abs() > self.max_coord as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(nx: f32, ny: f32, nz: f32, dist: f32) -> DPlane {
        DPlane {
            normal: Vector3::new(nx, ny, nz),
            dist,
            axis_type: 0,
        }
    }

    fn data_with_planes(planes: Vec<DPlane>) -> BspData {
        BspData {
            planes: planes.into_boxed_slice(),
            ..Default::default()
        }
    }

    #[test]
    fn base_winding_lies_on_its_plane() {
        let mut factory = WindingFactory::new(32768);
        let pl = plane(0.6, 0.8, 0.0, 123.0);
        let bsp = data_with_planes(vec![pl.clone()]);

        let w = factory.from_plane(&bsp, 0);
        assert_eq!(w.len(), 4);
        for v in w.iter() {
            assert!(pl.distance(v).abs() < 1e-3, "vertex off plane: {:?}", v);
        }
    }

    #[test]
    fn base_winding_for_axial_plane() {
        let mut factory = WindingFactory::new(32768);
        let bsp = data_with_planes(vec![plane(1.0, 0.0, 0.0, 100.0)]);

        let w = factory.from_plane(&bsp, 0);
        let max_len = factory.max_len as f32;

        assert_eq!(w.len(), 4);
        for v in w.iter() {
            assert_eq!(v.x, 100.0);
            assert_eq!(v.y.abs(), max_len);
            assert_eq!(v.z.abs(), max_len);
        }
    }

    #[test]
    fn clip_is_idempotent() {
        let mut factory = WindingFactory::new(32768);
        let bsp = data_with_planes(vec![plane(0.0, 0.0, 1.0, 0.0)]);

        let base = factory.from_plane(&bsp, 0);
        let split = plane(1.0, 0.0, 0.0, 64.0);

        let once = base.clip_plane(&split, false);
        let twice = once.clip_plane(&split, false);
        assert!(!once.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn clip_keeps_the_front() {
        let square = Winding::new(vec![
            Vector3::new(-64.0, -64.0, 0.0),
            Vector3::new(-64.0, 64.0, 0.0),
            Vector3::new(64.0, 64.0, 0.0),
            Vector3::new(64.0, -64.0, 0.0),
        ]);

        let clipped = square.clip_plane(&plane(1.0, 0.0, 0.0, 0.0), false);
        assert_eq!(clipped.len(), 4);
        for v in clipped.iter() {
            assert!(v.x >= -EPS_SPLIT);
        }
    }

    #[test]
    fn coplanar_windings_drop_without_keep_on() {
        let square = Winding::new(vec![
            Vector3::new(-8.0, -8.0, 5.0),
            Vector3::new(-8.0, 8.0, 5.0),
            Vector3::new(8.0, 8.0, 5.0),
            Vector3::new(8.0, -8.0, 5.0),
        ]);
        let split = plane(0.0, 0.0, 1.0, 5.0);

        assert!(square.clip_plane(&split, false).is_empty());
        assert_eq!(square.clip_plane(&split, true), square);
    }

    #[test]
    fn cube_side_clips_to_a_square() {
        let mut factory = WindingFactory::new(32768);
        let bsp = data_with_planes(vec![
            plane(1.0, 0.0, 0.0, 16.0),
            plane(-1.0, 0.0, 0.0, 16.0),
            plane(0.0, 1.0, 0.0, 16.0),
            plane(0.0, -1.0, 0.0, 16.0),
            plane(0.0, 0.0, 1.0, 16.0),
            plane(0.0, 0.0, -1.0, 16.0),
        ]);

        let mut w = factory.from_plane(&bsp, 0);
        for i in 1..6 {
            w = w.clip_plane(&bsp.planes[i].flipped(), false);
        }
        let w = w.remove_degenerated();

        assert_eq!(w.len(), 4);
        assert!(!factory.is_huge(&w));
        for v in w.iter() {
            assert_eq!(v.x, 16.0);
            assert_eq!(v.y.abs(), 16.0);
            assert_eq!(v.z.abs(), 16.0);
        }
    }

    #[test]
    fn degenerate_points_are_removed() {
        let w = Winding::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.001, 0.0),
            Vector3::new(16.0, 0.0, 0.0),
            Vector3::new(16.0, 16.0, 0.0),
            Vector3::new(0.0, 16.0, 0.0),
        ]);

        assert_eq!(w.remove_degenerated().len(), 4);
    }

    #[test]
    fn build_plane_skips_collinear_points() {
        let w = Winding::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(8.0, 0.0, 0.0),
            Vector3::new(16.0, 0.0, 0.0),
            Vector3::new(16.0, 16.0, 0.0),
        ]);

        let [e1, e2, e3] = w.build_plane();
        assert_eq!(e1, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(e2, Vector3::new(8.0, 0.0, 0.0));
        assert_eq!(e3, Vector3::new(16.0, 16.0, 0.0));
    }

    #[test]
    fn rotate_and_translate_apply_to_every_vertex() {
        let w = Winding::new(vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ]);

        let moved = w.translate(&Vector3::new(0.0, 0.0, 10.0));
        assert_eq!(moved.verts()[0], Vector3::new(1.0, 0.0, 10.0));

        let spun = w.rotate(&Vector3::new(0.0, 0.0, 180.0));
        assert!((spun.verts()[0] - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn huge_windings_are_detected() {
        let factory = WindingFactory::new(32768);
        let w = Winding::new(vec![
            Vector3::new(0.0, 0.0, 56755.0),
            Vector3::new(1.0, 0.0, 0.0),
        ]);
        assert!(factory.is_huge(&w));

        let w = Winding::new(vec![Vector3::new(0.0, 0.0, 512.0)]);
        assert!(!factory.is_huge(&w));
    }
}
