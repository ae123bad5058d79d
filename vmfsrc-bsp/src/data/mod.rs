//! Typed views of the lump tables consumed by the decompiler.

pub mod areaportals;
pub mod brushes;
pub mod edges;
pub mod faces;
pub mod models;
pub mod occluders;
pub mod planes;
pub mod reader;
pub mod texinfo;
pub mod tree;
pub mod vertices;

pub use areaportals::DAreaportal;
pub use brushes::{DBrush, DBrushSide};
pub use edges::DEdge;
pub use faces::DFace;
pub use models::DModel;
pub use occluders::{DOccluderData, DOccluderPolyData};
pub use planes::DPlane;
pub use reader::BspReader;
pub use texinfo::DTexInfo;
pub use tree::{DLeaf, DNode};

use na::Vector3;

/// All lump tables of a parsed map. Entities reference each other by index
/// into these shared slices; the whole structure is read-only after load.
#[derive(Debug, Clone, Default)]
pub struct BspData {
    pub verts: Box<[Vector3<f32>]>,
    pub edges: Box<[DEdge]>,
    pub surf_edges: Box<[i32]>,
    pub planes: Box<[DPlane]>,
    pub brushes: Box<[DBrush]>,
    pub brush_sides: Box<[DBrushSide]>,
    pub models: Box<[DModel]>,
    pub faces: Box<[DFace]>,
    pub orig_faces: Box<[DFace]>,
    pub texinfos: Box<[DTexInfo]>,
    pub nodes: Box<[DNode]>,
    pub leaves: Box<[DLeaf]>,
    pub leaf_brushes: Box<[i32]>,
    pub areaportals: Box<[DAreaportal]>,
    pub clip_portal_verts: Box<[Vector3<f32>]>,
    pub occluders: Box<[DOccluderData]>,
    pub occluder_polys: Box<[DOccluderPolyData]>,
    pub occluder_verts: Box<[i32]>,
}
