//! Loads the lump tables of a parsed container into a [BspData].

use log::debug;

use crate::app;
use crate::error::Result;
use crate::file::BspFile;
use crate::lump_type::LumpType;
use crate::lzma;

use super::{
    areaportals, brushes, edges, faces, models, occluders, planes, texinfo, tree, vertices,
    BspData,
};

/// Reads the geometry-relevant lumps of a [BspFile], uncompressing on the
/// fly where needed.
pub struct BspReader<'a> {
    file: &'a BspFile,
}

impl<'a> BspReader<'a> {
    pub fn new(file: &'a BspFile) -> Self {
        BspReader { file }
    }

    /// The lump payload with any compression envelope removed.
    fn lump_bytes(&self, ltype: LumpType) -> Result<Vec<u8>> {
        let lump = self.file.get_lump(ltype);
        if lump.is_compressed() {
            lzma::uncompress(lump.buffer())
        } else {
            Ok(lump.buffer().to_vec())
        }
    }

    pub fn read(&self) -> Result<BspData> {
        let order = self.file.byte_order();
        let wide = self.file.app_id() == app::VINDICTUS;

        let verts = vertices::from_data(&self.lump_bytes(LumpType::Vertices)?, order)?;
        let edges = edges::edges_from_data(&self.lump_bytes(LumpType::Edges)?, order, wide)?;
        let surf_edges =
            edges::surf_edges_from_data(&self.lump_bytes(LumpType::SurfEdges)?, order)?;
        let planes = planes::from_data(&self.lump_bytes(LumpType::Planes)?, order)?;
        let brushes = brushes::brushes_from_data(&self.lump_bytes(LumpType::Brushes)?, order)?;
        let brush_sides =
            brushes::brush_sides_from_data(&self.lump_bytes(LumpType::BrushSides)?, order, wide)?;
        let models = models::from_data(&self.lump_bytes(LumpType::Models)?, order)?;
        let faces = faces::from_data(&self.lump_bytes(LumpType::Faces)?, order)?;
        let orig_faces = faces::from_data(&self.lump_bytes(LumpType::OriginalFaces)?, order)?;
        let texinfos = texinfo::from_data(&self.lump_bytes(LumpType::TexInfo)?, order)?;
        let nodes = tree::nodes_from_data(&self.lump_bytes(LumpType::Nodes)?, order)?;
        let leaves = tree::leaves_from_data(
            &self.lump_bytes(LumpType::Leaves)?,
            order,
            self.file.get_lump(LumpType::Leaves).version(),
        )?;
        let leaf_brushes =
            tree::leaf_brushes_from_data(&self.lump_bytes(LumpType::LeafBrushes)?, order, wide)?;
        let areaportals =
            areaportals::from_data(&self.lump_bytes(LumpType::AreaPortals)?, order)?;
        let clip_portal_verts =
            vertices::from_data(&self.lump_bytes(LumpType::ClipPortalVerts)?, order)?;
        let occlusion = occluders::from_data(
            &self.lump_bytes(LumpType::Occlusion)?,
            order,
            self.file.get_lump(LumpType::Occlusion).version(),
        )?;

        debug!(
            "Loaded {} planes, {} brushes, {} brush sides, {} models",
            planes.len(),
            brushes.len(),
            brush_sides.len(),
            models.len()
        );

        Ok(BspData {
            verts,
            edges,
            surf_edges,
            planes,
            brushes,
            brush_sides,
            models,
            faces,
            orig_faces,
            texinfos,
            nodes,
            leaves,
            leaf_brushes,
            areaportals,
            clip_portal_verts,
            occluders: occlusion.occluders,
            occluder_polys: occlusion.polys,
            occluder_verts: occlusion.vertex_indices,
        })
    }
}
