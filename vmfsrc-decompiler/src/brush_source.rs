//! Rebuilds solids from the brushes & brushsides lumps.
//!
//! Each compiled brush is the intersection of its sides' half-spaces. The
//! sides are turned back into polygons through the winding factory,
//! validated, and emitted as VMF solids through the writer interface.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info, warn};
use na::Vector3;

use vmfsrc_bsp::data::{BspData, DBrush};

use crate::config::DecompileConfig;
use crate::error::{BrushError, SideDefect};
use crate::geom;
use crate::side_face_map::SideFaceMapper;
use crate::tree::TreeLimits;
use crate::vmf::{TextureAxisSource, TextureRequest, UidSource, VmfWriter};
use crate::winding::{Winding, WindingFactory};

/// The run of brushes reachable from one model's head node.
#[derive(Debug, Clone, Copy)]
pub struct DBrushModel {
    pub fst_brush: i32,
    pub num_brush: i32,
}

/// Writes solids for world brushes and brush models, and keeps the
/// index-to-id maps the entity pass needs afterwards.
pub struct BrushSource<'a> {
    bsp: &'a BspData,
    config: &'a DecompileConfig,
    factory: &'a mut WindingFactory,
    side_face: &'a SideFaceMapper,
    writer: &'a mut dyn VmfWriter,
    texsrc: &'a dyn TextureAxisSource,
    uids: &'a mut dyn UidSource,

    models: Vec<DBrushModel>,
    world_brushes: usize,

    brush_side_to_id: HashMap<usize, i32>,
    brush_index_to_id: HashMap<usize, i32>,
}

impl<'a> BrushSource<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bsp: &'a BspData,
        config: &'a DecompileConfig,
        factory: &'a mut WindingFactory,
        side_face: &'a SideFaceMapper,
        writer: &'a mut dyn VmfWriter,
        texsrc: &'a dyn TextureAxisSource,
        uids: &'a mut dyn UidSource,
    ) -> Self {
        let (models, world_brushes) = Self::assign_brushes(bsp);

        BrushSource {
            bsp,
            config,
            factory,
            side_face,
            writer,
            texsrc,
            uids,
            models,
            world_brushes,
            brush_side_to_id: HashMap::new(),
            brush_index_to_id: HashMap::new(),
        }
    }

    /// Walks the BSP tree from every model's head node to find the brush
    /// range each model owns. Much simpler than guessing from face data,
    /// and it recovers null-faced brushes too. Model 0 bounds the world
    /// brush count.
    fn assign_brushes(bsp: &BspData) -> (Vec<DBrushModel>, usize) {
        let mut tl = TreeLimits::new(bsp);

        // walk model 0 (the worldspawn model)
        tl.walk(0);

        debug!("Walked worldspawn tree");

        let world_brushes = (tl.max_brush_leaf() + 1).max(0) as usize;

        let mut models = Vec::with_capacity(bsp.models.len());
        for model in bsp.models.iter() {
            tl.reset();
            tl.walk(model.head_node);

            let (fst_brush, num_brush) = if tl.max_brush_leaf() < tl.min_brush_leaf() {
                (0, 0)
            } else {
                (
                    tl.min_brush_leaf(),
                    tl.max_brush_leaf() - tl.min_brush_leaf() + 1,
                )
            };
            models.push(DBrushModel {
                fst_brush,
                num_brush,
            });
        }

        debug!("World brushes: {}", world_brushes);

        (models, world_brushes)
    }

    /// True when the brush belongs to a func_detail entity.
    pub fn is_func_detail(&self, brush: &DBrush) -> bool {
        let ladder_detail = self.config.non_object_brush_ladders && brush.is_ladder();
        (ladder_detail || brush.is_solid() || brush.is_translucent()) && brush.is_detail()
    }

    /// Writes all world brushes. Depending on the settings some brushes are
    /// left for the entity pass instead.
    pub fn write_brushes(&mut self) -> Result<(), BrushError> {
        info!("Writing brushes and planes");

        for i in 0..self.world_brushes {
            let Some(brush) = self.bsp.brushes.get(i).copied() else {
                break;
            };

            // details belong to their func_detail entities
            if self.config.write_details && self.is_func_detail(&brush) {
                continue;
            }

            // areaportal brushes belong to their func_areaportal entities
            if self.config.write_areaportals && brush.is_areaportal() {
                continue;
            }

            // ladder contents only mark entity geometry in games that build
            // ladders from brush entities
            if self.config.write_ladders
                && brush.is_ladder()
                && !self.config.non_object_brush_ladders
            {
                continue;
            }

            // occluder brushes aren't world brushes, nothing to skip here

            self.write_brush(i, None, None)?;
        }

        Ok(())
    }

    /// Writes one brush as a solid, applying the instance transform when
    /// given. Returns false when the brush had to be skipped.
    pub fn write_brush(
        &mut self,
        ibrush: usize,
        origin: Option<&Vector3<f32>>,
        angles: Option<&Vector3<f32>>,
    ) -> Result<bool, BrushError> {
        let Some(brush) = self.bsp.brushes.get(ibrush).copied() else {
            warn!("Invalid brush index {}", ibrush);
            return Ok(false);
        };

        let brush_id = self.uids.next_uid();

        let mut valid_sides: BTreeMap<usize, Winding> = BTreeMap::new();

        // check and preprocess the sides before committing to the brush
        for i in 0..brush.num_side {
            let ibside = (brush.fst_side + i) as usize;

            // surplus bevel faces lead to bad brushes
            if self.bsp.brush_sides[ibside].bevel {
                continue;
            }

            let wind = self
                .factory
                .from_side(self.bsp, ibrush, ibside)?
                .remove_degenerated();

            if let Some(defect) = self.check_side(&wind) {
                if self.config.debug {
                    warn!("Skipped side {} of brush {}: {}", i, ibrush, defect);
                }
                continue;
            }

            let mut wind = wind;
            if let Some(angles) = angles {
                wind = wind.rotate(angles);
            }
            if let Some(origin) = origin {
                wind = wind.translate(origin);
            }

            valid_sides.insert(ibside, wind);
        }

        // all sides invalid = invalid brush
        if valid_sides.is_empty() {
            warn!("Skipped empty brush {}", ibrush);
            return Ok(false);
        }

        // a solid under three sides can't be compiled and crashes older
        // Hammer builds
        if valid_sides.len() < 3 {
            warn!("Skipped brush {} with less than 3 sides", ibrush);
            return Ok(false);
        }

        self.brush_index_to_id.insert(ibrush, brush_id);

        self.writer.start("solid");
        self.writer.put_int("id", brush_id);

        if self.config.debug {
            self.writer.start("decompile_debug");
            self.writer.put_int("brush_index", ibrush as i32);
            self.writer
                .put("brush_contents", &format!("{:#x}", brush.contents));
            self.writer.end("decompile_debug");
        }

        for (ibside, wind) in std::mem::take(&mut valid_sides) {
            self.write_side(ibside, ibrush, &wind, origin, angles);
        }

        self.writer.end("solid");

        Ok(true)
    }

    fn check_side(&self, wind: &Winding) -> Option<SideDefect> {
        if wind.is_empty() {
            return Some(SideDefect::NoVertices);
        }
        if wind.len() < 3 {
            return Some(SideDefect::TooFewVertices);
        }
        if self.factory.is_huge(wind) {
            return Some(SideDefect::TooBig);
        }

        let plane = wind.build_plane();

        if plane.iter().any(|p| !geom::is_valid(p)) {
            return Some(SideDefect::InvalidPlane);
        }

        // all three plane points must be unique or it isn't a valid plane
        for p1 in 0..plane.len() {
            for p2 in 0..plane.len() {
                if p1 != p2 && plane[p1] == plane[p2] {
                    return Some(SideDefect::DuplicatePlanePoint);
                }
            }
        }

        None
    }

    fn write_side(
        &mut self,
        ibside: usize,
        ibrush: usize,
        wind: &Winding,
        origin: Option<&Vector3<f32>>,
        angles: Option<&Vector3<f32>>,
    ) {
        let side = self.bsp.brush_sides[ibside];

        let [e1, e2, e3] = wind.build_plane();

        // the compiled plane normal can be stale once the brush was rotated,
        // recompute it from the emitted points
        let normal = (e2 - e1).cross(&(e3 - e1)).normalize();

        let texture = self.texsrc.build(
            self.bsp,
            &TextureRequest {
                texinfo: side.texinfo,
                brush: ibrush,
                brush_side: ibside,
                normal,
                origin,
                angles,
            },
        );

        let side_id = self.uids.next_uid();
        self.brush_side_to_id.insert(ibside, side_id);

        let smoothing_groups = self
            .side_face
            .orig_face_index(ibside)
            .and_then(|i| self.bsp.orig_faces.get(i))
            .map(|f| f.smoothing_groups)
            .unwrap_or(0);

        self.writer.start("side");
        self.writer.put_int("id", side_id);
        self.writer.put_plane("plane", &e1, &e2, &e3);
        self.writer.put_int("smoothing_groups", smoothing_groups as i32);
        self.writer.put_texture(&texture);
        self.writer.end("side");
    }

    /// Writes all brushes of a model, with the instance's origin and angles
    /// applied to the windings first.
    pub fn write_model(
        &mut self,
        imodel: usize,
        origin: Option<&Vector3<f32>>,
        angles: Option<&Vector3<f32>>,
    ) -> Result<bool, BrushError> {
        let Some(model) = self.models.get(imodel).copied() else {
            warn!("Invalid model index {}", imodel);
            return Ok(false);
        };

        for i in 0..model.num_brush {
            self.write_brush((model.fst_brush + i) as usize, origin, angles)?;
        }

        Ok(true)
    }

    /// Number of world brushes, i.e. the highest brush index of model 0
    /// plus one.
    pub fn world_brushes(&self) -> usize {
        self.world_brushes
    }

    pub fn models(&self) -> &[DBrushModel] {
        &self.models
    }

    /// The solid id a brush was written with, if it was emitted.
    pub fn brush_id_for_index(&self, ibrush: usize) -> Option<i32> {
        self.brush_index_to_id.get(&ibrush).copied()
    }

    /// The side id a brush side was written with, if it was emitted.
    pub fn brush_side_id_for_index(&self, ibside: usize) -> Option<i32> {
        self.brush_side_to_id.get(&ibside).copied()
    }
}
