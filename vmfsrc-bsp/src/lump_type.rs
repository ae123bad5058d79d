//! Lump indices and the BSP versions they became available in.

/// The contents of a lump slot, derived from its index.
///
/// Indices past 63 (Titanfall's extended directory) have no named type and
/// map to [LumpType::Unknown].
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LumpType {
    Entities = 0,
    Planes = 1,
    TexData = 2,
    Vertices = 3,
    Visibility = 4,
    Nodes = 5,
    TexInfo = 6,
    Faces = 7,
    Lighting = 8,
    Occlusion = 9,
    Leaves = 10,
    FaceIds = 11,
    Edges = 12,
    SurfEdges = 13,
    Models = 14,
    WorldLights = 15,
    LeafFaces = 16,
    LeafBrushes = 17,
    Brushes = 18,
    BrushSides = 19,
    Areas = 20,
    AreaPortals = 21,
    PropCollision = 22,
    PropHulls = 23,
    PropHullVerts = 24,
    PropTriangles = 25,
    DispInfo = 26,
    OriginalFaces = 27,
    PhysDisp = 28,
    PhysCollide = 29,
    VertNormals = 30,
    VertNormalIndices = 31,
    DispLightmapAlphas = 32,
    DispVerts = 33,
    DispLightmapSamplePositions = 34,
    GameLump = 35,
    LeafWaterData = 36,
    Primitives = 37,
    PrimVerts = 38,
    PrimIndices = 39,
    PakFile = 40,
    ClipPortalVerts = 41,
    Cubemaps = 42,
    TexDataStringData = 43,
    TexDataStringTable = 44,
    Overlays = 45,
    LeafMinDistToWater = 46,
    FaceMacroTextureInfo = 47,
    DispTris = 48,
    PhysCollideSurface = 49,
    WaterOverlays = 50,
    LeafAmbientIndexHdr = 51,
    LeafAmbientIndex = 52,
    LightingHdr = 53,
    WorldLightsHdr = 54,
    LeafAmbientLightingHdr = 55,
    LeafAmbientLighting = 56,
    XzipPakFile = 57,
    FacesHdr = 58,
    MapFlags = 59,
    OverlayFades = 60,
    OverlaySystemLevels = 61,
    PhysLevel = 62,
    DispMultiblend = 63,
    Unknown,
}

const NAMED_LUMPS: [LumpType; 64] = [
    LumpType::Entities,
    LumpType::Planes,
    LumpType::TexData,
    LumpType::Vertices,
    LumpType::Visibility,
    LumpType::Nodes,
    LumpType::TexInfo,
    LumpType::Faces,
    LumpType::Lighting,
    LumpType::Occlusion,
    LumpType::Leaves,
    LumpType::FaceIds,
    LumpType::Edges,
    LumpType::SurfEdges,
    LumpType::Models,
    LumpType::WorldLights,
    LumpType::LeafFaces,
    LumpType::LeafBrushes,
    LumpType::Brushes,
    LumpType::BrushSides,
    LumpType::Areas,
    LumpType::AreaPortals,
    LumpType::PropCollision,
    LumpType::PropHulls,
    LumpType::PropHullVerts,
    LumpType::PropTriangles,
    LumpType::DispInfo,
    LumpType::OriginalFaces,
    LumpType::PhysDisp,
    LumpType::PhysCollide,
    LumpType::VertNormals,
    LumpType::VertNormalIndices,
    LumpType::DispLightmapAlphas,
    LumpType::DispVerts,
    LumpType::DispLightmapSamplePositions,
    LumpType::GameLump,
    LumpType::LeafWaterData,
    LumpType::Primitives,
    LumpType::PrimVerts,
    LumpType::PrimIndices,
    LumpType::PakFile,
    LumpType::ClipPortalVerts,
    LumpType::Cubemaps,
    LumpType::TexDataStringData,
    LumpType::TexDataStringTable,
    LumpType::Overlays,
    LumpType::LeafMinDistToWater,
    LumpType::FaceMacroTextureInfo,
    LumpType::DispTris,
    LumpType::PhysCollideSurface,
    LumpType::WaterOverlays,
    LumpType::LeafAmbientIndexHdr,
    LumpType::LeafAmbientIndex,
    LumpType::LightingHdr,
    LumpType::WorldLightsHdr,
    LumpType::LeafAmbientLightingHdr,
    LumpType::LeafAmbientLighting,
    LumpType::XzipPakFile,
    LumpType::FacesHdr,
    LumpType::MapFlags,
    LumpType::OverlayFades,
    LumpType::OverlaySystemLevels,
    LumpType::PhysLevel,
    LumpType::DispMultiblend,
];

impl LumpType {
    /// The type stored at a directory index. The `version` parameter is kept
    /// for dialect-specific index reuse; unknown and extended indices map to
    /// [LumpType::Unknown].
    pub fn get(index: usize, _version: i32) -> LumpType {
        NAMED_LUMPS.get(index).copied().unwrap_or(LumpType::Unknown)
    }

    /// Directory index of this type.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Minimum BSP version this lump appears in, or -1 when it has always
    /// existed.
    pub fn min_version(self) -> i32 {
        use LumpType::*;
        match self {
            LeafAmbientIndexHdr | LeafAmbientIndex | LightingHdr | WorldLightsHdr
            | LeafAmbientLightingHdr | LeafAmbientLighting | FacesHdr | MapFlags => 20,
            OverlayFades => 21,
            OverlaySystemLevels => 22,
            PhysLevel => 25,
            DispMultiblend => 27,
            _ => -1,
        }
    }
}

#[test]
fn indices_round_trip() {
    assert_eq!(LumpType::get(0, 19), LumpType::Entities);
    assert_eq!(LumpType::get(35, 20), LumpType::GameLump);
    assert_eq!(LumpType::get(63, 21), LumpType::DispMultiblend);
    assert_eq!(LumpType::get(100, 29), LumpType::Unknown);

    for (i, t) in NAMED_LUMPS.iter().enumerate() {
        assert_eq!(t.index(), i);
    }
}

#[test]
fn hdr_lumps_need_version_20() {
    assert_eq!(LumpType::LightingHdr.min_version(), 20);
    assert_eq!(LumpType::Brushes.min_version(), -1);
}
