//! Policy switches for brush reconstruction.

/// Controls which compiled brushes are written as world geometry and how
/// noisy the reconstruction is.
#[derive(Debug, Clone)]
pub struct DecompileConfig {
    /// Leave func_detail brushes to the entity pass instead of writing them
    /// as world brushes.
    pub write_details: bool,

    /// Leave areaportal brushes to the entity pass.
    pub write_areaportals: bool,

    /// Leave ladder brushes to the entity pass.
    pub write_ladders: bool,

    /// The game builds ladders from brush entities rather than tool-textured
    /// world brushes, which changes how ladder contents are classified.
    pub non_object_brush_ladders: bool,

    /// Log every skipped brush side with its reason.
    pub debug: bool,
}

impl Default for DecompileConfig {
    fn default() -> Self {
        DecompileConfig {
            write_details: true,
            write_areaportals: true,
            write_ladders: true,
            non_object_brush_ladders: false,
            debug: false,
        }
    }
}
