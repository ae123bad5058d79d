//! Rebuilding editable brush geometry from compiled Source BSP maps.
//!
//! The compiler reduces every brush to planar half-spaces; this crate
//! inverts that work. The winding engine lays a huge base polygon onto each
//! side's plane and clips it against the brush's other planes, the tree
//! walker assigns brush ranges to models, and the brush reconstructor
//! validates and emits the resulting faces through the VMF writer
//! interface.

pub mod brush_source;
pub mod config;
pub mod error;
pub mod geom;
pub mod side_face_map;
pub mod tree;
pub mod vmf;
pub mod winding;

pub use brush_source::BrushSource;
pub use config::DecompileConfig;
pub use error::BrushError;
pub use side_face_map::SideFaceMapper;
pub use tree::TreeLimits;
pub use winding::{Winding, WindingFactory};
