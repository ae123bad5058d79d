//! Error types

use std::fmt;

use thiserror::Error;

/// A structural problem in the compiled brush data that the caller needs to
/// know about.
#[derive(Debug, Error)]
pub enum BrushError {
    #[error("Brush side {side} is not part of brush {brush}")]
    SideNotInBrush { brush: usize, side: usize },
}

/// Why a single brush side was dropped during reconstruction. These are
/// recoverable and only surface as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideDefect {
    NoVertices,
    TooFewVertices,
    TooBig,
    InvalidPlane,
    DuplicatePlanePoint,
}

impl fmt::Display for SideDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideDefect::NoVertices => write!(f, "no vertices"),
            SideDefect::TooFewVertices => write!(f, "less than 3 vertices"),
            SideDefect::TooBig => write!(f, "too big"),
            SideDefect::InvalidPlane => write!(f, "invalid plane"),
            SideDefect::DuplicatePlanePoint => write!(f, "duplicate plane point"),
        }
    }
}
