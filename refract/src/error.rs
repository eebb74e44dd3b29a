use thiserror::Error;

use crate::{Float, SurfaceId};

/// Errors raised while building a scene.
///
/// Propagation itself never fails: parallel rays, total internal reflection
/// and exhausted surfaces are ordinary outcomes of a pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A ray direction of (near) zero length cannot be normalized.
    #[error("ray direction must not be zero")]
    ZeroDirection,

    /// Both endpoints of a surface coincide.
    #[error("surface endpoints must be distinct")]
    DegenerateSurface,

    /// Refractive index ratios must be finite and positive.
    #[error("invalid refractive index ratio: {0}")]
    InvalidRatio(Float),

    /// A surface id that doesn't belong to the registry it was used with.
    #[error("no surface with id {0}")]
    UnknownSurface(SurfaceId),
}

pub type Result<T> = core::result::Result<T, Error>;
