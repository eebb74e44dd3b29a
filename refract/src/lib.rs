//! Two-dimensional ray-tree propagation through partially reflecting,
//! partially refracting line segments.
//!
//! A pass starts from one or more seed [`Ray`]s and a set of [`Surfaces`].
//! Every time a ray strikes a surface it is split, following Schlick's
//! approximation of the Fresnel equations, into a reflected ray and
//! (unless total internal reflection occurs) a refracted ray. Each surface
//! may only be struck a bounded number of times per pass, which guarantees
//! termination.

pub use nalgebra;

use nalgebra::{SVector, Unit};

mod config;
mod edit;
mod emitter;
mod engine;
mod error;
pub mod geometry;
mod lines;
pub mod optics;
mod ray;
mod surface;

pub use config::*;
pub use edit::*;
pub use emitter::*;
pub use engine::*;
pub use error::*;
pub use lines::*;
pub use ray::*;
pub use surface::*;

pub type Float = f64;

/// A point, or a vector, in the plane.
pub type Vector = SVector<Float, 2>;

/// A vector of (approximately) unit length.
pub type Direction = Unit<Vector>;

/// The z-component of the 3D cross product of `u` and `v`.
#[inline]
pub fn cross(u: &Vector, v: &Vector) -> Float {
    u.x * v.y - u.y * v.x
}
