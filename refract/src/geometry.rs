//! Ray/segment intersection.

use super::*;

/// Where a ray meets a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub point: Vector,
    /// Distance travelled by the ray before reaching `point`.
    pub distance: Float,
}

/// Returns the parameters `(t, s)` such that `origin + t * dir == a + s * edge`,
/// or `None` if the two lines are (nearly) parallel.
#[inline]
pub fn line_parameters(
    origin: &Vector,
    dir: &Vector,
    a: &Vector,
    edge: &Vector,
) -> Option<(Float, Float)> {
    let det = cross(dir, edge);

    // dividing by `det` here would produce infinities or NaNs
    if det.abs() <= Float::EPSILON * dir.norm() * edge.norm() {
        return None;
    }

    let w = a - origin;

    Some((cross(&w, edge) / det, cross(&w, dir) / det))
}

/// Intersects the forward half-line of `ray` with the finite segment `surface`.
///
/// Hits landing up to `eps` (in units of the segment's length) beyond
/// either endpoint are accepted.
///
/// Returns `None` if the ray is parallel to the surface, points away from
/// it, or passes beside it.
#[inline]
pub fn intersect(ray: &Ray, surface: &Surface, eps: Float) -> Option<Hit> {
    let (t, s) = line_parameters(&ray.origin, ray.direction.as_ref(), surface.a(), &surface.edge())?;

    (t >= 0.0 && (-eps..=1.0 + eps).contains(&s)).then(|| Hit {
        point: ray.at(t),
        distance: t,
    })
}
