use super::*;

/// How a ray came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Supplied by the caller, before the pass started.
    Seed,
    /// Bounced off `origin_surface`.
    Reflected,
    /// Went through `origin_surface`.
    Refracted,
}

/// A light ray, represented as a half-line carrying a fraction of the
/// source's energy.
#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line
    pub origin: Vector,
    /// the direction of the half-line
    pub direction: Direction,
    /// Fraction, in `[0 ; 1]`, of the light source's energy carried by this ray.
    pub energy: Float,
    /// Distance to the closest surface this ray hits, once resolved.
    ///
    /// `None` if the ray escapes the scene, or hasn't been resolved yet.
    pub length: Option<Float>,
    /// The surface this ray just left, never considered when searching for its intersection.
    pub origin_surface: Option<SurfaceId>,
    /// Number of surface interactions between the seed and this ray.
    pub depth: usize,
    pub kind: RayKind,
}

impl Ray {
    /// A full-energy seed ray with an already normalized direction.
    #[inline]
    #[must_use]
    pub fn seed(origin: impl Into<Vector>, direction: Direction) -> Self {
        Self {
            origin: origin.into(),
            direction,
            energy: 1.0,
            length: None,
            origin_surface: None,
            depth: 0,
            kind: RayKind::Seed,
        }
    }

    /// A full-energy seed ray, normalizing `direction`.
    ///
    /// Returns an error if `direction` is (close to) zero.
    #[inline]
    pub fn try_seed(origin: impl Into<Vector>, direction: impl Into<Vector>) -> Result<Self> {
        Unit::try_new(direction.into(), Float::EPSILON)
            .map(|direction| Self::seed(origin, direction))
            .ok_or(Error::ZeroDirection)
    }

    #[inline]
    #[must_use]
    pub fn with_energy(mut self, energy: Float) -> Self {
        self.energy = energy;
        self
    }

    /// A ray leaving `surface` from `origin`, one interaction deeper than `self`.
    #[inline]
    pub(crate) fn spawn(
        &self,
        kind: RayKind,
        origin: Vector,
        direction: Direction,
        energy: Float,
        surface: SurfaceId,
    ) -> Self {
        Self {
            origin,
            direction,
            energy,
            length: None,
            origin_surface: Some(surface),
            depth: self.depth + 1,
            kind,
        }
    }

    /// Get the point at distance `t` (can be negative) from the ray's origin
    #[inline]
    pub fn at(&self, t: Float) -> Vector {
        self.origin + self.direction.as_ref() * t
    }

    /// Whether this ray stops at a surface.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.length.is_some()
    }

    /// The point where this ray stops, `unbounded_length` away from the
    /// origin if it escapes the scene.
    #[inline]
    pub fn end(&self, unbounded_length: Float) -> Vector {
        self.at(self.length.unwrap_or(unbounded_length))
    }
}
