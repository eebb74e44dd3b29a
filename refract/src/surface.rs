use core::{
    fmt,
    ops::{Index, IndexMut},
};

use super::*;

/// Index of a surface in its [`Surfaces`] registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub usize);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A line segment separating two media, reflecting and refracting light.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    a: Vector,
    b: Vector,
    /// Incident medium index / transmitted medium index
    ratio: Float,
    /// Number of rays that struck this surface during the current pass.
    activation_count: usize,
}

fn check_ratio(ratio: Float) -> Result<Float> {
    (ratio.is_finite() && ratio > 0.0)
        .then_some(ratio)
        .ok_or(Error::InvalidRatio(ratio))
}

impl Surface {
    /// Returns an error if `a == b`, or if `ratio` isn't a finite, positive number.
    #[inline]
    pub fn try_new(a: impl Into<Vector>, b: impl Into<Vector>, ratio: Float) -> Result<Self> {
        let (a, b) = (a.into(), b.into());

        if a == b {
            return Err(Error::DegenerateSurface);
        }

        Ok(Self {
            a,
            b,
            ratio: check_ratio(ratio)?,
            activation_count: 0,
        })
    }

    #[inline]
    pub const fn a(&self) -> &Vector {
        &self.a
    }

    #[inline]
    pub const fn b(&self) -> &Vector {
        &self.b
    }

    #[inline]
    pub const fn ratio(&self) -> Float {
        self.ratio
    }

    #[inline]
    pub const fn activation_count(&self) -> usize {
        self.activation_count
    }

    /// `b - a`
    #[inline]
    pub fn edge(&self) -> Vector {
        self.b - self.a
    }

    /// The unit normal of this surface, `b - a` rotated by a quarter turn clockwise.
    #[inline]
    pub fn normal(&self) -> Direction {
        optics::normal(&self.a, &self.b)
    }

    /// Whether this surface has been struck `cap` times or more.
    #[inline]
    pub fn is_exhausted(&self, cap: usize) -> bool {
        self.activation_count >= cap
    }

    /// Moves the first endpoint. Fails, leaving `self` untouched, if it would land on `b`.
    #[inline]
    pub fn set_a(&mut self, a: impl Into<Vector>) -> Result<()> {
        let a = a.into();
        if a == self.b {
            return Err(Error::DegenerateSurface);
        }
        self.a = a;
        Ok(())
    }

    /// Moves the second endpoint. Fails, leaving `self` untouched, if it would land on `a`.
    #[inline]
    pub fn set_b(&mut self, b: impl Into<Vector>) -> Result<()> {
        let b = b.into();
        if b == self.a {
            return Err(Error::DegenerateSurface);
        }
        self.b = b;
        Ok(())
    }

    #[inline]
    pub fn set_ratio(&mut self, ratio: Float) -> Result<()> {
        self.ratio = check_ratio(ratio)?;
        Ok(())
    }

    #[inline]
    pub(crate) fn activate(&mut self) {
        self.activation_count += 1;
    }

    #[cfg(test)]
    pub(crate) fn set_activation_count(&mut self, count: usize) {
        self.activation_count = count;
    }
}

/// An ordered registry of surfaces, addressed by [`SurfaceId`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Surfaces {
    surfaces: Vec<Surface>,
}

impl Surfaces {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, surface: Surface) -> SurfaceId {
        self.surfaces.push(surface);
        SurfaceId(self.surfaces.len() - 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SurfaceId) -> Result<&Surface> {
        self.surfaces.get(id.0).ok_or(Error::UnknownSurface(id))
    }

    #[inline]
    pub fn get_mut(&mut self, id: SurfaceId) -> Result<&mut Surface> {
        self.surfaces.get_mut(id.0).ok_or(Error::UnknownSurface(id))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> + '_ {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(i, s)| (SurfaceId(i), s))
    }

    /// Sets every surface's activation count back to zero, ready for a new pass.
    #[inline]
    pub fn reset_activations(&mut self) {
        self.surfaces.iter_mut().for_each(|s| s.activation_count = 0);
    }

    /// Total number of hits recorded in the current pass.
    #[inline]
    pub fn total_activations(&self) -> usize {
        self.surfaces.iter().map(Surface::activation_count).sum()
    }

    /// The closest surface `ray` hits, skipping the surface it originates
    /// from and every surface that has reached `config.activation_cap`.
    ///
    /// Spawned rays ignore hits closer than `config.min_distance`.
    ///
    /// Ties resolve to the surface that comes first in the registry.
    pub fn nearest_hit(&self, ray: &Ray, config: &EngineConfig) -> Option<(SurfaceId, geometry::Hit)> {
        self.iter()
            .filter(|&(id, s)| ray.origin_surface != Some(id) && !s.is_exhausted(config.activation_cap))
            .filter_map(|(id, s)| geometry::intersect(ray, s, config.boundary_eps).map(|hit| (id, hit)))
            .filter(|(_, hit)| ray.origin_surface.is_none() || hit.distance >= config.min_distance)
            // `min_by` keeps the first of several equal elements
            .min_by(|(_, h1), (_, h2)| h1.distance.total_cmp(&h2.distance))
    }
}

impl Index<SurfaceId> for Surfaces {
    type Output = Surface;

    #[inline]
    fn index(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[id.0]
    }
}

impl IndexMut<SurfaceId> for Surfaces {
    #[inline]
    fn index_mut(&mut self, id: SurfaceId) -> &mut Surface {
        &mut self.surfaces[id.0]
    }
}

impl FromIterator<Surface> for Surfaces {
    fn from_iter<T: IntoIterator<Item = Surface>>(iter: T) -> Self {
        Self {
            surfaces: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Surface>> for Surfaces {
    fn from(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertical(x: Float) -> Surface {
        Surface::try_new([x, 40.], [x, 320.], 1.5).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_surface() {
        assert_eq!(
            Surface::try_new([1., 1.], [1., 1.], 1.5),
            Err(Error::DegenerateSurface)
        );
    }

    #[test]
    fn test_rejects_invalid_ratio() {
        assert_eq!(
            Surface::try_new([0., 0.], [1., 1.], 0.0),
            Err(Error::InvalidRatio(0.0))
        );
        assert!(Surface::try_new([0., 0.], [1., 1.], Float::NAN).is_err());
        assert!(vertical(1.).set_ratio(-2.0).is_err());
    }

    #[test]
    fn test_moving_endpoint_onto_other_fails() {
        let mut s = vertical(10.);
        assert_eq!(s.set_b([10., 40.]), Err(Error::DegenerateSurface));
        assert_eq!(*s.b(), Vector::new(10., 320.));

        s.set_a([0., 0.]).unwrap();
        assert_eq!(*s.a(), Vector::new(0., 0.));
    }

    #[test]
    fn test_unknown_surface() {
        let surfaces = Surfaces::from(vec![vertical(1.)]);
        assert!(surfaces.get(SurfaceId(0)).is_ok());
        assert_eq!(
            surfaces.get(SurfaceId(3)),
            Err(Error::UnknownSurface(SurfaceId(3)))
        );
    }

    #[test]
    fn test_nearest_hit_picks_closest() {
        let surfaces: Surfaces = [300., 160., 240.].into_iter().map(vertical).collect();
        let ray = Ray::try_seed([50., 60.], [1., 0.]).unwrap();

        let (id, hit) = surfaces.nearest_hit(&ray, &EngineConfig::default()).unwrap();

        assert_eq!(id, SurfaceId(1));
        assert_relative_eq!(hit.distance, 110.);
    }

    #[test]
    fn test_nearest_hit_skips_origin_surface() {
        let surfaces: Surfaces = [160., 240.].into_iter().map(vertical).collect();
        let mut ray = Ray::try_seed([160., 60.], [1., 0.]).unwrap();
        ray.origin_surface = Some(SurfaceId(0));

        let (id, hit) = surfaces.nearest_hit(&ray, &EngineConfig::default()).unwrap();

        assert_eq!(id, SurfaceId(1));
        assert_relative_eq!(hit.distance, 80.);
    }

    #[test]
    fn test_exhausted_surface_is_excluded() {
        let config = EngineConfig::default();
        let mut surfaces: Surfaces = [160.].into_iter().map(vertical).collect();
        surfaces
            .get_mut(SurfaceId(0))
            .unwrap()
            .set_activation_count(config.activation_cap);

        let ray = Ray::try_seed([50., 60.], [1., 0.]).unwrap();

        assert!(surfaces.nearest_hit(&ray, &config).is_none());

        surfaces.reset_activations();
        assert!(surfaces.nearest_hit(&ray, &config).is_some());
    }

    #[test]
    fn test_shared_vertex_is_left_behind() {
        let mut surfaces = Surfaces::new();
        let left = surfaces.push(Surface::try_new([100., -50.], [100., 0.], 1.5).unwrap());
        let right = surfaces.push(Surface::try_new([100., 0.], [150., 50.], 1.5).unwrap());
        let far = surfaces.push(Surface::try_new([240., -10.], [240., 10.], 1.5).unwrap());

        assert_eq!(right, SurfaceId(1));

        // spawned on the vertex, the ray must not strike `right` where it stands
        let mut ray = Ray::try_seed([100., 0.], [1., 0.]).unwrap();
        ray.origin_surface = Some(left);

        let (id, hit) = surfaces.nearest_hit(&ray, &EngineConfig::default()).unwrap();
        assert_eq!(id, far);
        assert_relative_eq!(hit.distance, 140.);

        // seeds have no such restriction
        ray.origin_surface = None;
        let (id, hit) = surfaces.nearest_hit(&ray, &EngineConfig::default()).unwrap();
        assert_eq!(id, left);
        assert_eq!(hit.distance, 0.);
    }

    #[test]
    fn test_ties_go_to_first_surface() {
        let surfaces: Surfaces = [160., 160.].into_iter().map(vertical).collect();
        let ray = Ray::try_seed([50., 60.], [1., 0.]).unwrap();

        let (id, _) = surfaces.nearest_hit(&ray, &EngineConfig::default()).unwrap();
        assert_eq!(id, SurfaceId(0));
    }
}
