use core::f64::consts::PI;

use super::*;

/// A light source, emitting full-energy rays in the direction given by an angle.
#[derive(Clone, Debug, PartialEq)]
pub struct Emitter {
    pub origin: Vector,
    /// Radians, counter-clockwise from the x axis.
    pub angle: Float,
}

impl Emitter {
    /// A quarter of a degree.
    pub const ANGLE_STEP: Float = PI / 720.0;

    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Vector>, angle: Float) -> Self {
        Self {
            origin: origin.into(),
            angle,
        }
    }

    /// An emitter placed at `ray`'s origin, aimed along its direction.
    #[inline]
    #[must_use]
    pub fn aimed_like(ray: &Ray) -> Self {
        Self::new(ray.origin, ray.direction.y.atan2(ray.direction.x))
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        let (sin, cos) = self.angle.sin_cos();
        // cos² + sin² = 1
        Unit::new_unchecked(Vector::new(cos, sin))
    }

    #[inline]
    pub fn seed(&self) -> Ray {
        Ray::seed(self.origin, self.direction())
    }

    /// `count` parallel seeds, each `spacing` further along the y axis than the previous.
    pub fn fan(&self, count: usize, spacing: Float) -> impl Iterator<Item = Ray> + '_ {
        (0..count).map(move |i| Ray::seed(self.origin + Vector::new(0., spacing * i as Float), self.direction()))
    }

    /// Turns by `steps` times [`Self::ANGLE_STEP`] (counter-clockwise if positive).
    #[inline]
    pub fn rotate(&mut self, steps: i32) {
        self.angle += Self::ANGLE_STEP * Float::from(steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_seed_direction() {
        let mut emitter = Emitter::new([50., 60.], 0.);
        let seed = emitter.seed();

        assert_eq!(seed.origin, Vector::new(50., 60.));
        assert_relative_eq!(seed.direction.x, 1.);
        assert_eq!(seed.energy, 1.);

        emitter.rotate(360);
        let d = emitter.direction();
        assert_relative_eq!(d.x, 0., epsilon = 1e-12);
        assert_relative_eq!(d.y, 1., epsilon = 1e-12);

        emitter.rotate(-720);
        assert_relative_eq!(emitter.direction().y, -1., epsilon = 1e-12);
    }

    #[test]
    fn test_aimed_like_round_trips() {
        let ray = Ray::try_seed([1., 2.], [-3., 4.]).unwrap();
        let emitter = Emitter::aimed_like(&ray);

        assert_eq!(emitter.origin, ray.origin);
        assert_relative_eq!(emitter.direction().x, -0.6, epsilon = 1e-12);
        assert_relative_eq!(emitter.direction().y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_fan() {
        let emitter = Emitter::new([50., 60.], 0.);
        let origins: Vec<_> = emitter.fan(3, 2.).map(|r| r.origin).collect();

        assert_eq!(
            origins,
            [Vector::new(50., 60.), Vector::new(50., 62.), Vector::new(50., 64.)]
        );
    }
}
