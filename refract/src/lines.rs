use super::*;

/// A line segment to draw, weighted by the energy it carries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vector,
    pub end: Vector,
    pub energy: Float,
}

impl Ray {
    /// From the origin to the first hit, or `unbounded_length` along the
    /// ray if it escapes.
    #[inline]
    pub fn segment(&self, unbounded_length: Float) -> Segment {
        Segment {
            start: self.origin,
            end: self.end(unbounded_length),
            energy: self.energy,
        }
    }
}

impl Surface {
    #[inline]
    pub fn segment(&self) -> Segment {
        Segment {
            start: *self.a(),
            end: *self.b(),
            energy: 1.0,
        }
    }
}

impl Trace {
    /// One segment per resolved ray, in processing order.
    #[inline]
    pub fn segments<'a>(&'a self, config: &'a EngineConfig) -> impl Iterator<Item = Segment> + 'a {
        self.rays.iter().map(|r| r.segment(config.unbounded_length))
    }
}

impl Surfaces {
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.iter().map(|(_, s)| s.segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_segments() {
        let mut surfaces: Surfaces = [Surface::try_new([160., 40.], [160., 320.], 1.5).unwrap()]
            .into_iter()
            .collect();
        let config = EngineConfig::default().with_unbounded_length(1000.);
        let propagator = Propagator::new(config);

        let seed = Ray::try_seed([50., 60.], [1., 0.]).unwrap();
        let trace = propagator.propagate(&mut surfaces, seed);
        let segments: Vec<_> = trace.segments(propagator.config()).collect();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start, Vector::new(50., 60.));
        assert_eq!(segments[0].end, Vector::new(160., 60.));
        assert_eq!(segments[1].end, Vector::new(-840., 60.));
        assert_eq!(segments[2].end, Vector::new(1160., 60.));

        let walls: Vec<_> = surfaces.segments().collect();
        assert_eq!(walls[0].start, Vector::new(160., 40.));
        assert_eq!(walls[0].end, Vector::new(160., 320.));
    }
}
