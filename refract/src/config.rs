use crate::Float;

/// Tunables of a propagation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// How many times a single surface may be struck during one pass.
    ///
    /// A surface that reached this count is ignored by every subsequent
    /// intersection search of the pass.
    pub activation_cap: usize,
    /// Tolerance, in segment parameter space, for hits landing on (or
    /// slightly beyond) a segment's endpoints.
    pub boundary_eps: Float,
    /// Hits closer than this to the origin of a spawned ray are ignored.
    ///
    /// Keeps a ray spawned on a vertex shared by two surfaces from striking
    /// the neighbouring surface where it stands.
    pub min_distance: Float,
    /// The length given to unbounded rays when turned into line segments.
    pub unbounded_length: Float,
    /// Spawned rays carrying this much energy or less are dropped.
    ///
    /// `0.0` keeps every ray, leaving only the activation cap to bound a pass.
    pub min_energy: Float,
}

impl EngineConfig {
    pub const DEFAULT_ACTIVATION_CAP: usize = 100;
    pub const DEFAULT_BOUNDARY_EPS: Float = 1e-9;
    pub const DEFAULT_UNBOUNDED_LENGTH: Float = 1e4;
    pub const DEFAULT_MIN_DISTANCE: Float = 1e-6;

    #[inline]
    #[must_use]
    pub fn with_activation_cap(mut self, activation_cap: usize) -> Self {
        self.activation_cap = activation_cap;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_min_energy(mut self, min_energy: Float) -> Self {
        self.min_energy = min_energy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_unbounded_length(mut self, unbounded_length: Float) -> Self {
        self.unbounded_length = unbounded_length;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            activation_cap: Self::DEFAULT_ACTIVATION_CAP,
            boundary_eps: Self::DEFAULT_BOUNDARY_EPS,
            min_distance: Self::DEFAULT_MIN_DISTANCE,
            unbounded_length: Self::DEFAULT_UNBOUNDED_LENGTH,
            min_energy: 0.0,
        }
    }
}
