use std::collections::VecDeque;

use log::{debug, trace};

use super::*;

/// Counters describing one propagation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Rays that struck a surface.
    pub hits: usize,
    /// Hits where no refracted ray could exist.
    pub total_internal_reflections: usize,
    /// Rays that left the scene without hitting anything.
    pub escaped: usize,
    /// Spawned rays discarded because their energy fell to `min_energy` or below.
    pub dropped: usize,
    /// Deepest interaction count reached by a resolved ray.
    pub max_depth: usize,
}

/// Every ray resolved during a pass, in processing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    pub rays: Vec<Ray>,
    pub stats: PassStats,
}

impl Trace {
    /// An upper bound on the number of rays a pass can ever produce
    /// (every hit spawns at most two rays, and there are at most
    /// `num_surfaces * activation_cap` hits).
    #[inline]
    pub fn max_rays(num_seeds: usize, num_surfaces: usize, activation_cap: usize) -> usize {
        num_surfaces
            .saturating_mul(activation_cap)
            .saturating_mul(2)
            .saturating_add(num_seeds)
    }

    /// Total energy of the rays that escaped the scene.
    #[inline]
    pub fn escaped_energy(&self) -> Float {
        self.rays
            .iter()
            .filter(|r| !r.is_bounded())
            .map(|r| r.energy)
            .sum()
    }
}

/// Runs propagation passes over a set of surfaces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Propagator {
    config: EngineConfig,
}

impl Propagator {
    #[inline]
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a pass starting from a single seed ray.
    #[inline]
    pub fn propagate(&self, surfaces: &mut Surfaces, seed: Ray) -> Trace {
        self.propagate_all(surfaces, [seed])
    }

    /// Runs a pass starting from all `seeds` at once: they share the
    /// surfaces' activation budgets.
    ///
    /// Activation counts are reset before the pass starts, and are left
    /// as they are when it ends.
    pub fn propagate_all(
        &self,
        surfaces: &mut Surfaces,
        seeds: impl IntoIterator<Item = Ray>,
    ) -> Trace {
        surfaces.reset_activations();

        let mut pending: VecDeque<Ray> = seeds.into_iter().collect();
        let num_seeds = pending.len();

        let mut trace = Trace {
            rays: Vec::with_capacity(num_seeds),
            stats: PassStats::default(),
        };

        while let Some(mut ray) = pending.pop_front() {
            trace.stats.max_depth = trace.stats.max_depth.max(ray.depth);

            match surfaces.nearest_hit(&ray, &self.config) {
                Some((id, hit)) => {
                    ray.length = Some(hit.distance);
                    self.resolve_hit(&ray, &mut surfaces[id], id, hit, &mut pending, &mut trace.stats);
                }
                None => trace.stats.escaped += 1,
            }

            trace.rays.push(ray);
        }

        debug!(
            "pass over {} surface(s) from {} seed(s): {} ray(s), {:?}",
            surfaces.len(),
            num_seeds,
            trace.rays.len(),
            trace.stats,
        );

        trace
    }

    /// Records `ray`'s hit on `surface` and queues the rays it spawns.
    fn resolve_hit(
        &self,
        ray: &Ray,
        surface: &mut Surface,
        id: SurfaceId,
        hit: geometry::Hit,
        pending: &mut VecDeque<Ray>,
        stats: &mut PassStats,
    ) {
        surface.activate();
        stats.hits += 1;

        let split = optics::Split::new(&ray.direction, &surface.normal(), surface.ratio());
        let (reflected_energy, refracted_energy) = split.energies(ray.energy);

        trace!(
            "ray at depth {} hit {id} at ({:.3}, {:.3}), d = {:.3}, R = {:.4}{}",
            ray.depth,
            hit.point.x,
            hit.point.y,
            hit.distance,
            split.reflectance,
            if split.is_total_internal_reflection() { ", TIR" } else { "" },
        );

        if split.is_total_internal_reflection() {
            stats.total_internal_reflections += 1;
        }

        let children = [
            Some((RayKind::Reflected, split.reflected, reflected_energy)),
            split
                .refracted
                .zip(refracted_energy)
                .map(|(dir, energy)| (RayKind::Refracted, dir, energy)),
        ];

        for (kind, direction, energy) in children.into_iter().flatten() {
            if self.config.min_energy > 0.0 && energy <= self.config.min_energy {
                stats.dropped += 1;
                continue;
            }

            pending.push_back(ray.spawn(kind, hit.point, direction, energy, id));
        }
    }
}
