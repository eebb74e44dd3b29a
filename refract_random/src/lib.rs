use refract::{nalgebra::Unit, *};

use core::iter;
pub use rand;

pub trait Random: Sized {
    /// Generate a randomized version of `Self` using the provided `rng`
    ///
    /// This method must not fail. If creating a value is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

/// Half the side of the square random scenes are generated in.
pub const SCENE_EXTENT: Float = 300.0;

impl Random for Ray {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let origin = rand_vect(rng, SCENE_EXTENT);

        let direction = loop {
            if let Some(v) = Unit::try_new(rand_vect(rng, 1.0), Float::EPSILON * 8.0) {
                break v;
            }
        };

        Ray::seed(origin, direction)
    }
}

impl Random for Surface {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        loop {
            let a = rand_vect(rng, SCENE_EXTENT);
            let b = a + rand_vect(rng, SCENE_EXTENT / 3.0);

            // ratios of common media pairs, in both directions
            let ratio: Float = rng.gen_range(1.0..2.5);
            let ratio = if rng.gen_bool(0.5) { ratio } else { ratio.recip() };

            if let Ok(surface) = Surface::try_new(a, b, ratio) {
                break surface;
            }
        }
    }
}

impl Random for Surfaces {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        const MIN_NUM_SURFACES: usize = 1;
        const MAX_NUM_SURFACES: usize = 16;
        let n = rng.gen_range(MIN_NUM_SURFACES..MAX_NUM_SURFACES);

        gen_random(n, rng).into()
    }
}

pub fn gen_random<T: Random>(n: usize, rng: &mut (impl rand::Rng + ?Sized)) -> Vec<T> {
    iter::repeat_with(|| T::random(rng)).take(n).collect()
}

/// A handful of random seed rays.
pub fn random_seeds(rng: &mut (impl rand::Rng + ?Sized)) -> Vec<Ray> {
    const MIN_NUM_RAYS: usize = 1;
    const MAX_NUM_RAYS: usize = 4;
    let num_rays = rng.gen_range(MIN_NUM_RAYS..MAX_NUM_RAYS);

    gen_random(num_rays, rng)
}

pub fn random_simulation(rng: &mut (impl rand::Rng + ?Sized)) -> (Surfaces, Vec<Ray>) {
    let surfaces = Surfaces::random(rng);
    (surfaces, random_seeds(rng))
}

pub fn rand_vect(rng: &mut (impl rand::Rng + ?Sized), max_coord_mag: Float) -> Vector {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly
    Vector::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}
