//! Reflection, refraction (Snell's law) and Fresnel reflectance (Schlick's
//! approximation) at a surface, in vector form.
//!
//! Every function takes the incident unit direction `d`, the surface's unit
//! normal `n`, and, where relevant, the surface's refractive index ratio `m`
//! (incident medium index / transmitted medium index). The normal may point
//! either way, the sign of `n · d` tells whether the ray enters or exits.

use super::*;

/// The unit normal of the segment `[a ; b]`: `b - a` rotated by a quarter
/// turn clockwise, then normalized.
///
/// `a` and `b` must be distinct.
#[inline]
pub fn normal(a: &Vector, b: &Vector) -> Direction {
    let e = b - a;
    Unit::new_normalize(Vector::new(e.y, -e.x))
}

/// `1 - m² (1 - (n · d)²)`, the squared normal component of the refracted
/// direction. Negative under total internal reflection.
#[inline]
fn discriminant(d: &Direction, n: &Direction, m: Float) -> Float {
    let c = n.dot(d.as_ref());
    1.0 - m * m * (1.0 - c * c)
}

#[inline]
pub fn total_internal_reflection(d: &Direction, n: &Direction, m: Float) -> bool {
    discriminant(d, n, m) < 0.0
}

/// `d - 2 (d · n) n`
#[inline]
pub fn reflect(d: &Direction, n: &Direction) -> Direction {
    let n = n.as_ref();
    // orthogonal symmetry preserves euclidean norms
    Unit::new_unchecked(d.as_ref() - n * (2.0 * d.dot(n)))
}

/// The refracted direction, `None` under total internal reflection.
///
/// Both `± sqrt(k) n + m (d - (n · d) n)` satisfy Snell's law, the one
/// continuing on the same side of the surface as `d` is returned.
#[inline]
pub fn refract(d: &Direction, n: &Direction, m: Float) -> Option<Direction> {
    let k = discriminant(d, n, m);

    if k < 0.0 {
        return None;
    }

    let (n, c) = (n.as_ref(), n.dot(d.as_ref()));

    let tangent = (d.as_ref() - n * c) * m;
    let along_n = n * k.sqrt();

    let r1 = along_n + tangent;

    // |r|² = k + m² (1 - c²) = 1
    Some(Unit::new_unchecked(if c * n.dot(&r1) >= 0.0 {
        r1
    } else {
        tangent - along_n
    }))
}

/// Fraction of the incident energy that gets reflected.
#[inline]
pub fn reflectance(d: &Direction, n: &Direction, m: Float) -> Float {
    let r0 = ((1.0 - m) / (1.0 + m)).powi(2);
    let c = n.dot(d.as_ref());

    let x = if c > 0.0 { 1.0 - c } else { 1.0 + c };

    r0 + (1.0 - r0) * x.powi(5)
}

/// The outcome of a ray striking a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    /// Schlick reflectance at this angle of incidence.
    pub reflectance: Float,
    pub reflected: Direction,
    /// `None` under total internal reflection.
    pub refracted: Option<Direction>,
}

impl Split {
    #[inline]
    pub fn new(d: &Direction, n: &Direction, m: Float) -> Self {
        Self {
            reflectance: reflectance(d, n, m),
            reflected: reflect(d, n),
            refracted: refract(d, n, m),
        }
    }

    #[inline]
    pub fn is_total_internal_reflection(&self) -> bool {
        self.refracted.is_none()
    }

    /// Energies carried by the reflected and refracted rays, from a ray carrying `energy`.
    ///
    /// Their sum is always `energy`: the reflected ray takes everything under
    /// total internal reflection.
    #[inline]
    pub fn energies(&self, energy: Float) -> (Float, Option<Float>) {
        match self.refracted {
            Some(_) => {
                let reflected = energy * self.reflectance;
                (reflected, Some(energy - reflected))
            }
            None => (energy, None),
        }
    }
}
