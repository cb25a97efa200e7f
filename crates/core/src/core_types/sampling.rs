//! Random sampling helpers for particle spawning and splash forcing
//!
//! Every vector sampler draws its components independently, so the result is
//! axis-aligned box noise rather than a direction on a sphere. All helpers take
//! the generator explicitly; the scene owns a seedable `StdRng` and lends it out.
//!
//! Ranges are plain `Range<f32>` naming the two bounds of an interval.
//! Reversed ranges (`start > end`) are valid and sample the same interval as
//! their ordered form, which is how the default spawn depth (-1.5 to -4.5) is
//! expressed. Every sampler returns values at or above the lower bound and
//! strictly below the upper bound.

use crate::core_types::Vec3;
use rand::Rng;
use std::ops::Range;

/// Fixed depth component for particle scale vectors
///
/// Particles are drawn as flattened spheres; only width and height vary.
pub const SCALE_DEPTH: f32 = 0.1;

/// Sample a float from the interval spanned by `a` and `b`
///
/// The bounds may come in either order. With `lo = min(a, b)` and
/// `hi = max(a, b)` the result lies in `[lo, hi)`; equal bounds return that
/// value.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use splash_sim_core::core_types::uniform;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let v = uniform(&mut rng, 1.0, 5.0);
/// assert!((1.0..5.0).contains(&v));
///
/// let depth = uniform(&mut rng, -1.5, -4.5);
/// assert!((-4.5..-1.5).contains(&depth));
/// ```
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi || !lo.is_finite() || !hi.is_finite() {
        return lo;
    }

    let value = rng.random_range(lo..hi);
    // Float rounding in the sampler can land exactly on `hi`
    if value < hi {
        value
    } else {
        next_below(hi)
    }
}

/// Largest `f32` strictly below a finite `x`
fn next_below(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else if x < 0.0 {
        f32::from_bits(x.to_bits() + 1)
    } else {
        -f32::from_bits(1)
    }
}

/// Fair coin flip
#[inline]
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random::<bool>()
}

#[inline]
fn uniform_in<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> f32 {
    uniform(rng, range.start, range.end)
}

/// Vector with every component drawn from the same range
///
/// Used for velocity noise: initial drop drift and splash launch velocity.
pub fn uniform_vec3<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> Vec3 {
    Vec3::new(
        uniform_in(rng, range),
        uniform_in(rng, range),
        uniform_in(rng, range),
    )
}

/// Spawn position biased towards a region above and in front of the origin
///
/// Each axis has its own range.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    x: &Range<f32>,
    y: &Range<f32>,
    z: &Range<f32>,
) -> Vec3 {
    Vec3::new(uniform_in(rng, x), uniform_in(rng, y), uniform_in(rng, z))
}

/// Visual size vector: width and height sampled, depth fixed to [`SCALE_DEPTH`]
pub fn scale_vec3<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> Vec3 {
    Vec3::new(uniform_in(rng, range), uniform_in(rng, range), SCALE_DEPTH)
}

/// Stochastic splash acceleration, re-drawn every step
///
/// Components are drawn from `range`. The x component is always halved and
/// pushed backwards; a coin flip decides whether y and z point down-and-back
/// or up-and-forward, which gives the corona its lopsided spread.
pub fn splash_acceleration<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> Vec3 {
    let x = uniform_in(rng, range);
    let y = uniform_in(rng, range);
    let z = uniform_in(rng, range);

    if coin_flip(rng) {
        Vec3::new(-x * 0.5, y, z)
    } else {
        Vec3::new(-x * 0.5, -y, -z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Generator stuck at its largest output
    struct SaturatedRng;

    impl RngCore for SaturatedRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(u8::MAX);
        }
    }

    fn between(v: f32, a: f32, b: f32) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        v >= lo && v <= hi
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -1.5, 1.5);
            assert!(between(v, -1.5, 1.5), "{v} out of range");
        }
    }

    #[test]
    fn test_uniform_reversed_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -1.5, -4.5);
            assert!(between(v, -4.5, -1.5), "{v} out of range");
        }
    }

    #[test]
    fn test_uniform_never_returns_upper_bound() {
        let bounds = [
            (5.5, 7.5),
            (1.0, 5.0),
            (-1.5, -4.5),
            (0.0, 0.05),
            (-1.5, 1.5),
            (0.0, 50.0),
        ];
        for (a, b) in bounds {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let v = uniform(&mut SaturatedRng, a, b);
            assert!(v >= lo && v < hi, "uniform({a}, {b}) = {v}");
        }
    }

    #[test]
    fn test_spawn_position_excludes_region_max() {
        let depth = Range {
            start: -1.5,
            end: -4.5,
        };
        let p = spawn_position(&mut SaturatedRng, &(1.0..5.0), &(5.5..7.5), &depth);
        assert!(p.x < 5.0);
        assert!(p.y < 7.5);
        assert!(p.z < -1.5 && p.z >= -4.5);
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(uniform(&mut rng, 2.0, 2.0), 2.0);
    }

    #[test]
    fn test_coin_flip_is_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(4);
        let heads = (0..10_000).filter(|_| coin_flip(&mut rng)).count();
        assert!((4_500..5_500).contains(&heads), "heads = {heads}");
    }

    #[test]
    fn test_components_are_independent() {
        // Joint sampling would give x == y == z; independent draws almost never do
        let mut rng = StdRng::seed_from_u64(5);
        let v = uniform_vec3(&mut rng, &(0.0..1.0));
        assert!(v.x != v.y || v.y != v.z);
    }

    #[test]
    fn test_spawn_position_uses_per_axis_ranges() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..200 {
            let depth = Range {
                start: -1.5,
                end: -4.5,
            };
            let p = spawn_position(&mut rng, &(1.0..5.0), &(5.5..7.5), &depth);
            assert!(between(p.x, 1.0, 5.0));
            assert!(between(p.y, 5.5, 7.5));
            assert!(between(p.z, -4.5, -1.5));
        }
    }

    #[test]
    fn test_scale_depth_is_fixed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let s = scale_vec3(&mut rng, &(0.1..0.35));
            assert_eq!(s.z, SCALE_DEPTH);
            assert!(between(s.x, 0.1, 0.35));
            assert!(between(s.y, 0.1, 0.35));
        }
    }

    #[test]
    fn test_splash_acceleration_shape() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut saw_up = false;
        let mut saw_down = false;
        for _ in 0..500 {
            let a = splash_acceleration(&mut rng, &(0.0..50.0));
            assert!(a.x <= 0.0 && a.x >= -25.0);
            // y and z always share a sign
            assert!(a.y * a.z >= 0.0);
            saw_up |= a.y > 0.0;
            saw_down |= a.y < 0.0;
        }
        assert!(saw_up && saw_down);
    }
}
