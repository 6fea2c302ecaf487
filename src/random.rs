//! Deterministic random sampling for ray tracing.
//!
//! Wraps a seeded ChaCha20 PRNG in an explicitly passed [`Sampler`] handle so
//! that every stochastic decision draws from a known stream in a known order.
//! A fixed seed reproduces an identical image bit-for-bit; parallel render
//! workers get independent streams derived from the same seed.

use glam::Vec3A;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Upper bound on rejection-sampling retries.
///
/// The expected draw count per accepted sample is ~1.27, so 100 tries is
/// unreachable for a healthy stream; the cap keeps a degenerate stream from
/// hanging a render worker.
const MAX_REJECTS: u32 = 100;

/// Seeded random stream for one render worker.
///
/// All stochastic decisions (sub-pixel jitter, lens sampling, scatter
/// directions) draw from a `Sampler` that the caller threads through the
/// pipeline; there is no global generator.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: ChaCha20Rng,
}

impl Sampler {
    /// Create a sampler from a top-level seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Create the sampler for one image row.
    ///
    /// Uses ChaCha's stream counter so every row draws from an independent
    /// stream of the same seeded generator. Row order and thread scheduling
    /// cannot affect the result.
    pub fn for_row(seed: u64, row: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(row);
        Self { rng }
    }

    /// Generate a random f32 in [0.0, 1.0)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random()
    }

    /// Generate a random f32 in [min, max)
    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Sample a random point inside the unit disk (z = 0).
    ///
    /// Rejection sampling over the [-1, 1] square, capped at [`MAX_REJECTS`]
    /// tries with the disk center as the fallback sample.
    pub fn in_unit_disk(&mut self) -> Vec3A {
        for _ in 0..MAX_REJECTS {
            let p = Vec3A::new(
                2.0 * self.next_f32() - 1.0,
                2.0 * self.next_f32() - 1.0,
                0.0,
            );
            if p.length_squared() < 1.0 {
                return p;
            }
        }
        Vec3A::ZERO
    }

    /// Sample a random point inside the unit sphere.
    ///
    /// Same rejection scheme as [`Sampler::in_unit_disk`], in three
    /// dimensions.
    pub fn in_unit_sphere(&mut self) -> Vec3A {
        for _ in 0..MAX_REJECTS {
            let p = Vec3A::new(
                2.0 * self.next_f32() - 1.0,
                2.0 * self.next_f32() - 1.0,
                2.0 * self.next_f32() - 1.0,
            );
            if p.length_squared() < 1.0 {
                return p;
            }
        }
        Vec3A::ZERO
    }

    /// Generate random RGB color with components in [0.0, 1.0).
    pub fn color(&mut self) -> Vec3A {
        Vec3A::new(self.next_f32(), self.next_f32(), self.next_f32())
    }

    /// Generate random RGB color with components in [min, max).
    pub fn color_range(&mut self, min: f32, max: f32) -> Vec3A {
        Vec3A::new(
            self.next_f32_range(min, max),
            self.next_f32_range(min, max),
            self.next_f32_range(min, max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Sampler::new(7);
        let mut b = Sampler::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Sampler::new(1);
        let mut b = Sampler::new(2);
        let same = (0..16).filter(|_| a.next_f32() == b.next_f32()).count();
        assert!(same < 16);
    }

    #[test]
    fn rows_are_independent_streams() {
        let mut a = Sampler::for_row(42, 0);
        let mut b = Sampler::for_row(42, 1);
        let same = (0..16).filter(|_| a.next_f32() == b.next_f32()).count();
        assert!(same < 16);

        // The same row always replays the same stream.
        let mut c = Sampler::for_row(42, 1);
        let mut d = Sampler::for_row(42, 1);
        for _ in 0..32 {
            assert_eq!(c.next_f32(), d.next_f32());
        }
    }

    #[test]
    fn floats_in_unit_range() {
        let mut s = Sampler::new(3);
        for _ in 0..256 {
            let x = s.next_f32();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn disk_samples_stay_in_disk() {
        let mut s = Sampler::new(11);
        for _ in 0..256 {
            let p = s.in_unit_disk();
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn sphere_samples_stay_in_sphere() {
        let mut s = Sampler::new(13);
        for _ in 0..256 {
            assert!(s.in_unit_sphere().length_squared() < 1.0);
        }
    }
}
