// Coherent 2D gradient noise used as the only randomness source for terrain.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Deterministic lattice noise with a shuffled permutation table.
///
/// Output is continuous and stays within `[-1, 1]`.
#[derive(Clone)]
pub struct NoiseField {
    // 256 entries duplicated so corner lookups never wrap.
    perm: [u8; 512],
}

impl NoiseField {
    /// Builds a field whose permutation is fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Builds a field from OS entropy for per-session variety.
    pub fn from_entropy() -> Self {
        Self::from_rng(&mut ChaCha8Rng::from_entropy())
    }

    fn from_rng(rng: &mut ChaCha8Rng) -> Self {
        let mut base: Vec<u8> = (0..=255u8).collect();
        base.shuffle(rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;

        let x = x - xf;
        let y = y - yf;
        let u = fade(x);
        let v = fade(y);

        let a = self.perm[xi] as usize + yi;
        let b = self.perm[xi + 1] as usize + yi;

        let bottom = lerp(
            u,
            grad(self.perm[a], x, y),
            grad(self.perm[b], x - 1.0, y),
        );
        let top = lerp(
            u,
            grad(self.perm[a + 1], x, y - 1.0),
            grad(self.perm[b + 1], x - 1.0, y - 1.0),
        );
        lerp(v, bottom, top).clamp(-1.0, 1.0)
    }

    /// Noise remapped to `[0, 1]`.
    pub fn unit(&self, x: f64, y: f64) -> f64 {
        (self.noise(x, y) + 1.0) / 2.0
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
