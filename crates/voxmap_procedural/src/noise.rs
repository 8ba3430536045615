//! # Simplex Noise
//!
//! 2D simplex noise driving terrain height, vegetation and tree placement.
//!
//! Same `WorldSeed`, same values, on every platform.

use serde::{Deserialize, Serialize};

/// World seed. Every generator derives its own stream from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Independent sub-seed for `purpose`.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut h = self.0 ^ purpose;
        h = h.wrapping_mul(0x517c_c1b7_2722_0a95);
        h ^= h >> 32;
        Self(h)
    }

    /// Deterministic 64-bit hash of an integer lattice point.
    #[inline]
    #[must_use]
    pub const fn hash2(self, x: i32, z: i32) -> u64 {
        let mut h = self.0 ^ (x as u32 as u64) ^ ((z as u32 as u64) << 32);
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
        h ^= h >> 33;
        h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        h ^ (h >> 33)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x5EED_0F_600D_1A4D)
    }
}

/// Gradients for 2D simplex corners.
const GRADIENTS: [[f64; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
];

/// Skew factor `(sqrt(3) - 1) / 2`.
const F2: f64 = 0.366_025_403_784_438_6;
/// Unskew factor `(3 - sqrt(3)) / 6`.
const G2: f64 = 0.211_324_865_405_187_1;

/// 2D simplex noise in `[-1, 1]`.
pub struct SimplexNoise {
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Builds the permutation table for `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);

        // Fisher-Yates with xorshift64.
        let mut state = seed.value() | 1;
        for i in (1..table.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            table.swap(i, (state % (i as u64 + 1)) as usize);
        }

        Self {
            perm: std::array::from_fn(|i| table[i & 255]),
        }
    }

    #[inline]
    fn hash(&self, i: i64, j: i64) -> usize {
        let inner = self.perm[(j & 255) as usize] as usize;
        self.perm[((i & 255) as usize + inner) & 511] as usize
    }

    #[inline]
    fn corner(&self, x: f64, y: f64, hash: usize) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t <= 0.0 {
            return 0.0;
        }
        let [gx, gy] = GRADIENTS[hash & 7];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }

    /// Single-octave noise at `(x, y)`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor() as i64;
        let j = (y + s).floor() as i64;

        let t = (i + j) as f64 * G2;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };
        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let n = self.corner(x0, y0, self.hash(i, j))
            + self.corner(x1, y1, self.hash(i + i1, j + j1))
            + self.corner(x2, y2, self.hash(i + 1, j + 1));

        (70.0 * n).clamp(-1.0, 1.0)
    }

    /// Fractal noise: `octaves` layers, each at `lacunarity` times the
    /// frequency and `persistence` times the amplitude of the previous one.
    /// Normalized back to `[-1, 1]`.
    #[must_use]
    pub fn fbm(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        if octaves == 0 {
            return 0.0;
        }
        let (mut total, mut norm) = (0.0, 0.0);
        let (mut amplitude, mut frequency) = (1.0, 1.0);
        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            norm += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        total / norm
    }
}
