use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const F3: f32 = 1.0 / 3.0;
const G3: f32 = 1.0 / 6.0;

const GRAD3: [[f32; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Seeded 3D simplex noise
///
/// Smooth, deterministic for a given seed, output in [-1, 1].
#[derive(Clone)]
pub struct Simplex3 {
    perm: [u8; 512],
}

impl Simplex3 {
    /// Build the permutation table from a seeded shuffle of 0..256
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; 256] = [0; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        Self { perm }
    }

    fn gradient_index(&self, i: i32, j: i32, k: i32) -> usize {
        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let kk = (k & 255) as usize;
        self.perm[ii + self.perm[jj + self.perm[kk] as usize] as usize] as usize % 12
    }

    fn corner(&self, t: f32, gi: usize, x: f32, y: f32, z: f32) -> f32 {
        if t < 0.0 {
            return 0.0;
        }
        let g = GRAD3[gi];
        let t2 = t * t;
        t2 * t2 * (g[0] * x + g[1] * y + g[2] * z)
    }

    /// Sample the field at (x, y, z)
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        // Skew into simplex cell space
        let s = (x + y + z) * F3;
        let i = (x + s).floor() as i32;
        let j = (y + s).floor() as i32;
        let k = (z + s).floor() as i32;

        let t = (i + j + k) as f32 * G3;
        let x0 = x - (i as f32 - t);
        let y0 = y - (j as f32 - t);
        let z0 = z - (k as f32 - t);

        // Which of the six tetrahedra we are in
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f32 + G3;
        let y1 = y0 - j1 as f32 + G3;
        let z1 = z0 - k1 as f32 + G3;
        let x2 = x0 - i2 as f32 + 2.0 * G3;
        let y2 = y0 - j2 as f32 + 2.0 * G3;
        let z2 = z0 - k2 as f32 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let n0 = self.corner(
            0.6 - x0 * x0 - y0 * y0 - z0 * z0,
            self.gradient_index(i, j, k),
            x0,
            y0,
            z0,
        );
        let n1 = self.corner(
            0.6 - x1 * x1 - y1 * y1 - z1 * z1,
            self.gradient_index(i + i1, j + j1, k + k1),
            x1,
            y1,
            z1,
        );
        let n2 = self.corner(
            0.6 - x2 * x2 - y2 * y2 - z2 * z2,
            self.gradient_index(i + i2, j + j2, k + k2),
            x2,
            y2,
            z2,
        );
        let n3 = self.corner(
            0.6 - x3 * x3 - y3 * y3 - z3 * z3,
            self.gradient_index(i + 1, j + 1, k + 1),
            x3,
            y3,
            z3,
        );

        // NaN passes through clamp untouched
        (32.0 * (n0 + n1 + n2 + n3)).clamp(-1.0, 1.0)
    }
}

impl Default for Simplex3 {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Debug for Simplex3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simplex3")
            .field("perm_head", &&self.perm[..8])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic_per_seed() {
        let a = Simplex3::new(42);
        let b = Simplex3::new(42);
        assert_eq!(a.sample(0.3, 1.7, -2.2), b.sample(0.3, 1.7, -2.2));
    }

    #[test]
    fn permutation_covers_every_byte_once() {
        let noise = Simplex3::new(1234);
        let mut seen = [false; 256];
        for &v in &noise.perm[..256] {
            assert!(!seen[v as usize], "duplicate {}", v);
            seen[v as usize] = true;
        }
        assert_eq!(noise.perm[..256], noise.perm[256..]);
    }

    #[test]
    fn noise_differs_between_seeds() {
        let a = Simplex3::new(1);
        let b = Simplex3::new(2);
        let differs = (0..32).any(|i| {
            let x = i as f32 * 0.37;
            a.sample(x, x * 0.5, 1.0) != b.sample(x, x * 0.5, 1.0)
        });
        assert!(differs);
    }

    #[test]
    fn noise_stays_in_unit_range() {
        let noise = Simplex3::new(7);
        for i in 0..2000 {
            let f = i as f32;
            let v = noise.sample(f * 0.131, f * 0.077 - 3.0, f * 0.019 + 1.0);
            assert!((-1.0..=1.0).contains(&v), "sample {} out of range", v);
        }
    }

    #[test]
    fn noise_is_zero_on_lattice_origin() {
        // All corner contributions vanish at integer skewed coordinates
        let noise = Simplex3::new(3);
        assert_eq!(noise.sample(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn noise_is_continuous() {
        let noise = Simplex3::new(9);
        let a = noise.sample(1.2345, 0.5, -0.25);
        let b = noise.sample(1.2346, 0.5, -0.25);
        assert!((a - b).abs() < 0.01);
    }
}
