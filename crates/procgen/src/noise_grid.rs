//! Smoothed value-noise grid used to lay out land and rivers.
//!
//! The grid is filled with independent uniform samples, then blurred once
//! with a 3x3 box filter. Edge cells average over the neighbours that exist
//! (no wraparound, no padding). The grid is built once and never changes.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Cells strictly above this value are land; the rest is water.
pub const LAND_THRESHOLD: f32 = 0.3;

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Land,
    Water,
}

impl CellKind {
    pub fn classify(value: f32) -> Self {
        if value > LAND_THRESHOLD {
            CellKind::Land
        } else {
            CellKind::Water
        }
    }
}

/// 2D grid of values in [0, 1], indexed `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl NoiseGrid {
    /// Random fill followed by one smoothing pass.
    pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        Self::from_fn(width, height, |_, _| rng.gen::<f32>()).smoothed()
    }

    /// Reproducible grid for a given seed.
    pub fn generate_seeded(width: usize, height: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(width, height, &mut rng)
    }

    /// Build an unsmoothed grid from a per-cell function.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self { width, height, values }
    }

    /// One 3x3 box-blur pass. Each cell becomes the mean of itself and its
    /// in-bounds neighbours.
    pub fn smoothed(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            let mut sum = 0.0;
            let mut count = 0u32;
            for ny in y.saturating_sub(1)..=(y + 1).min(self.height - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(self.width - 1) {
                    sum += self.values[ny * self.width + nx];
                    count += 1;
                }
            }
            sum / count as f32
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.values[y * self.width + x])
        } else {
            None
        }
    }

    pub fn cell_kind(&self, x: usize, y: usize) -> Option<CellKind> {
        self.get(x, y).map(CellKind::classify)
    }

    pub fn is_land(&self, x: usize, y: usize) -> bool {
        self.cell_kind(x, y) == Some(CellKind::Land)
    }

    /// Iterate `(x, y, value)` over every cell in row order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % self.width, i / self.width, v))
    }
}
