//! Terrain layout: where trees stand and where river tiles go.
//!
//! Everything here is decided once at startup from a [`NoiseGrid`] and a
//! seeded RNG, so the same seed always produces the same landscape. The
//! layout only carries positions; turning them into meshes is the scene
//! builder's job.

use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::noise_grid::{CellKind, NoiseGrid};

/// Derive the prop RNG seed from the world seed so grid and props don't share a stream.
#[inline]
fn prop_seed(seed: u64) -> u64 {
    seed.wrapping_mul(0x9e3779b97f4a7c15).wrapping_add(0x6c078965)
}

/// Configuration for terrain layout.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Side length of the square ground, in world units.
    pub ground_size: f32,
    /// Noise grid cells per side.
    pub resolution: usize,
    /// Number of candidate tree positions (some land in water and are dropped).
    pub tree_candidates: usize,
    /// Keep trees this far inside the ground edge.
    pub edge_margin: f32,
    /// Height of the ground plane.
    pub ground_height: f32,
    /// Height trees are planted at.
    pub tree_height: f32,
    /// Height of the river tile centres.
    pub water_height: f32,
    /// Seed for both the noise grid and prop placement.
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            ground_size: 1000.0,
            resolution: 100,
            tree_candidates: 500,
            edge_margin: 20.0,
            ground_height: -5.0,
            tree_height: -4.5,
            water_height: -4.7,
            seed: 0,
        }
    }
}

/// A square slab of water covering one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterTile {
    pub center: Vec3,
    pub size: f32,
}

/// Final placement of props and water.
#[derive(Debug)]
pub struct TerrainLayout {
    pub grid: NoiseGrid,
    pub trees: Vec<Vec3>,
    pub water_tiles: Vec<WaterTile>,
    pub config: TerrainConfig,
}

impl TerrainLayout {
    /// Generate grid, trees and rivers for `config.seed`.
    pub fn generate(config: TerrainConfig) -> Self {
        let grid = NoiseGrid::generate_seeded(config.resolution, config.resolution, config.seed);
        let mut rng = StdRng::seed_from_u64(prop_seed(config.seed));
        Self::from_grid(grid, &mut rng, config)
    }

    /// Lay out props over an existing grid.
    pub fn from_grid<R: Rng + ?Sized>(grid: NoiseGrid, rng: &mut R, config: TerrainConfig) -> Self {
        let trees = place_trees(&grid, rng, &config);
        let water_tiles = place_water(&grid, &config);
        log::info!(
            "Terrain layout: {} trees, {} water tiles (seed {})",
            trees.len(),
            water_tiles.len(),
            config.seed
        );
        Self {
            grid,
            trees,
            water_tiles,
            config,
        }
    }

    /// Grid cell under a world-space XZ position, clamped to the grid.
    pub fn cell_at(&self, x: f32, z: f32) -> (usize, usize) {
        world_to_cell(&self.grid, &self.config, x, z)
    }
}

fn world_to_cell(grid: &NoiseGrid, config: &TerrainConfig, x: f32, z: f32) -> (usize, usize) {
    let half = config.ground_size / 2.0;
    let to_index = |p: f32, cells: usize| -> usize {
        let i = (((p + half) / config.ground_size) * cells as f32).floor();
        (i.max(0.0) as usize).min(cells.saturating_sub(1))
    };
    (to_index(x, grid.width()), to_index(z, grid.height()))
}

/// Scatter candidates uniformly inside the margin; keep those over land.
fn place_trees<R: Rng + ?Sized>(grid: &NoiseGrid, rng: &mut R, config: &TerrainConfig) -> Vec<Vec3> {
    let half = config.ground_size / 2.0;
    let extent = (half - config.edge_margin).max(0.0);
    let mut trees = Vec::new();

    for _ in 0..config.tree_candidates {
        let x = rng.gen::<f32>() * 2.0 * extent - extent;
        let z = rng.gen::<f32>() * 2.0 * extent - extent;
        let (cx, cz) = world_to_cell(grid, config, x, z);
        if grid.is_land(cx, cz) {
            trees.push(Vec3::new(x, config.tree_height, z));
        }
    }
    trees
}

/// One tile per water cell, centred on the cell.
fn place_water(grid: &NoiseGrid, config: &TerrainConfig) -> Vec<WaterTile> {
    if grid.width() == 0 {
        return Vec::new();
    }
    let half = config.ground_size / 2.0;
    let tile = config.ground_size / grid.width() as f32;

    grid.cells()
        .filter(|&(_, _, v)| CellKind::classify(v) == CellKind::Water)
        .map(|(x, y, _)| WaterTile {
            center: Vec3::new(
                x as f32 * tile - half + tile / 2.0,
                config.water_height,
                y as f32 * tile - half + tile / 2.0,
            ),
            size: tile,
        })
        .collect()
}
