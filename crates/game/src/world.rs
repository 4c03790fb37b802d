//! Puts the generated terrain layout into the scene: ground, trees, rivers.

use std::f32::consts::FRAC_PI_2;

use engine_core::{Material, Quat, Scene, SceneError, Shape, Transform, Vec3};
use procgen::TerrainLayout;

const GRASS: u32 = 0x4caf50;
const TRUNK: u32 = 0x8b4513;
const LEAVES: u32 = 0x228b22;
const WATER: u32 = 0x0077be;
const WATER_OPACITY: f32 = 0.7;
const WATER_DEPTH: f32 = 0.1;

/// Handles for the static world geometry.
#[derive(Debug)]
pub struct WorldVisual {
    pub tree_count: usize,
    pub water_count: usize,
}

impl WorldVisual {
    pub fn build(scene: &mut Scene, layout: &TerrainLayout) -> Result<Self, SceneError> {
        let root = scene.create_group();
        let cfg = &layout.config;

        // Plane primitive faces +Z; lay it flat.
        let ground = Transform::from_position_rotation(
            Vec3::new(0.0, cfg.ground_height, 0.0),
            Quat::from_rotation_x(-FRAC_PI_2),
        );
        scene.create_child(
            root,
            Shape::Plane {
                size: cfg.ground_size,
            },
            Material::lambert(GRASS),
            ground,
        )?;

        for &base in &layout.trees {
            let tree = scene.create_child_group(root, Transform::from_position(base))?;
            scene.create_child(
                tree,
                Shape::cuboid(1.0, 4.0, 1.0),
                Material::lambert(TRUNK),
                Transform::from_position(Vec3::new(0.0, 2.0, 0.0)),
            )?;
            scene.create_child(
                tree,
                Shape::cuboid(3.0, 3.0, 3.0),
                Material::lambert(LEAVES),
                Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
            )?;
        }

        let water = Material::unlit(WATER).with_opacity(WATER_OPACITY);
        for tile in &layout.water_tiles {
            scene.create_child(
                root,
                Shape::cuboid(tile.size, WATER_DEPTH, tile.size),
                water,
                Transform::from_position(tile.center),
            )?;
        }

        log::debug!(
            "World geometry: {} trees, {} water tiles, {} scene nodes",
            layout.trees.len(),
            layout.water_tiles.len(),
            scene.object_count()
        );

        Ok(Self {
            tree_count: layout.trees.len(),
            water_count: layout.water_tiles.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::{NoiseGrid, TerrainConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> TerrainConfig {
        TerrainConfig {
            ground_size: 100.0,
            resolution: 10,
            tree_candidates: 40,
            edge_margin: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn every_prop_gets_geometry() {
        let layout = TerrainLayout::generate(TerrainConfig {
            seed: 7,
            ..small_config()
        });
        let mut scene = Scene::new();
        let world = WorldVisual::build(&mut scene, &layout).unwrap();

        assert_eq!(world.tree_count, layout.trees.len());
        assert_eq!(world.water_count, layout.water_tiles.len());
        // root + ground + 3 per tree + 1 per tile
        let expected = 2 + 3 * world.tree_count + world.water_count;
        assert_eq!(scene.object_count(), expected);
    }

    #[test]
    fn all_water_grid_has_no_trees() {
        let grid = NoiseGrid::from_fn(10, 10, |_, _| 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let layout = TerrainLayout::from_grid(grid, &mut rng, small_config());
        let mut scene = Scene::new();
        let world = WorldVisual::build(&mut scene, &layout).unwrap();

        assert_eq!(world.tree_count, 0);
        assert_eq!(world.water_count, 100);
        let ground = scene.draw_list().iter().filter(|d| !d.material.is_transparent()).count();
        assert_eq!(ground, 1);
    }
}
