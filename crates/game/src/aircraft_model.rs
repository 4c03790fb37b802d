//! Blocky fighter model built from scene primitives.

use std::f32::consts::{FRAC_PI_2, TAU};

use engine_core::{Material, ObjectHandle, Quat, Scene, SceneError, Shape, Transform, Vec3};

use crate::aircraft::AircraftState;

const BODY_BLUE: u32 = 0x19396d;
const ACCENT_BLUE: u32 = 0x254e8c;
const CANOPY: u32 = 0x87ceeb;
const COWLING: u32 = 0xd3d3d3;
const DARK_METAL: u32 = 0x333333;
const WOOD: u32 = 0x8b4513;
const ROUNDEL: u32 = 0xffffff;

/// Propeller hub offset from the aircraft origin.
const PROPELLER_OFFSET: Vec3 = Vec3::new(0.0, 0.2, 2.95);
const BLADE_COUNT: usize = 3;

/// Render handles for the aircraft: the root group and the spinning propeller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AircraftVisual {
    pub root: ObjectHandle,
    pub propeller: ObjectHandle,
}

impl AircraftVisual {
    /// Assemble the model under a fresh root group.
    pub fn build(scene: &mut Scene) -> Result<Self, SceneError> {
        let root = scene.create_group();
        let body = Material::lambert(BODY_BLUE);
        let accent = Material::lambert(ACCENT_BLUE);

        let parts = [
            // Fuselage
            (Shape::cuboid(1.0, 0.8, 5.0), body, at(0.0, 0.2, 0.0)),
            // Canopy
            (
                Shape::cuboid(0.8, 0.4, 1.2),
                Material::lambert(CANOPY).with_opacity(0.7),
                at(0.0, 0.7, 0.5),
            ),
            // Engine cowling, cylinder laid along the nose
            (
                Shape::Cylinder {
                    radius_top: 0.6,
                    radius_bottom: 0.5,
                    height: 1.0,
                    segments: 8,
                },
                Material::lambert(COWLING),
                rotated_x(at(0.0, 0.2, 2.4), FRAC_PI_2),
            ),
            // Wings
            (Shape::cuboid(3.5, 0.15, 1.4), body, at(-2.25, 0.2, 0.2)),
            (Shape::cuboid(3.5, 0.15, 1.4), body, at(2.25, 0.2, 0.2)),
            // Tail boom and stabilisers
            (Shape::cuboid(0.8, 0.6, 1.5), body, at(0.0, 0.2, -2.0)),
            (Shape::cuboid(0.1, 1.0, 1.2), accent, at(0.0, 0.8, -2.2)),
            (Shape::cuboid(2.4, 0.1, 0.6), accent, at(0.0, 0.5, -2.2)),
            // Propeller hub
            (
                Shape::Sphere {
                    radius: 0.2,
                    segments: 8,
                },
                Material::lambert(DARK_METAL),
                at(0.0, 0.2, 2.9),
            ),
            // Landing gear
            (Shape::cuboid(0.2, 0.3, 0.4), Material::lambert(DARK_METAL), at(-0.8, -0.3, 0.5)),
            (Shape::cuboid(0.2, 0.3, 0.4), Material::lambert(DARK_METAL), at(0.8, -0.3, 0.5)),
            // Roundels on the upper wing surface
            (roundel(), Material::unlit(ROUNDEL), rotated_x(at(-2.0, 0.28, 0.2), -FRAC_PI_2)),
            (roundel(), Material::unlit(ROUNDEL), rotated_x(at(2.0, 0.28, 0.2), -FRAC_PI_2)),
        ];
        for (shape, material, local) in parts {
            scene.create_child(root, shape, material, local)?;
        }

        let propeller = scene.create_child_group(root, Transform::from_position(PROPELLER_OFFSET))?;
        for i in 0..BLADE_COUNT {
            let angle = TAU / BLADE_COUNT as f32 * i as f32;
            scene.create_child(
                propeller,
                Shape::cuboid(0.1, 1.8, 0.2),
                Material::lambert(WOOD),
                Transform::from_position_rotation(Vec3::ZERO, Quat::from_rotation_z(angle)),
            )?;
        }

        Ok(Self { root, propeller })
    }

    /// Copy the aircraft pose and propeller angle onto the model.
    pub fn sync(&self, scene: &mut Scene, state: &AircraftState) -> Result<(), SceneError> {
        scene.set_transform(self.root, state.transform())?;
        scene.set_orientation(self.propeller, Quat::from_rotation_z(state.propeller_angle))
    }
}

fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_position(Vec3::new(x, y, z))
}

fn rotated_x(mut transform: Transform, angle: f32) -> Transform {
    transform.rotation = Quat::from_rotation_x(angle);
    transform
}

fn roundel() -> Shape {
    Shape::Disc {
        radius: 0.4,
        segments: 16,
    }
}
