//! Transform component and utilities for spatial positioning.
//!
//! Local axes follow the aircraft convention: `+Z` is the nose (forward),
//! `+Y` is up and `+X` points out of the left wing when viewed from behind.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Local forward (+Z) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Map a local-space offset to world space (rotation then translation; scale ignored).
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_forward_is_positive_z() {
        let t = Transform::default();
        assert_eq!(t.forward(), Vec3::Z);
    }

    #[test]
    fn forward_follows_rotation() {
        let t = Transform::from_position_rotation(
            Vec3::new(0.0, 3.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        assert!(t.forward().abs_diff_eq(Vec3::X, 1.0e-5));
    }

    #[test]
    fn transform_point_rotates_then_offsets() {
        let t = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let p = t.transform_point(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1.0e-5));
    }
}
