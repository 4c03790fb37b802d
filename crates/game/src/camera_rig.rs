//! Chase camera that rides behind and above the aircraft.

use glam::Vec3;

use crate::aircraft::AircraftState;

/// Eye and look target in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Offsets are in aircraft-local space, so the camera rolls and pitches with
/// the aircraft instead of smoothing towards it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Eye position relative to the aircraft.
    pub follow_offset: Vec3,
    /// Look target relative to the aircraft.
    pub look_offset: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            follow_offset: Vec3::new(0.0, 2.0, -8.0),
            look_offset: Vec3::new(0.0, 0.0, 2.0),
        }
    }
}

impl CameraRig {
    pub fn compute(&self, aircraft: &AircraftState) -> CameraPose {
        let transform = aircraft.transform();
        CameraPose {
            eye: transform.transform_point(self.follow_offset),
            target: transform.transform_point(self.look_offset),
        }
    }
}
