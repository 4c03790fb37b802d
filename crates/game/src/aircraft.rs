//! Arcade flight model: input-driven pose and throttle for the player aircraft.
//!
//! There is no aerodynamics here. Pitch and roll are direct angular rates
//! from the keys, and the aircraft always flies along its own nose axis at
//! the current speed, so turning bends the flight path.

use std::f32::consts::TAU;

use engine_core::Transform;
use glam::{Quat, Vec3};
use input::FlightInput;
use serde::{Deserialize, Serialize};

/// Left wing gun/rocket mount in aircraft-local space.
pub const LEFT_MOUNT: Vec3 = Vec3::new(-3.5, 0.2, 0.0);
/// Right wing gun/rocket mount in aircraft-local space.
pub const RIGHT_MOUNT: Vec3 = Vec3::new(3.5, 0.2, 0.0);

/// Flight tuning. Loaded from the `flight` section of `config.ron`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AircraftConfig {
    pub min_speed: f32,
    pub max_speed: f32,
    /// Throttle change per second while a throttle key is held.
    pub speed_increment: f32,
    /// Pitch and roll rate in radians per second.
    pub rotate_speed: f32,
    pub initial_speed: f32,
    /// Propeller radians per second per unit of speed.
    pub propeller_spin: f32,
}

impl Default for AircraftConfig {
    fn default() -> Self {
        Self {
            min_speed: 1.0,
            max_speed: 15.0,
            speed_increment: 1.0,
            rotate_speed: 2.0,
            initial_speed: 5.0,
            propeller_spin: 2.0,
        }
    }
}

impl AircraftConfig {
    /// Repair a hand-edited config so the speed bounds make sense.
    pub fn sanitized(mut self) -> Self {
        if self.min_speed > self.max_speed {
            log::warn!(
                "flight.min_speed {} exceeds max_speed {}, swapping",
                self.min_speed,
                self.max_speed
            );
            std::mem::swap(&mut self.min_speed, &mut self.max_speed);
        }
        self.initial_speed = self.initial_speed.clamp(self.min_speed, self.max_speed);
        self
    }
}

/// World-space spawn data for one trigger pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireSolution {
    /// Left and right wing mounts in world space.
    pub mounts: [Vec3; 2],
    /// Unit travel direction (the aircraft's nose).
    pub direction: Vec3,
    /// Aircraft orientation at the moment of firing.
    pub orientation: Quat,
}

/// Pose and throttle of the aircraft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftState {
    pub position: Vec3,
    /// Accumulated rotation about local X (radians). Negative is nose up.
    pub pitch: f32,
    /// Accumulated rotation about local Z (radians).
    pub roll: f32,
    pub speed: f32,
    /// Cosmetic propeller angle in [0, TAU).
    pub propeller_angle: f32,
}

impl AircraftState {
    pub fn at_rest(speed: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            pitch: 0.0,
            roll: 0.0,
            speed,
            propeller_angle: 0.0,
        }
    }

    /// Orientation composed as pitch then roll (`Rx * Rz`).
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_z(self.roll)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.orientation())
    }

    /// Unit vector along the nose.
    pub fn forward(&self) -> Vec3 {
        self.transform().forward()
    }

    /// Map an aircraft-local offset into world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.transform().transform_point(local)
    }

    pub fn fire_solution(&self) -> FireSolution {
        FireSolution {
            mounts: [self.local_to_world(LEFT_MOUNT), self.local_to_world(RIGHT_MOUNT)],
            direction: self.forward().normalize(),
            orientation: self.orientation(),
        }
    }
}

/// Owns the aircraft state and integrates input into it once per frame.
#[derive(Debug, Clone)]
pub struct AircraftController {
    config: AircraftConfig,
    state: AircraftState,
}

impl AircraftController {
    pub fn new(config: AircraftConfig) -> Self {
        let config = config.sanitized();
        Self {
            config,
            state: AircraftState::at_rest(config.initial_speed),
        }
    }

    pub fn state(&self) -> &AircraftState {
        &self.state
    }

    /// Advance one frame.
    ///
    /// Order: move along the current nose, adjust throttle, then pitch and
    /// roll. Opposing keys are applied one after the other, so holding both
    /// throttle keys nets out and holding both pitch keys cancels exactly.
    pub fn update(&mut self, dt: f32, input: &FlightInput) {
        let cfg = self.config;
        let s = &mut self.state;

        s.position += s.forward() * (s.speed * dt);

        if input.throttle_up {
            s.speed = (s.speed + cfg.speed_increment * dt).min(cfg.max_speed);
        }
        if input.throttle_down {
            s.speed = (s.speed - cfg.speed_increment * dt).max(cfg.min_speed);
        }

        let step = cfg.rotate_speed * dt;
        if input.pitch_up {
            s.pitch -= step;
        }
        if input.pitch_down {
            s.pitch += step;
        }
        if input.roll_left {
            s.roll -= step;
        }
        if input.roll_right {
            s.roll += step;
        }

        s.propeller_angle = (s.propeller_angle + s.speed * cfg.propeller_spin * dt).rem_euclid(TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::Control;

    const EPS: f32 = 1.0e-5;

    fn controller() -> AircraftController {
        AircraftController::new(AircraftConfig::default())
    }

    #[test]
    fn level_flight_moves_along_nose() {
        let mut aircraft = controller();
        aircraft.update(1.0, &FlightInput::default());
        assert!(aircraft.state().position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPS));
        assert_eq!(aircraft.state().speed, 5.0);
    }

    #[test]
    fn throttle_stays_within_bounds() {
        let mut aircraft = controller();
        let up = FlightInput::only(Control::ThrottleUp);
        let down = FlightInput::only(Control::ThrottleDown);
        for dt in [0.016, 0.5, 3.0, 10.0, 0.001] {
            for _ in 0..50 {
                aircraft.update(dt, &up);
                let speed = aircraft.state().speed;
                assert!((1.0..=15.0).contains(&speed), "speed {speed} out of range");
            }
        }
        assert_eq!(aircraft.state().speed, 15.0);
        for _ in 0..200 {
            aircraft.update(0.5, &down);
            let speed = aircraft.state().speed;
            assert!((1.0..=15.0).contains(&speed), "speed {speed} out of range");
        }
        assert_eq!(aircraft.state().speed, 1.0);
    }

    #[test]
    fn both_throttle_keys_net_out_mid_range() {
        let mut aircraft = controller();
        let both = FlightInput {
            throttle_up: true,
            throttle_down: true,
            ..Default::default()
        };
        aircraft.update(0.5, &both);
        assert!((aircraft.state().speed - 5.0).abs() < EPS);
    }

    #[test]
    fn both_throttle_keys_at_max_drop_below_max() {
        // Sequential clamped adds: up is clamped first, then down still applies.
        let mut aircraft = AircraftController::new(AircraftConfig {
            initial_speed: 15.0,
            ..Default::default()
        });
        let both = FlightInput {
            throttle_up: true,
            throttle_down: true,
            ..Default::default()
        };
        aircraft.update(1.0, &both);
        assert!((aircraft.state().speed - 14.0).abs() < EPS);
    }

    #[test]
    fn pitch_keys_change_local_x_rotation() {
        let mut aircraft = controller();
        aircraft.update(0.25, &FlightInput::only(Control::PitchUp));
        assert!((aircraft.state().pitch + 0.5).abs() < EPS);
        aircraft.update(0.25, &FlightInput::only(Control::PitchDown));
        assert!(aircraft.state().pitch.abs() < EPS);

        let both = FlightInput {
            pitch_up: true,
            pitch_down: true,
            ..Default::default()
        };
        aircraft.update(1.0, &both);
        assert!(aircraft.state().pitch.abs() < EPS);
    }

    #[test]
    fn roll_keys_rotate_opposite_ways() {
        let mut aircraft = controller();
        aircraft.update(0.5, &FlightInput::only(Control::RollLeft));
        assert!((aircraft.state().roll + 1.0).abs() < EPS);
        aircraft.update(1.0, &FlightInput::only(Control::RollRight));
        assert!((aircraft.state().roll - 1.0).abs() < EPS);
    }

    #[test]
    fn pitching_bends_the_flight_path() {
        let mut aircraft = controller();
        // Nose up a quarter turn, then fly one second.
        aircraft.update(std::f32::consts::FRAC_PI_4, &FlightInput::only(Control::PitchUp));
        let before = aircraft.state().position;
        aircraft.update(1.0, &FlightInput::default());
        let moved = aircraft.state().position - before;
        // Rx(-pi/2) maps +Z to +Y: the aircraft climbs.
        assert!(moved.abs_diff_eq(Vec3::new(0.0, 5.0, 0.0), 1.0e-4));
    }

    #[test]
    fn propeller_spins_with_speed() {
        let mut aircraft = controller();
        aircraft.update(0.1, &FlightInput::default());
        assert!((aircraft.state().propeller_angle - 1.0).abs() < EPS);
        aircraft.update(0.1, &FlightInput::only(Control::FireGuns));
        assert!((aircraft.state().propeller_angle - 2.0).abs() < EPS);
    }

    #[test]
    fn mounts_follow_pose() {
        let mut state = AircraftState::at_rest(5.0);
        state.position = Vec3::new(10.0, 0.0, 0.0);
        state.roll = std::f32::consts::PI;
        let solution = state.fire_solution();
        // Rolled upside down: the left mount swaps sides and drops below.
        assert!(solution.mounts[0].abs_diff_eq(Vec3::new(13.5, -0.2, 0.0), 1.0e-4));
        assert!(solution.mounts[1].abs_diff_eq(Vec3::new(6.5, -0.2, 0.0), 1.0e-4));
        assert!(solution.direction.abs_diff_eq(Vec3::Z, 1.0e-5));
    }

    #[test]
    fn fire_direction_is_the_nose() {
        let mut state = AircraftState::at_rest(5.0);
        state.pitch = -0.6;
        state.roll = 0.9;
        let nose = state.orientation() * Vec3::Z;
        assert!(state.forward().abs_diff_eq(nose, 1.0e-6));
        assert!(state.fire_solution().direction.abs_diff_eq(nose, 1.0e-6));
    }

    #[test]
    fn inverted_speed_bounds_are_repaired() {
        let config = AircraftConfig {
            min_speed: 20.0,
            max_speed: 2.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.min_speed, 2.0);
        assert_eq!(config.max_speed, 20.0);
        assert_eq!(config.initial_speed, 5.0);
    }
}
