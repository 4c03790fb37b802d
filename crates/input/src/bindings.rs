//! Flight control bindings and the per-frame control snapshot.

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::InputState;

/// A flight control the pilot can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ThrottleUp,
    ThrottleDown,
    PitchUp,
    PitchDown,
    RollLeft,
    RollRight,
    FireGuns,
    FireRockets,
}

/// Key assigned to each control. Defaults: T/G throttle, arrows for pitch
/// and roll, Space for guns, C for rockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlBindings {
    pub throttle_up: KeyCode,
    pub throttle_down: KeyCode,
    pub pitch_up: KeyCode,
    pub pitch_down: KeyCode,
    pub roll_left: KeyCode,
    pub roll_right: KeyCode,
    pub fire_guns: KeyCode,
    pub fire_rockets: KeyCode,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            throttle_up: KeyCode::KeyT,
            throttle_down: KeyCode::KeyG,
            pitch_up: KeyCode::ArrowUp,
            pitch_down: KeyCode::ArrowDown,
            roll_left: KeyCode::ArrowLeft,
            roll_right: KeyCode::ArrowRight,
            fire_guns: KeyCode::Space,
            fire_rockets: KeyCode::KeyC,
        }
    }
}

impl ControlBindings {
    pub fn key_for(&self, control: Control) -> KeyCode {
        match control {
            Control::ThrottleUp => self.throttle_up,
            Control::ThrottleDown => self.throttle_down,
            Control::PitchUp => self.pitch_up,
            Control::PitchDown => self.pitch_down,
            Control::RollLeft => self.roll_left,
            Control::RollRight => self.roll_right,
            Control::FireGuns => self.fire_guns,
            Control::FireRockets => self.fire_rockets,
        }
    }
}

/// Immutable view of the held flight controls for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightInput {
    pub throttle_up: bool,
    pub throttle_down: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    pub fire_guns: bool,
    pub fire_rockets: bool,
}

impl FlightInput {
    /// Sample the currently held keys through `bindings`.
    pub fn sample(input: &InputState, bindings: &ControlBindings) -> Self {
        let held = |control| input.is_key_held(bindings.key_for(control));
        Self {
            throttle_up: held(Control::ThrottleUp),
            throttle_down: held(Control::ThrottleDown),
            pitch_up: held(Control::PitchUp),
            pitch_down: held(Control::PitchDown),
            roll_left: held(Control::RollLeft),
            roll_right: held(Control::RollRight),
            fire_guns: held(Control::FireGuns),
            fire_rockets: held(Control::FireRockets),
        }
    }

    /// Snapshot with a single control held. Handy for scripted input.
    pub fn only(control: Control) -> Self {
        let mut input = Self::default();
        input.set(control, true);
        input
    }

    pub fn set(&mut self, control: Control, held: bool) {
        let slot = match control {
            Control::ThrottleUp => &mut self.throttle_up,
            Control::ThrottleDown => &mut self.throttle_down,
            Control::PitchUp => &mut self.pitch_up,
            Control::PitchDown => &mut self.pitch_down,
            Control::RollLeft => &mut self.roll_left,
            Control::RollRight => &mut self.roll_right,
            Control::FireGuns => &mut self.fire_guns,
            Control::FireRockets => &mut self.fire_rockets,
        };
        *slot = held;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_maps_default_bindings() {
        let mut input = InputState::new();
        input.set_key(KeyCode::KeyT, true);
        input.set_key(KeyCode::Space, true);
        let snapshot = FlightInput::sample(&input, &ControlBindings::default());
        assert!(snapshot.throttle_up);
        assert!(snapshot.fire_guns);
        assert!(!snapshot.fire_rockets);
        assert!(!snapshot.pitch_up);
    }

    #[test]
    fn rebinding_moves_the_control() {
        let bindings = ControlBindings {
            fire_rockets: KeyCode::KeyR,
            ..Default::default()
        };
        let mut input = InputState::new();
        input.set_key(KeyCode::KeyC, true);
        assert!(!FlightInput::sample(&input, &bindings).fire_rockets);
        input.set_key(KeyCode::KeyR, true);
        assert!(FlightInput::sample(&input, &bindings).fire_rockets);
    }

    #[test]
    fn only_sets_a_single_control() {
        let snapshot = FlightInput::only(Control::RollLeft);
        assert_eq!(
            snapshot,
            FlightInput {
                roll_left: true,
                ..Default::default()
            }
        );
    }
}
