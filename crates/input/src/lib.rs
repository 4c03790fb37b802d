//! Keyboard input handling.
//!
//! Only "currently held" matters to the simulation: there is no event queue
//! and no debouncing. Key-down latches a key, key-up clears it.

mod bindings;

pub use bindings::*;

use std::collections::HashSet;

/// Latched set of keys currently held down.
#[derive(Debug, Default)]
pub struct InputState {
    keys_held: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the held state of a key. Idempotent.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    /// Process a keyboard event from the window. Keys the platform could
    /// not identify are ignored.
    pub fn process_keyboard(&mut self, key: PhysicalKey, state: ElementState) {
        match key {
            PhysicalKey::Code(code) => self.set_key(code, state == ElementState::Pressed),
            PhysicalKey::Unidentified(native) => {
                log::trace!("Ignoring unidentified key {:?}", native);
            }
        }
    }

    /// Check if a key is currently held. Unknown keys are never held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Release every key (e.g. when the window loses focus and key-up events
    /// will never arrive).
    pub fn release_all(&mut self) {
        self.keys_held.clear();
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::{KeyCode, PhysicalKey};

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn unknown_keys_default_to_released() {
        let input = InputState::new();
        assert!(!input.is_key_held(KeyCode::KeyT));
    }

    #[test]
    fn set_key_is_idempotent() {
        let mut input = InputState::new();
        input.set_key(KeyCode::Space, true);
        input.set_key(KeyCode::Space, true);
        assert!(input.is_key_held(KeyCode::Space));
        input.set_key(KeyCode::Space, false);
        assert!(!input.is_key_held(KeyCode::Space));
        input.set_key(KeyCode::Space, false);
        assert!(!input.is_key_held(KeyCode::Space));
    }

    #[test]
    fn keyboard_events_latch_and_release() {
        let mut input = InputState::new();
        input.process_keyboard(PhysicalKey::Code(KeyCode::ArrowUp), ElementState::Pressed);
        assert!(input.is_key_held(KeyCode::ArrowUp));
        input.process_keyboard(PhysicalKey::Code(KeyCode::ArrowUp), ElementState::Released);
        assert!(!input.is_key_held(KeyCode::ArrowUp));
    }

    #[test]
    fn unidentified_keys_are_ignored() {
        let mut input = InputState::new();
        input.process_keyboard(
            PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
            ElementState::Pressed,
        );
        assert!(!input.is_key_held(KeyCode::Space));
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut input = InputState::new();
        input.set_key(KeyCode::KeyC, true);
        input.set_key(KeyCode::KeyT, true);
        input.release_all();
        assert!(!input.is_key_held(KeyCode::KeyC));
        assert!(!input.is_key_held(KeyCode::KeyT));
    }
}
