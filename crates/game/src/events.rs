//! Window event handling for GameState.

use input::{KeyCode, PhysicalKey};
use winit::event::WindowEvent;

use crate::GameState;

impl GameState {
    /// Returns true when the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera.set_aspect(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.process_keyboard(event.physical_key, event.state);
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) && event.state.is_pressed() {
                    log::info!("Escape pressed, shutting down");
                    self.running = false;
                    return true;
                }
                false
            }
            // Key-up events are lost while unfocused; drop everything held.
            WindowEvent::Focused(false) => {
                self.input.release_all();
                false
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.update() {
                    log::error!("Frame failed: {:#}", e);
                    self.running = false;
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}
