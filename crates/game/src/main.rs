//! Spitfire - arcade flight over procedurally generated countryside.

mod aircraft;
mod aircraft_model;
mod camera_rig;
mod config;
mod events;
mod scheduler;
mod weapons;
mod world;

use anyhow::Result;
use engine_core::Scene;
use input::{ControlBindings, FlightInput, InputState};
use procgen::{TerrainConfig, TerrainLayout};
use renderer::{Camera, Renderer};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use aircraft_model::AircraftVisual;
use camera_rig::CameraPose;
use config::GameConfig;
use scheduler::{FrameScheduler, FrameSink};
use weapons::{ProjectileKind, ProjectilePool};
use world::WorldVisual;

const WINDOW_TITLE: &str = "Spitfire";
/// Seconds between window title refreshes.
const TITLE_REFRESH_INTERVAL: f32 = 0.5;

/// Main game state: scene, simulation and the GPU side.
pub struct GameState {
    scene: Scene,
    input: InputState,
    bindings: ControlBindings,
    scheduler: FrameScheduler,

    // Renderer
    renderer: Renderer,
    camera: Camera,

    last_title_update: f32,
    running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.vsync).await?;
        let (width, height) = renderer.dimensions();
        let camera = Camera::new(width, height);

        let mut scene = Scene::new();
        let seed = config.resolve_terrain_seed();
        let layout = TerrainLayout::generate(TerrainConfig {
            seed,
            ..Default::default()
        });
        let world = WorldVisual::build(&mut scene, &layout)?;
        let aircraft = AircraftVisual::build(&mut scene)?;
        let scheduler = FrameScheduler::new(config.flight).with_visual(aircraft);

        log::info!(
            "World ready: seed {}, {} trees, {} water tiles, {} scene nodes",
            seed,
            world.tree_count,
            world.water_count,
            scene.object_count()
        );

        Ok(Self {
            scene,
            input: InputState::new(),
            bindings: config.controls,
            scheduler,
            renderer,
            camera,
            last_title_update: 0.0,
            running: true,
        })
    }

    /// Run one frame of simulation and draw it.
    fn update(&mut self) -> Result<()> {
        let flight = FlightInput::sample(&self.input, &self.bindings);
        let mut presenter = Presenter {
            renderer: &mut self.renderer,
            camera: &mut self.camera,
        };
        self.scheduler.frame(&flight, &mut self.scene, &mut presenter)?;
        self.refresh_title();
        Ok(())
    }

    fn refresh_title(&mut self) {
        let now = self.scheduler.state().time;
        if now - self.last_title_update < TITLE_REFRESH_INTERVAL {
            return;
        }
        self.last_title_update = now;
        let title = status_line(
            self.scheduler.aircraft().speed,
            &self.scheduler.state().projectiles,
            self.scheduler.clock().fps(),
        );
        self.renderer.window.set_title(&title);
    }
}

fn status_line(speed: f32, projectiles: &ProjectilePool, fps: f32) -> String {
    format!(
        "{} | speed {:.1} | bullets {} rockets {} | {:.0} fps",
        WINDOW_TITLE,
        speed,
        projectiles.count(ProjectileKind::Bullet),
        projectiles.count(ProjectileKind::Rocket),
        fps
    )
}

/// Points the GPU camera at the chase pose and draws the scene.
struct Presenter<'a> {
    renderer: &'a mut Renderer,
    camera: &'a mut Camera,
}

impl FrameSink for Presenter<'_> {
    fn present(&mut self, scene: &Scene, pose: &CameraPose) -> Result<()> {
        self.camera.look_at(pose.eye, pose.target);
        self.renderer.update_camera(self.camera);
        self.renderer.render_scene(scene)
    }
}

struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let mut window_attrs = Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));
            if config.fullscreen {
                window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
            }

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let state = pollster::block_on(GameState::new(window.clone(), config));
            match state {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.renderer.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║                   Spitfire                   ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  CONTROLS (defaults, see config.ron):        ║");
    println!("║    T / G       - Throttle up / down          ║");
    println!("║    Up / Down   - Pitch nose up / down        ║");
    println!("║    Left / Right - Roll                       ║");
    println!("║    Space       - Wing guns                   ║");
    println!("║    C           - Rockets                     ║");
    println!("║    Escape      - Quit                        ║");
    println!("╚══════════════════════════════════════════════╝");

    log::info!("Starting Spitfire");

    let event_loop = EventLoop::new()?;
    // Poll keeps redraws flowing without waiting on input events.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aircraft::AircraftState;

    #[test]
    fn status_line_counts_live_projectiles() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        let solution = AircraftState::at_rest(5.0).fire_solution();
        pool.request_fire(ProjectileKind::Bullet, &solution, 0.0, &mut scene);
        pool.request_fire(ProjectileKind::Rocket, &solution, 0.0, &mut scene);
        pool.request_fire(ProjectileKind::Bullet, &solution, 1.0, &mut scene);

        assert_eq!(
            status_line(7.3, &pool, 59.6),
            "Spitfire | speed 7.3 | bullets 4 rockets 2 | 60 fps"
        );
        assert_eq!(
            status_line(5.0, &ProjectilePool::new(), 0.0),
            "Spitfire | speed 5.0 | bullets 0 rockets 0 | 0 fps"
        );
    }
}
