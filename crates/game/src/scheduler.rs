//! Per-frame ordering of the simulation.
//!
//! One delta is sampled per frame and shared by every step:
//! aircraft update and fire requests, projectile advance, model sync,
//! camera follow, then present.

use anyhow::Result;
use engine_core::{Clock, Scene};
use input::FlightInput;

use crate::aircraft::{AircraftConfig, AircraftController, AircraftState};
use crate::aircraft_model::AircraftVisual;
use crate::camera_rig::{CameraPose, CameraRig};
use crate::weapons::{ProjectileKind, ProjectilePool};

/// Receives the finished scene once per frame.
pub trait FrameSink {
    fn present(&mut self, scene: &Scene, camera: &CameraPose) -> Result<()>;
}

/// Everything the simulation advances each frame.
#[derive(Debug)]
pub struct SimulationState {
    pub aircraft: AircraftController,
    pub projectiles: ProjectilePool,
    pub camera: CameraPose,
    /// Clock time of the last tick.
    pub time: f32,
}

pub struct FrameScheduler {
    sim: SimulationState,
    rig: CameraRig,
    visual: Option<AircraftVisual>,
    clock: Clock,
}

impl FrameScheduler {
    pub fn new(flight: AircraftConfig) -> Self {
        let aircraft = AircraftController::new(flight);
        let rig = CameraRig::default();
        let camera = rig.compute(aircraft.state());
        Self {
            sim: SimulationState {
                aircraft,
                projectiles: ProjectilePool::new(),
                camera,
                time: 0.0,
            },
            rig,
            visual: None,
            clock: Clock::new(),
        }
    }

    /// Drive `visual` from the aircraft state every tick.
    pub fn with_visual(mut self, visual: AircraftVisual) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn state(&self) -> &SimulationState {
        &self.sim
    }

    pub fn aircraft(&self) -> &AircraftState {
        self.sim.aircraft.state()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Sample the clock once, run one tick, and hand the result to `sink`.
    pub fn frame(&mut self, input: &FlightInput, scene: &mut Scene, sink: &mut dyn FrameSink) -> Result<()> {
        let delta = self.clock.delta();
        let now = self.clock.elapsed();
        let camera = self.tick(delta, now, input, scene);
        sink.present(scene, &camera)
    }

    /// Advance the simulation by `delta` seconds ending at clock time `now`.
    pub fn tick(&mut self, delta: f32, now: f32, input: &FlightInput, scene: &mut Scene) -> CameraPose {
        let delta = delta.max(0.0);
        let now = now.max(self.sim.time);

        self.sim.aircraft.update(delta, input);

        let solution = self.sim.aircraft.state().fire_solution();
        for kind in ProjectileKind::ALL {
            if kind.is_requested(input) {
                self.sim.projectiles.request_fire(kind, &solution, now, scene);
            }
        }

        self.sim.projectiles.advance(delta, now, scene);

        if let Some(visual) = &self.visual {
            if let Err(e) = visual.sync(scene, self.sim.aircraft.state()) {
                log::warn!("Aircraft model out of sync: {}", e);
            }
        }

        self.sim.camera = self.rig.compute(self.sim.aircraft.state());
        self.sim.time = now;
        self.sim.camera
    }
}
