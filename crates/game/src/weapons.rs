//! Wing guns and rockets: per-kind cooldowns and the pool of live projectiles.

use std::f32::consts::FRAC_PI_2;

use engine_core::{Material, ObjectHandle, Quat, Scene, Shape, Transform, Vec3};
use input::FlightInput;

use crate::aircraft::FireSolution;

/// Projectile kinds the aircraft can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Wing guns - fast, short-lived, rapid fire.
    Bullet,
    /// Rockets - slower, longer-lived, one pair per second.
    Rocket,
}

/// Ballistics and rate of fire for one projectile kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    /// Travel speed in units per second.
    pub speed: f32,
    /// Seconds before the projectile is removed.
    pub lifetime: f32,
    /// Minimum seconds between two trigger pulls.
    pub cooldown: f32,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 2] = [ProjectileKind::Bullet, ProjectileKind::Rocket];

    pub fn spec(self) -> WeaponSpec {
        match self {
            ProjectileKind::Bullet => WeaponSpec {
                speed: 40.0,
                lifetime: 2.0,
                cooldown: 0.1,
            },
            ProjectileKind::Rocket => WeaponSpec {
                speed: 30.0,
                lifetime: 3.0,
                cooldown: 1.0,
            },
        }
    }

    /// Whether the trigger for this kind is held this frame.
    pub fn is_requested(self, input: &FlightInput) -> bool {
        match self {
            ProjectileKind::Bullet => input.fire_guns,
            ProjectileKind::Rocket => input.fire_rockets,
        }
    }

    fn index(self) -> usize {
        match self {
            ProjectileKind::Bullet => 0,
            ProjectileKind::Rocket => 1,
        }
    }

    fn shape(self) -> Shape {
        match self {
            ProjectileKind::Bullet => Shape::cuboid(0.1, 0.1, 0.3),
            ProjectileKind::Rocket => Shape::Cylinder {
                radius_top: 0.1,
                radius_bottom: 0.2,
                height: 1.0,
                segments: 8,
            },
        }
    }

    fn material(self) -> Material {
        match self {
            ProjectileKind::Bullet => Material::unlit(0xffff00),
            ProjectileKind::Rocket => Material::unlit(0xff0000),
        }
    }

    /// Extra model rotation on top of the aircraft orientation.
    /// The rocket cylinder is modelled along Y and gets laid along the nose.
    fn model_rotation(self) -> Quat {
        match self {
            ProjectileKind::Bullet => Quat::IDENTITY,
            ProjectileKind::Rocket => Quat::from_rotation_x(FRAC_PI_2),
        }
    }
}

/// Last successful fire time per kind. A kind that never fired is ready.
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    last_fire: [Option<f32>; 2],
}

impl CooldownTracker {
    pub fn is_ready(&self, kind: ProjectileKind, now: f32) -> bool {
        match self.last_fire[kind.index()] {
            Some(last) => now - last >= kind.spec().cooldown,
            None => true,
        }
    }

    pub fn record(&mut self, kind: ProjectileKind, now: f32) {
        self.last_fire[kind.index()] = Some(now);
    }
}

/// A live projectile and its render object.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub spawn_time: f32,
    /// Unit travel direction, fixed at spawn.
    pub direction: Vec3,
    pub position: Vec3,
    pub handle: ObjectHandle,
}

impl Projectile {
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawn_time
    }

    pub fn is_expired(&self, now: f32) -> bool {
        self.age(now) > self.kind.spec().lifetime
    }
}

/// All live projectiles plus the cooldown bookkeeping that gates new ones.
#[derive(Debug, Default)]
pub struct ProjectilePool {
    projectiles: Vec<Projectile>,
    cooldowns: CooldownTracker,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire one projectile from each wing mount if `kind` is off cooldown.
    ///
    /// Returns `false` (and changes nothing) while the cooldown is running.
    pub fn request_fire(
        &mut self,
        kind: ProjectileKind,
        solution: &FireSolution,
        now: f32,
        scene: &mut Scene,
    ) -> bool {
        if !self.cooldowns.is_ready(kind, now) {
            return false;
        }

        let rotation = solution.orientation * kind.model_rotation();
        for mount in solution.mounts {
            let handle = scene.create_object(kind.shape(), kind.material());
            if let Err(e) = scene.set_transform(handle, Transform::from_position_rotation(mount, rotation)) {
                log::warn!("Could not place {:?}: {}", kind, e);
            }
            self.projectiles.push(Projectile {
                kind,
                spawn_time: now,
                direction: solution.direction,
                position: mount,
                handle,
            });
        }

        self.cooldowns.record(kind, now);
        log::trace!("Fired {:?} pair at t={:.3}", kind, now);
        true
    }

    /// Move every projectile by `delta`, then drop the ones past their lifetime.
    ///
    /// Expired projectiles release their render object. Returns how many expired.
    pub fn advance(&mut self, delta: f32, now: f32, scene: &mut Scene) -> usize {
        if self.is_empty() {
            return 0;
        }
        for p in &mut self.projectiles {
            p.position += p.direction * (p.kind.spec().speed * delta);
            if let Err(e) = scene.set_position(p.handle, p.position) {
                log::warn!("Projectile render object missing: {}", e);
            }
        }

        let before = self.len();
        self.projectiles.retain(|p| {
            if !p.is_expired(now) {
                return true;
            }
            if let Err(e) = scene.destroy_object(p.handle) {
                log::warn!("Projectile release failed: {}", e);
            }
            false
        });
        let expired = before - self.len();
        if expired > 0 {
            log::trace!("{} projectiles expired at t={:.3}", expired, now);
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn count(&self, kind: ProjectileKind) -> usize {
        self.projectiles.iter().filter(|p| p.kind == kind).count()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::AircraftState;

    fn level_solution() -> FireSolution {
        AircraftState::at_rest(5.0).fire_solution()
    }

    #[test]
    fn bullet_cooldown_gates_second_pair() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        let solution = level_solution();

        assert!(pool.request_fire(ProjectileKind::Bullet, &solution, 0.0, &mut scene));
        assert_eq!(pool.len(), 2);
        assert!(!pool.request_fire(ProjectileKind::Bullet, &solution, 0.05, &mut scene));
        assert_eq!(pool.len(), 2);
        assert!(pool.request_fire(ProjectileKind::Bullet, &solution, 0.11, &mut scene));
        assert_eq!(pool.len(), 4);
        assert_eq!(scene.object_count(), 4);
    }

    #[test]
    fn cooldowns_are_per_kind() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        let solution = level_solution();

        assert!(pool.request_fire(ProjectileKind::Rocket, &solution, 1.0, &mut scene));
        assert!(pool.request_fire(ProjectileKind::Bullet, &solution, 1.0, &mut scene));
        assert!(!pool.request_fire(ProjectileKind::Rocket, &solution, 1.5, &mut scene));
        assert!(pool.request_fire(ProjectileKind::Bullet, &solution, 1.5, &mut scene));
        assert!(pool.request_fire(ProjectileKind::Rocket, &solution, 2.0, &mut scene));
        assert_eq!(pool.count(ProjectileKind::Rocket), 4);
        assert_eq!(pool.count(ProjectileKind::Bullet), 4);
        assert_eq!(pool.cooldowns.last_fire[ProjectileKind::Rocket.index()], Some(2.0));
    }

    #[test]
    fn pair_spawns_at_both_mounts() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        pool.request_fire(ProjectileKind::Bullet, &level_solution(), 0.0, &mut scene);

        let positions: Vec<Vec3> = pool.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![Vec3::new(-3.5, 0.2, 0.0), Vec3::new(3.5, 0.2, 0.0)]);
        for p in pool.iter() {
            assert_eq!(p.direction, Vec3::Z);
            let placed = scene.world_position(p.handle);
            assert!(placed.is_some_and(|w| w.abs_diff_eq(p.position, 1.0e-6)));
        }
    }

    #[test]
    fn rocket_lives_three_seconds() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        pool.request_fire(ProjectileKind::Rocket, &level_solution(), 2.0, &mut scene);

        assert_eq!(pool.advance(0.016, 4.9, &mut scene), 0);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.advance(0.016, 5.1, &mut scene), 2);
        assert!(pool.is_empty());
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn advancing_an_empty_pool_is_a_no_op() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.advance(0.5, 10.0, &mut scene), 0);
        assert_eq!(pool.len(), 0);
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn projectile_at_exact_lifetime_survives() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        pool.request_fire(ProjectileKind::Bullet, &level_solution(), 0.0, &mut scene);
        assert_eq!(pool.advance(0.0, 2.0, &mut scene), 0);
        assert_eq!(pool.advance(0.0, 2.001, &mut scene), 2);
    }

    #[test]
    fn projectiles_fly_straight_at_constant_speed() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        let mut state = AircraftState::at_rest(5.0);
        state.pitch = -0.4;
        state.roll = 0.3;
        let solution = state.fire_solution();
        pool.request_fire(ProjectileKind::Bullet, &solution, 0.0, &mut scene);

        let deltas = [0.016, 0.033, 0.1, 0.25];
        let mut now = 0.0;
        for dt in deltas {
            now += dt;
            pool.advance(dt, now, &mut scene);
        }
        let travelled = 40.0 * deltas.iter().sum::<f32>();
        for (p, mount) in pool.iter().zip(solution.mounts) {
            let expected = mount + solution.direction * travelled;
            assert!(p.position.abs_diff_eq(expected, 1.0e-4));
            assert!(scene.world_position(p.handle).is_some_and(|w| w.abs_diff_eq(expected, 1.0e-4)));
        }
    }

    #[test]
    fn expired_handles_are_released() {
        let mut scene = Scene::new();
        let mut pool = ProjectilePool::new();
        pool.request_fire(ProjectileKind::Bullet, &level_solution(), 0.0, &mut scene);
        let handles: Vec<ObjectHandle> = pool.iter().map(|p| p.handle).collect();

        pool.advance(0.5, 2.5, &mut scene);
        for handle in handles {
            assert!(!scene.contains(handle));
        }
    }

    #[test]
    fn triggers_map_to_kinds() {
        let input = FlightInput {
            fire_rockets: true,
            ..Default::default()
        };
        assert!(!ProjectileKind::Bullet.is_requested(&input));
        assert!(ProjectileKind::Rocket.is_requested(&input));
    }
}
