use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::BodyId;
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld};
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed wall-clock timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Simulated time per physics step. `1.0` makes velocities read as
    /// units per tick.
    pub physics_dt: f32,
    /// Maximum fixed steps run for a single frame.
    pub max_steps_per_frame: u32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Gravity vector for physics simulation. Default: zero (top-down).
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            physics_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            world_width: 800.0,
            world_height: 600.0,
            gravity: Vec2::ZERO,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and create bodies.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Runs before the physics step; `ctx.collisions()`
    /// holds the events from the previous step.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub physics: PhysicsWorld,
    bodies: HashMap<BodyId, PhysicsBody>,
    collision_events: Vec<CollisionPair>,
    next_id: u32,
    /// Wall-clock seconds per tick.
    dt: f32,
    /// Wall-clock seconds since the context was created.
    elapsed: f64,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.physics_dt);
        Self {
            physics,
            bodies: HashMap::new(),
            collision_events: Vec::new(),
            next_id: 1,
            dt: config.fixed_dt,
            elapsed: 0.0,
        }
    }

    /// Generate the next unique body ID.
    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Wall-clock seconds per tick.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Create a body and register it under a fresh id.
    pub fn spawn_body(&mut self, desc: BodyDesc, material: ColliderMaterial) -> BodyId {
        let id = self.next_id();
        let body = self.physics.create_body(id, &desc, material);
        self.bodies.insert(id, body);
        id
    }

    /// Remove a body from the simulation.
    pub fn despawn(&mut self, id: BodyId) {
        if let Some(body) = self.bodies.remove(&id) {
            self.physics.remove_body(&body);
        }
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Set the linear velocity of a body.
    pub fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(body) = self.bodies.get(&id) {
            self.physics.set_velocity(body, vel);
        }
    }

    /// Get the linear velocity of a body (zero for unknown ids).
    pub fn velocity(&self, id: BodyId) -> Vec2 {
        self.bodies
            .get(&id)
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_angular_velocity(&mut self, id: BodyId, angvel: f32) {
        if let Some(body) = self.bodies.get(&id) {
            self.physics.set_angular_velocity(body, angvel);
        }
    }

    pub fn angular_velocity(&self, id: BodyId) -> f32 {
        self.bodies
            .get(&id)
            .map(|body| self.physics.angular_velocity(body))
            .unwrap_or(0.0)
    }

    /// Teleport a body.
    pub fn set_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some(body) = self.bodies.get(&id) {
            self.physics.set_position(body, pos);
        }
    }

    /// Current position of a body, `None` for unknown ids.
    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|body| self.physics.body_position(body))
    }

    /// Teleport a body and stop it completely.
    pub fn place_at_rest(&mut self, id: BodyId, pos: Vec2) {
        if let Some(body) = self.bodies.get(&id) {
            self.physics.set_position(body, pos);
            self.physics.set_velocity(body, Vec2::ZERO);
            self.physics.set_angular_velocity(body, 0.0);
        }
    }

    /// Get collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation. Called by the runner after `Game::update()`.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);
        self.elapsed += f64::from(self.dt);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::ColliderDesc;

    fn unit_config() -> GameConfig {
        GameConfig {
            physics_dt: 1.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn spawn_body_registers_physics() {
        let mut ctx = EngineContext::new(&unit_config());
        let id = ctx.spawn_body(
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
                .with_position(Vec2::new(100.0, 200.0)),
            ColliderMaterial::default(),
        );

        assert!(ctx.contains(id));
        assert_eq!(ctx.physics.body_count(), 1);
        assert_eq!(ctx.position(id), Some(Vec2::new(100.0, 200.0)));
    }

    #[test]
    fn despawn_cleans_up_physics() {
        let mut ctx = EngineContext::default();
        let id = ctx.spawn_body(
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }),
            ColliderMaterial::default(),
        );
        ctx.despawn(id);
        assert_eq!(ctx.body_count(), 0);
        assert_eq!(ctx.physics.body_count(), 0);
        assert_eq!(ctx.position(id), None);
    }

    #[test]
    fn unknown_ids_are_inert() {
        let mut ctx = EngineContext::default();
        ctx.set_velocity(BodyId(99), Vec2::ONE);
        assert_eq!(ctx.velocity(BodyId(99)), Vec2::ZERO);
        assert_eq!(ctx.angular_velocity(BodyId(99)), 0.0);
    }

    #[test]
    fn place_at_rest_zeroes_motion() {
        let mut ctx = EngineContext::new(&unit_config());
        let id = ctx.spawn_body(
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                .with_velocity(Vec2::new(4.0, 4.0)),
            ColliderMaterial::default(),
        );
        ctx.set_angular_velocity(id, 0.5);
        ctx.step_physics();

        ctx.place_at_rest(id, Vec2::new(240.0, 400.0));
        assert_eq!(ctx.position(id), Some(Vec2::new(240.0, 400.0)));
        assert_eq!(ctx.velocity(id), Vec2::ZERO);
        assert_eq!(ctx.angular_velocity(id), 0.0);
    }

    #[test]
    fn step_physics_advances_time_and_bodies() {
        let mut ctx = EngineContext::new(&unit_config());
        let id = ctx.spawn_body(
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                .with_velocity(Vec2::new(2.0, 0.0)),
            ColliderMaterial::default(),
        );

        for _ in 0..10 {
            ctx.step_physics();
        }

        let pos = ctx.position(id).unwrap_or(Vec2::ZERO);
        assert!((pos.x - 20.0).abs() < 0.1, "x = {}", pos.x);
        assert!((ctx.elapsed() - 10.0 / 60.0).abs() < 1e-4);
    }
}
