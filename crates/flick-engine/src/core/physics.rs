use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::{Mutex, PoisonError};

use crate::api::types::BodyId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra and back
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }

    /// Area of the shape, used to turn a target mass into a density.
    pub fn area(&self) -> f32 {
        match *self {
            ColliderDesc::Ball { radius } => std::f32::consts::PI * radius * radius,
            ColliderDesc::Cuboid { half_width, half_height } => 4.0 * half_width * half_height,
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl ColliderMaterial {
    /// Material whose density gives `mass` for the given shape.
    pub fn with_mass(restitution: f32, friction: f32, mass: f32, shape: &ColliderDesc) -> Self {
        let area = shape.area().max(f32::EPSILON);
        Self {
            restitution,
            friction,
            density: mass / area,
        }
    }
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub velocity: Vec2,
    pub fixed_rotation: bool,
    pub ccd: bool,
    /// Sensors report overlaps but never push other bodies.
    pub sensor: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            fixed_rotation: false,
            ccd: false,
            sensor: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            fixed_rotation: true,
            ccd: false,
            sensor: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a fixed sensor zone: reports overlaps, never collides.
    pub fn sensor_zone(collider: ColliderDesc) -> Self {
        Self {
            sensor: true,
            ..Self::fixed(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Set the linear damping (velocity decay per unit of simulated time).
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }
}

/// Handle pair referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
    /// `true` when one side of the pair is a sensor zone.
    pub sensor: bool,
}

// ---------------------------------------------------------------------------
// Event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct.
///
/// Gameplay code never sees Rapier types beyond the opaque [`PhysicsBody`];
/// what a body *means* is tracked by whoever created it.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Top-down games pass `Vec2::ZERO`.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep. With `1.0`, velocities read as units per step.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// The integration timestep.
    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Create a rigid body + collider and return handles.
    /// The BodyId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        id: BodyId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .linvel(vec2_to_na(desc.velocity))
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .sensor(desc.sensor)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Colliders whose body was removed mid-step resolve to None and are dropped.
            let body_a = self.collider_to_body_id(h1);
            let body_b = self.collider_to_body_id(h2);

            if let (Some(a), Some(b)) = (body_a, body_b) {
                collision_events.push(CollisionPair {
                    body_a: a,
                    body_b: b,
                    started,
                    sensor: event.sensor(),
                });
            }
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Set the angular velocity (radians per unit time).
    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(angvel, true);
        }
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.angvel())
            .unwrap_or(0.0)
    }

    /// Teleport a body. Contacts are re-evaluated on the next step.
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    /// Get the current position of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    fn collider_to_body_id(&self, collider_handle: ColliderHandle) -> Option<BodyId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(BodyId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_step_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0);
        world
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }),
            ColliderMaterial::default(),
        );
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn velocity_moves_body_one_velocity_per_unit_step() {
        let mut world = unit_step_world();
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                .with_position(Vec2::new(100.0, 100.0))
                .with_velocity(Vec2::new(3.0, 0.0)),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        world.step_into(&mut events);

        let pos = world.body_position(&body);
        assert!((pos.x - 103.0).abs() < 0.01, "x after one step: {}", pos.x);
        assert!((pos.y - 100.0).abs() < 0.01);
    }

    #[test]
    fn set_velocity_and_spin_directly() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 }),
            ColliderMaterial::default(),
        );

        world.set_velocity(&body, Vec2::new(5.0, -3.0));
        world.set_angular_velocity(&body, 0.04);
        let vel = world.velocity(&body);
        assert!((vel.x - 5.0).abs() < 0.001);
        assert!((vel.y - (-3.0)).abs() < 0.001);
        assert!((world.angular_velocity(&body) - 0.04).abs() < 0.001);
    }

    #[test]
    fn set_position_teleports() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                .with_position(Vec2::new(10.0, 10.0)),
            ColliderMaterial::default(),
        );

        world.set_position(&body, Vec2::new(240.0, 400.0));
        assert_eq!(world.body_position(&body), Vec2::new(240.0, 400.0));
    }

    #[test]
    fn linear_damping_slows_body() {
        let mut world = unit_step_world();
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                .with_velocity(Vec2::new(10.0, 0.0))
                .with_linear_damping(0.1),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let vel = world.velocity(&body);
        assert!(vel.x > 0.0 && vel.x < 10.0, "damped velocity: {}", vel.x);
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut world = unit_step_world();
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: 100.0,
                half_height: 10.0,
            })
            .with_position(Vec2::new(0.0, 500.0)),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }

        let pos = world.body_position(&body);
        assert!((pos.y - 500.0).abs() < 0.001, "Fixed body should not move: y={}", pos.y);
    }

    #[test]
    fn collision_events_between_converging_bodies() {
        let mut world = unit_step_world();

        world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
                .with_position(Vec2::new(0.0, 0.0))
                .with_velocity(Vec2::new(2.0, 0.0)),
            ColliderMaterial::default(),
        );
        world.create_body(
            BodyId(2),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
                .with_position(Vec2::new(40.0, 0.0))
                .with_velocity(Vec2::new(-2.0, 0.0)),
            ColliderMaterial::default(),
        );

        let mut all_events = Vec::new();
        for _ in 0..30 {
            world.step_into(&mut all_events);
        }

        let first = all_events
            .iter()
            .find(|e| e.started)
            .expect("should have at least one collision start event");
        assert!(!first.sensor);
        let mut ids = [first.body_a, first.body_b];
        ids.sort();
        assert_eq!(ids, [BodyId(1), BodyId(2)]);
    }

    #[test]
    fn sensor_reports_overlap_without_blocking() {
        let mut world = unit_step_world();

        world.create_body(
            BodyId(10),
            &BodyDesc::sensor_zone(ColliderDesc::Cuboid {
                half_width: 50.0,
                half_height: 10.0,
            })
            .with_position(Vec2::new(0.0, 0.0)),
            ColliderMaterial::default(),
        );
        let ball = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                .with_position(Vec2::new(0.0, 40.0))
                .with_velocity(Vec2::new(0.0, -4.0)),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..30 {
            world.step_into(&mut events);
        }

        let hit = events
            .iter()
            .find(|e| e.started && e.sensor)
            .expect("ball should enter the sensor zone");
        let mut ids = [hit.body_a, hit.body_b];
        ids.sort();
        assert_eq!(ids, [BodyId(1), BodyId(10)]);

        // Passed straight through.
        assert!(world.body_position(&ball).y < -30.0);
    }

    #[test]
    fn material_with_mass_divides_by_area() {
        let shape = ColliderDesc::Cuboid { half_width: 1.0, half_height: 2.0 };
        let mat = ColliderMaterial::with_mass(0.9, 0.1, 16.0, &shape);
        assert!((mat.density - 2.0).abs() < 0.001);
        assert!((mat.restitution - 0.9).abs() < 0.001);
    }
}
