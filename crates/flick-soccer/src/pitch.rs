//! Field layout: walls, goal sensors, the ten players and the ball.
//!
//! The pitch owns the `BodyId -> Role` lookup. Physics bodies carry no
//! gameplay data; everything the match needs to know about a body comes from
//! here.

use std::collections::HashMap;

use flick_engine::{BodyDesc, BodyId, ColliderDesc, ColliderMaterial, EngineContext};
use glam::Vec2;

use crate::config::{BodyConfig, MatchConfig};
use crate::team::{GoalZone, Role, Team, WallSide};

/// Starting spots for red, restored after every goal.
pub const RED_ROSTER: [Vec2; 5] = [
    Vec2::new(160.0, 200.0),
    Vec2::new(320.0, 200.0),
    Vec2::new(240.0, 150.0),
    Vec2::new(180.0, 250.0),
    Vec2::new(300.0, 250.0),
];

/// Starting spots for white, restored after every goal.
pub const WHITE_ROSTER: [Vec2; 5] = [
    Vec2::new(160.0, 600.0),
    Vec2::new(320.0, 600.0),
    Vec2::new(240.0, 650.0),
    Vec2::new(180.0, 550.0),
    Vec2::new(300.0, 550.0),
];

pub const BALL_SPOT: Vec2 = Vec2::new(240.0, 400.0);

pub fn roster(team: Team) -> &'static [Vec2; 5] {
    match team {
        Team::Red => &RED_ROSTER,
        Team::White => &WHITE_ROSTER,
    }
}

/// Ids and roles of every body on the field.
#[derive(Debug, Clone)]
pub struct Pitch {
    roles: HashMap<BodyId, Role>,
    home: HashMap<BodyId, Vec2>,
    ball: BodyId,
    red: Vec<BodyId>,
    white: Vec<BodyId>,
    player_radius: f32,
}

impl Pitch {
    /// Create every body of the match in the given context.
    pub fn build(ctx: &mut EngineContext, config: &MatchConfig) -> Self {
        let mut roles = HashMap::new();
        let mut home = HashMap::new();

        let field = &config.field;
        let t = config.field.wall_thickness;
        let wall_material = ColliderMaterial {
            restitution: config.walls.restitution,
            friction: config.walls.friction,
            density: 1.0,
        };
        for side in WallSide::ALL {
            let (center, half_width, half_height) = match side {
                WallSide::Left => (
                    Vec2::new(-t / 2.0, field.height / 2.0),
                    t / 2.0,
                    field.height / 2.0 + t,
                ),
                WallSide::Right => (
                    Vec2::new(field.width + t / 2.0, field.height / 2.0),
                    t / 2.0,
                    field.height / 2.0 + t,
                ),
                WallSide::Top => (
                    Vec2::new(field.width / 2.0, -t / 2.0),
                    field.width / 2.0 + t,
                    t / 2.0,
                ),
                WallSide::Bottom => (
                    Vec2::new(field.width / 2.0, field.height + t / 2.0),
                    field.width / 2.0 + t,
                    t / 2.0,
                ),
            };
            let id = ctx.spawn_body(
                BodyDesc::fixed(ColliderDesc::Cuboid { half_width, half_height })
                    .with_position(center),
                wall_material,
            );
            roles.insert(id, Role::Wall(side));
        }

        let goals = &config.goals;
        for (zone, y) in [
            (GoalZone::Top, goals.top_sensor_y),
            (GoalZone::Bottom, goals.bottom_sensor_y),
        ] {
            let id = ctx.spawn_body(
                BodyDesc::sensor_zone(ColliderDesc::Cuboid {
                    half_width: goals.sensor_width / 2.0,
                    half_height: goals.sensor_height / 2.0,
                })
                .with_position(Vec2::new(goals.mouth_x, y)),
                ColliderMaterial::default(),
            );
            roles.insert(id, Role::GoalSensor(zone));
        }

        let mut red = Vec::with_capacity(RED_ROSTER.len());
        let mut white = Vec::with_capacity(WHITE_ROSTER.len());
        for team in Team::ALL {
            for (index, &spot) in roster(team).iter().enumerate() {
                let id = spawn_round(ctx, &config.player, spot);
                roles.insert(id, Role::Player { team, index });
                home.insert(id, spot);
                match team {
                    Team::Red => red.push(id),
                    Team::White => white.push(id),
                }
            }
        }

        let ball = spawn_round(ctx, &config.ball, BALL_SPOT);
        roles.insert(ball, Role::Ball);
        home.insert(ball, BALL_SPOT);

        log::debug!(
            "pitch built: {} bodies, ball {}",
            roles.len(),
            ball
        );

        Self {
            roles,
            home,
            ball,
            red,
            white,
            player_radius: config.player.radius,
        }
    }

    pub fn role(&self, id: BodyId) -> Option<Role> {
        self.roles.get(&id).copied()
    }

    pub fn ball(&self) -> BodyId {
        self.ball
    }

    pub fn players(&self, team: Team) -> &[BodyId] {
        match team {
            Team::Red => &self.red,
            Team::White => &self.white,
        }
    }

    /// The ball followed by every player.
    pub fn mobile_bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        std::iter::once(self.ball)
            .chain(self.red.iter().copied())
            .chain(self.white.iter().copied())
    }

    pub fn home_position(&self, id: BodyId) -> Option<Vec2> {
        self.home.get(&id).copied()
    }

    /// Put every player and the ball back on its starting spot, motionless.
    pub fn reset(&self, ctx: &mut EngineContext) {
        for id in self.mobile_bodies() {
            if let Some(spot) = self.home_position(id) {
                ctx.place_at_rest(id, spot);
            }
        }
    }

    /// Every mobile body is at rest.
    pub fn all_settled(&self, ctx: &EngineContext, epsilon: f32) -> bool {
        self.mobile_bodies().all(|id| is_idle(ctx, id, epsilon))
    }

    /// Closest player whose disc (grown by `slop`) contains `point`.
    pub fn player_at(&self, ctx: &EngineContext, point: Vec2, slop: f32) -> Option<BodyId> {
        let reach = self.player_radius + slop;
        self.red
            .iter()
            .chain(self.white.iter())
            .filter_map(|&id| {
                let distance = ctx.position(id)?.distance(point);
                (distance <= reach).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

/// Both velocity components within `epsilon`.
pub fn is_idle(ctx: &EngineContext, id: BodyId, epsilon: f32) -> bool {
    let v = ctx.velocity(id);
    v.x.abs() <= epsilon && v.y.abs() <= epsilon
}

fn spawn_round(ctx: &mut EngineContext, body: &BodyConfig, at: Vec2) -> BodyId {
    let shape = ColliderDesc::Ball { radius: body.radius };
    ctx.spawn_body(
        BodyDesc::dynamic(shape)
            .with_position(at)
            .with_ccd(true)
            .with_linear_damping(body.air_friction)
            .with_angular_damping(body.angular_damping),
        ColliderMaterial::with_mass(body.restitution, body.friction, body.mass, &shape),
    )
}
