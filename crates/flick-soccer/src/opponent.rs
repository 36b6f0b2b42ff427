//! Scripted opponent: pick the idle player best lined up behind the ball and
//! push it at the ball.

use std::f32::consts::{PI, TAU};

use flick_engine::BodyId;
use glam::Vec2;

use crate::config::{FieldConfig, GoalConfig, OpponentConfig};
use crate::team::{GoalZone, Team};

/// A player the opponent may move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: BodyId,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpponentMove {
    Shoot { body: BodyId, velocity: Vec2 },
    /// Nobody is idle; the turn passes without a move.
    Pass,
}

/// Point the opponent aims the ball at: in front of the goal `team` attacks.
pub fn aim_target(team: Team, field: &FieldConfig, goals: &GoalConfig, config: &OpponentConfig) -> Vec2 {
    match team.attacked_goal() {
        GoalZone::Top => Vec2::new(goals.mouth_x, config.aim_depth),
        GoalZone::Bottom => Vec2::new(goals.mouth_x, field.height - config.aim_depth),
    }
}

/// Wrap an angle into `[-PI, PI)`.
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// How well a shot from `position` would send the ball toward `target`.
/// Close players score high; players off the ball-to-target line are penalized.
pub fn rate(position: Vec2, ball: Vec2, target: Vec2, config: &OpponentConfig) -> f32 {
    let to_ball = ball - position;
    let distance = to_ball.length().max(f32::EPSILON);
    let approach = to_ball.y.atan2(to_ball.x);
    let to_target = target - ball;
    let line = to_target.y.atan2(to_target.x);
    config.distance_weight / distance - config.angle_weight * wrap_angle(approach - line).abs()
}

/// Choose the opponent's move among `candidates`.
pub fn select_move(
    candidates: &[Candidate],
    ball: Vec2,
    target: Vec2,
    config: &OpponentConfig,
    settle_epsilon: f32,
) -> OpponentMove {
    let idle: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.velocity.x.abs() <= settle_epsilon && c.velocity.y.abs() <= settle_epsilon)
        .collect();

    let Some(first) = idle.first() else {
        return OpponentMove::Pass;
    };

    let mut best: Option<(&Candidate, f32)> = None;
    for &candidate in &idle {
        let score = rate(candidate.position, ball, target, config);
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    let chosen = best.map_or(*first, |(c, _)| c);

    let to_ball = ball - chosen.position;
    let speed = (to_ball.length() / config.distance_divisor).min(config.max_force);
    OpponentMove::Shoot {
        body: chosen.id,
        velocity: to_ball.normalize_or_zero() * speed,
    }
}
