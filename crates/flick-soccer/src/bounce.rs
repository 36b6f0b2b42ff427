//! Collision classification and the arcade bounce rules layered on top of the
//! physics response.
//!
//! Contact events arrive after the solver already resolved the step, so the
//! wall rule never reflects blindly: it forces the axis component to point
//! back into the field.

use flick_engine::BodyId;
use glam::Vec2;

use crate::config::BounceConfig;
use crate::team::{GoalZone, Role, WallSide};

/// What a started contact means for the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The ball entered a goal sensor.
    Goal(GoalZone),
    /// A sensor touched something other than the ball.
    Ignored,
    /// A ball or player hit a wall.
    Wall { body: BodyId, side: WallSide, is_ball: bool },
    /// The ball hit a player.
    BallHit { other: BodyId },
    /// Left to the physics engine.
    Native,
}

/// Classify a contact between two bodies with known roles.
pub fn classify(a: (BodyId, Role), b: (BodyId, Role)) -> Contact {
    use Role::*;

    match (a, b) {
        ((_, GoalSensor(zone)), (_, Ball)) | ((_, Ball), (_, GoalSensor(zone))) => Contact::Goal(zone),
        ((_, GoalSensor(_)), _) | (_, (_, GoalSensor(_))) => Contact::Ignored,
        ((_, Wall(side)), (body, role)) | ((body, role), (_, Wall(side))) if role.is_mobile() => {
            Contact::Wall {
                body,
                side,
                is_ball: role == Ball,
            }
        }
        ((_, Ball), (other, Player { .. })) | ((other, Player { .. }), (_, Ball)) => {
            Contact::BallHit { other }
        }
        _ => Contact::Native,
    }
}

/// Velocity after a wall hit: the component across the wall keeps at least
/// `floor` speed and points into the field. The other component is untouched.
pub fn wall_bounce(velocity: Vec2, side: WallSide, factor: f32, floor: f32) -> Vec2 {
    let inward = side.inward();
    if side.is_vertical() {
        let speed = (velocity.x.abs() * factor).max(floor);
        Vec2::new(speed * inward.x, velocity.y)
    } else {
        let speed = (velocity.y.abs() * factor).max(floor);
        Vec2::new(velocity.x, speed * inward.y)
    }
}

/// Wall bounce with the ball or player tuning from `config`.
pub fn wall_bounce_for(velocity: Vec2, side: WallSide, is_ball: bool, config: &BounceConfig) -> Vec2 {
    if is_ball {
        wall_bounce(velocity, side, config.ball_wall_factor, config.ball_wall_floor)
    } else {
        wall_bounce(velocity, side, config.player_wall_factor, config.player_wall_floor)
    }
}

/// Ball velocity after striking another body, or `None` when the ball is too
/// slow to be boosted. The ball leaves along `other -> ball`, a little faster,
/// capped at `max_ball_speed`.
pub fn ball_boost(ball_pos: Vec2, ball_vel: Vec2, other_pos: Vec2, config: &BounceConfig) -> Option<Vec2> {
    let speed = ball_vel.length();
    if !speed.is_finite() || speed <= config.activity_threshold {
        return None;
    }

    let mut direction = (ball_pos - other_pos).normalize_or_zero();
    if direction == Vec2::ZERO {
        direction = ball_vel / speed;
    }

    let boosted = direction * speed * config.bounce_boost;
    Some(boosted.clamp_length_max(config.max_ball_speed))
}
