use glam::Vec2;

use crate::config::GoalConfig;
use crate::team::{GoalZone, Team};

/// Turns sensor hits and ball positions into goals, at most one per scoring
/// sequence.
///
/// The sensor event and the positional fallback can both see the same goal;
/// whichever reports first wins and the detector stays latched until
/// [`GoalDetector::release`] is called after the reset.
#[derive(Debug, Clone)]
pub struct GoalDetector {
    config: GoalConfig,
    field_height: f32,
    in_flight: bool,
}

impl GoalDetector {
    pub fn new(config: GoalConfig, field_height: f32) -> Self {
        Self {
            config,
            field_height,
            in_flight: false,
        }
    }

    /// The ball touched the sensor of `zone`.
    pub fn from_sensor(&mut self, zone: GoalZone) -> Option<Team> {
        self.latch(zone)
    }

    /// Per-tick fallback for fast balls that skip the sensor.
    pub fn check_position(&mut self, ball: Vec2) -> Option<Team> {
        let zone = self.zone_at(ball)?;
        self.latch(zone)
    }

    /// The goal mouth `ball` is inside of, if any.
    pub fn zone_at(&self, ball: Vec2) -> Option<GoalZone> {
        if (ball.x - self.config.mouth_x).abs() >= self.config.mouth_tolerance {
            return None;
        }
        if ball.y < self.config.fallback_band {
            Some(GoalZone::Top)
        } else if ball.y > self.field_height - self.config.fallback_band {
            Some(GoalZone::Bottom)
        } else {
            None
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Accept goals again.
    pub fn release(&mut self) {
        self.in_flight = false;
    }

    fn latch(&mut self, zone: GoalZone) -> Option<Team> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(zone.credited_team())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> GoalDetector {
        GoalDetector::new(GoalConfig::default(), 800.0)
    }

    #[test]
    fn sensor_credits_the_attacker() {
        let mut goals = detector();
        assert_eq!(goals.from_sensor(GoalZone::Top), Some(Team::White));
        goals.release();
        assert_eq!(goals.from_sensor(GoalZone::Bottom), Some(Team::Red));
    }

    #[test]
    fn positional_fallback() {
        let goals = detector();
        assert_eq!(goals.zone_at(Vec2::new(240.0, 49.0)), Some(GoalZone::Top));
        assert_eq!(goals.zone_at(Vec2::new(290.0, 20.0)), Some(GoalZone::Top));
        assert_eq!(goals.zone_at(Vec2::new(300.0, 20.0)), None);
        assert_eq!(goals.zone_at(Vec2::new(240.0, 50.0)), None);
        assert_eq!(goals.zone_at(Vec2::new(200.0, 751.0)), Some(GoalZone::Bottom));
        assert_eq!(goals.zone_at(Vec2::new(240.0, 400.0)), None);
    }

    #[test]
    fn one_goal_per_sequence() {
        let mut goals = detector();
        assert_eq!(goals.from_sensor(GoalZone::Top), Some(Team::White));
        assert!(goals.in_flight());
        assert_eq!(goals.check_position(Vec2::new(240.0, 10.0)), None);
        assert_eq!(goals.from_sensor(GoalZone::Bottom), None);

        goals.release();
        assert_eq!(goals.check_position(Vec2::new(240.0, 790.0)), Some(Team::Red));
    }
}
