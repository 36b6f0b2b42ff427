//! Match tuning.
//!
//! Every number the match logic uses lives here with the value the game ships
//! with. Velocities, floors and caps are in field units per tick; durations
//! are wall-clock seconds.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::team::Team;

/// Field geometry. The origin is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Walls sit just outside the field bounds.
    pub wall_thickness: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 800.0,
            wall_thickness: 20.0,
        }
    }
}

/// Goal sensor zones and the positional fallback band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    /// Horizontal center of both goal mouths.
    pub mouth_x: f32,
    pub sensor_width: f32,
    pub sensor_height: f32,
    /// Vertical center of the top sensor.
    pub top_sensor_y: f32,
    /// Vertical center of the bottom sensor.
    pub bottom_sensor_y: f32,
    /// Fallback: ball y closer than this to the top or bottom edge.
    pub fallback_band: f32,
    /// Fallback: ball x within this distance of `mouth_x`.
    pub mouth_tolerance: f32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            mouth_x: 240.0,
            sensor_width: 100.0,
            sensor_height: 20.0,
            top_sensor_y: 40.0,
            bottom_sensor_y: 760.0,
            fallback_band: 50.0,
            mouth_tolerance: 60.0,
        }
    }
}

/// Physical properties of a round body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Per-tick velocity decay, applied as linear damping.
    pub air_friction: f32,
    pub angular_damping: f32,
}

impl BodyConfig {
    pub fn ball() -> Self {
        Self {
            radius: 8.0,
            mass: 0.5,
            friction: 0.001,
            restitution: 0.9,
            air_friction: 0.005,
            angular_damping: 0.05,
        }
    }

    pub fn player() -> Self {
        Self {
            radius: 15.0,
            mass: 10.0,
            friction: 0.0005,
            restitution: 0.98,
            air_friction: 0.008,
            angular_damping: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            restitution: 1.05,
            friction: 0.0008,
        }
    }
}

/// Slingshot shot tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    /// Releases at or below this drag distance are ignored.
    pub min_drag: f32,
    /// Drag distance giving full power.
    pub max_drag: f32,
    /// Launch speed at full power.
    pub force_multiplier: f32,
    /// Spin is drawn from `[-spin_factor / 2, spin_factor / 2]`.
    pub spin_factor: f32,
    /// Extra radius around a player that still counts as touching it.
    pub pick_slop: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            min_drag: 5.0,
            max_drag: 100.0,
            force_multiplier: 10.0,
            spin_factor: 0.08,
            pick_slop: 6.0,
        }
    }
}

/// Collision and bounce policy tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// Wall reflection factor for the ball.
    pub ball_wall_factor: f32,
    /// Wall reflection factor for players.
    pub player_wall_factor: f32,
    /// Minimum outgoing wall speed for the ball.
    pub ball_wall_floor: f32,
    /// Minimum outgoing wall speed for players.
    pub player_wall_floor: f32,
    /// Speed multiplier for the ball after hitting a body.
    pub bounce_boost: f32,
    /// The ball must be faster than this for the boost to apply.
    pub activity_threshold: f32,
    /// Ball speed cap after a boost.
    pub max_ball_speed: f32,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            ball_wall_factor: 1.05,
            player_wall_factor: 0.98,
            ball_wall_floor: 2.0,
            player_wall_floor: 1.5,
            bounce_boost: 1.05,
            activity_threshold: 0.1,
            max_ball_speed: 10.0,
        }
    }
}

/// Scripted opponent tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// With the opponent disabled both sides take input.
    pub enabled: bool,
    pub team: Team,
    /// Pause before the opponent moves, in seconds.
    pub thinking_time: f32,
    pub distance_weight: f32,
    pub angle_weight: f32,
    /// Shot speed is `distance / distance_divisor`, capped at `max_force`.
    pub distance_divisor: f32,
    pub max_force: f32,
    /// The aim point sits this far in front of the attacked goal line.
    pub aim_depth: f32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            team: Team::White,
            thinking_time: 0.5,
            distance_weight: 500.0,
            angle_weight: 50.0,
            distance_divisor: 50.0,
            max_force: 7.0,
            aim_depth: 100.0,
        }
    }
}

/// Durations of the non-interactive sequences, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Goal celebration before positions reset.
    pub goal_celebration: f32,
    /// Closing sequence after the winning goal before restart is accepted.
    pub closing_sequence: f32,
    /// Input lock after a restart.
    pub restart_transition: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            goal_celebration: 1.8,
            closing_sequence: 1.8,
            restart_transition: 0.5,
        }
    }
}

/// Complete match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub field: FieldConfig,
    pub goals: GoalConfig,
    pub ball: BodyConfig,
    pub player: BodyConfig,
    pub walls: WallConfig,
    pub shot: ShotConfig,
    pub bounce: BounceConfig,
    pub opponent: OpponentConfig,
    pub timing: TimingConfig,
    /// A body is settled when both velocity components are within this.
    pub settle_epsilon: f32,
    /// Fixed seed for the spin RNG; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            goals: GoalConfig::default(),
            ball: BodyConfig::ball(),
            player: BodyConfig::player(),
            walls: WallConfig::default(),
            shot: ShotConfig::default(),
            bounce: BounceConfig::default(),
            opponent: OpponentConfig::default(),
            timing: TimingConfig::default(),
            settle_epsilon: 0.1,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Parse a config from JSON; missing sections and fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Same config with a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the match logic cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must not be negative, got {value}")))
            }
        }

        positive("field.width", self.field.width)?;
        positive("field.height", self.field.height)?;
        positive("field.wall_thickness", self.field.wall_thickness)?;
        positive("goals.sensor_width", self.goals.sensor_width)?;
        positive("goals.sensor_height", self.goals.sensor_height)?;
        positive("ball.radius", self.ball.radius)?;
        positive("ball.mass", self.ball.mass)?;
        positive("player.radius", self.player.radius)?;
        positive("player.mass", self.player.mass)?;
        non_negative("ball.air_friction", self.ball.air_friction)?;
        non_negative("player.air_friction", self.player.air_friction)?;
        non_negative("shot.min_drag", self.shot.min_drag)?;
        positive("shot.max_drag", self.shot.max_drag)?;
        positive("shot.force_multiplier", self.shot.force_multiplier)?;
        non_negative("shot.spin_factor", self.shot.spin_factor)?;
        positive("bounce.max_ball_speed", self.bounce.max_ball_speed)?;
        non_negative("bounce.ball_wall_floor", self.bounce.ball_wall_floor)?;
        non_negative("bounce.player_wall_floor", self.bounce.player_wall_floor)?;
        positive("opponent.distance_divisor", self.opponent.distance_divisor)?;
        non_negative("opponent.thinking_time", self.opponent.thinking_time)?;
        non_negative("timing.goal_celebration", self.timing.goal_celebration)?;
        non_negative("timing.closing_sequence", self.timing.closing_sequence)?;
        non_negative("timing.restart_transition", self.timing.restart_transition)?;
        positive("settle_epsilon", self.settle_epsilon)?;

        if self.shot.min_drag >= self.shot.max_drag {
            return Err(ConfigError::invalid(
                "shot.min_drag",
                format!(
                    "must be below shot.max_drag ({} >= {})",
                    self.shot.min_drag, self.shot.max_drag
                ),
            ));
        }
        if self.goals.top_sensor_y >= self.goals.bottom_sensor_y {
            return Err(ConfigError::invalid(
                "goals.top_sensor_y",
                "top sensor must lie above the bottom sensor",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MatchConfig::from_json(
            r#"{
                "shot": { "force_multiplier": 8.0 },
                "opponent": { "enabled": false },
                "seed": 7
            }"#,
        )
        .unwrap();

        assert_eq!(config.shot.force_multiplier, 8.0);
        assert_eq!(config.shot.max_drag, 100.0);
        assert!(!config.opponent.enabled);
        assert_eq!(config.opponent.team, Team::White);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.bounce, BounceConfig::default());
    }

    #[test]
    fn rejects_bad_json() {
        let err = MatchConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_inverted_drag_range() {
        let err = MatchConfig::from_json(r#"{ "shot": { "min_drag": 200.0 } }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "shot.min_drag"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_zero_max_speed() {
        let mut config = MatchConfig::default();
        config.bounce.max_ball_speed = 0.0;
        assert!(config.validate().is_err());
    }
}
