use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    White,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::White,
            Team::White => Team::Red,
        }
    }

    /// The goal this team shoots at. Red starts in the top half and attacks
    /// the bottom goal.
    pub fn attacked_goal(self) -> GoalZone {
        match self {
            Team::Red => GoalZone::Bottom,
            Team::White => GoalZone::Top,
        }
    }

    pub const ALL: [Team; 2] = [Team::Red, Team::White];
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Red => write!(f, "red"),
            Team::White => write!(f, "white"),
        }
    }
}

/// Goal mouth at either end of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalZone {
    Top,
    Bottom,
}

impl GoalZone {
    /// The team that scores when the ball enters this zone.
    pub fn credited_team(self) -> Team {
        match self {
            GoalZone::Top => Team::White,
            GoalZone::Bottom => Team::Red,
        }
    }
}

/// Which boundary wall a body is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [WallSide::Left, WallSide::Right, WallSide::Top, WallSide::Bottom];

    /// Unit direction pointing from this wall into the field.
    pub fn inward(self) -> glam::Vec2 {
        match self {
            WallSide::Left => glam::Vec2::X,
            WallSide::Right => glam::Vec2::NEG_X,
            WallSide::Top => glam::Vec2::Y,
            WallSide::Bottom => glam::Vec2::NEG_Y,
        }
    }

    /// Whether the wall's normal runs along the x axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, WallSide::Left | WallSide::Right)
    }
}

/// Gameplay meaning of a physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Ball,
    Player { team: Team, index: usize },
    Wall(WallSide),
    GoalSensor(GoalZone),
}

impl Role {
    /// Bodies that move and take part in the settle check.
    pub fn is_mobile(self) -> bool {
        matches!(self, Role::Ball | Role::Player { .. })
    }

    pub fn team(self) -> Option<Team> {
        match self {
            Role::Player { team, .. } => Some(team),
            _ => None,
        }
    }
}
