//! Turn-based flick soccer built on `flick-engine`.
//!
//! Two teams of five share a 480 x 800 field. The side on turn flicks one
//! player with a slingshot drag; the shot plays out in the physics world and
//! the turn passes once everything is at rest. First to three goals wins.

pub mod bounce;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod goal;
pub mod opponent;
pub mod pitch;
pub mod session;
pub mod shot;
pub mod state;
pub mod team;

pub use config::MatchConfig;
pub use error::{ConfigError, SessionError};
pub use events::{EventBus, MatchEvent, MatchObserver, Scoreboard};
pub use game::{custom_events, SoccerMatch};
pub use session::{LogSessionSink, SessionRecord, SessionSink};
pub use state::{MatchState, Phase, Score, WINNING_SCORE};
pub use team::{GoalZone, Role, Team, WallSide};
