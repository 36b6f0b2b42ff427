//! Turn, move and score bookkeeping.
//!
//! `MatchState` holds no physics. Every transition is a plain method that
//! checks the current phase and reports whether it applied; the match driver
//! decides when to call them.

use flick_engine::BodyId;
use serde::{Deserialize, Serialize};

use crate::team::Team;

/// Goals needed to win. The match stops the moment one side reaches it.
pub const WINNING_SCORE: u32 = 3;

/// Moves granted at the start of every turn.
pub const MOVES_PER_TURN: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub red: u32,
    pub white: u32,
}

impl Score {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::White => self.white,
        }
    }

    pub fn total(&self) -> u32 {
        self.red + self.white
    }

    fn add(&mut self, team: Team) -> u32 {
        let slot = match team {
            Team::Red => &mut self.red,
            Team::White => &mut self.white,
        };
        *slot += 1;
        *slot
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the side on turn to pick a player.
    Idle,
    /// A player is selected and a drag may be in progress.
    Aiming,
    /// A shot was taken; waiting for every body to come to rest.
    Simulating,
    /// Celebration after a goal, before positions reset.
    GoalScored,
    GameOver,
}

/// What a goal did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOutcome {
    /// Play resumes after the celebration.
    Continue,
    /// The scorer reached the winning score.
    MatchWon(Team),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    turn: Team,
    moves_left: u32,
    score: Score,
    phase: Phase,
    selected: Option<BodyId>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            turn: Team::Red,
            moves_left: MOVES_PER_TURN,
            score: Score::default(),
            phase: Phase::Idle,
            selected: None,
        }
    }

    pub fn turn(&self) -> Team {
        self.turn
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The selected body; only ever set while aiming.
    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    /// Idle or aiming: the side on turn may act.
    pub fn accepts_moves(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Aiming)
    }

    pub fn winner(&self) -> Option<Team> {
        if self.phase != Phase::GameOver {
            return None;
        }
        Team::ALL
            .into_iter()
            .find(|&team| self.score.get(team) >= WINNING_SCORE)
    }

    /// Select a body of team `team`. Replaces any previous selection.
    pub fn select(&mut self, body: BodyId, team: Team) -> bool {
        if !self.accepts_moves() || team != self.turn {
            return false;
        }
        self.selected = Some(body);
        self.phase = Phase::Aiming;
        true
    }

    /// Drop the selection and return to idle.
    pub fn deselect(&mut self) -> bool {
        if self.phase != Phase::Aiming {
            return false;
        }
        self.selected = None;
        self.phase = Phase::Idle;
        true
    }

    /// A shot was launched: spend a move and start simulating.
    pub fn begin_move(&mut self) -> bool {
        if !self.accepts_moves() {
            return false;
        }
        self.moves_left = self.moves_left.saturating_sub(1);
        self.selected = None;
        self.phase = Phase::Simulating;
        true
    }

    /// Every body came to rest without a goal. Returns the new turn when
    /// the turn changed hands.
    pub fn settle(&mut self) -> Option<Team> {
        if self.phase != Phase::Simulating {
            return None;
        }
        self.phase = Phase::Idle;
        if self.moves_left == 0 {
            self.switch_turn();
            Some(self.turn)
        } else {
            None
        }
    }

    /// Hand the turn over without a move.
    pub fn pass_turn(&mut self) -> Option<Team> {
        if !self.accepts_moves() {
            return None;
        }
        self.phase = Phase::Idle;
        self.switch_turn();
        Some(self.turn)
    }

    /// Credit a goal to `scorer`. Ignored once a goal is already being
    /// celebrated or the match is over.
    pub fn record_goal(&mut self, scorer: Team) -> Option<GoalOutcome> {
        if matches!(self.phase, Phase::GoalScored | Phase::GameOver) {
            return None;
        }
        self.selected = None;
        if self.score.add(scorer) >= WINNING_SCORE {
            self.phase = Phase::GameOver;
            Some(GoalOutcome::MatchWon(scorer))
        } else {
            self.phase = Phase::GoalScored;
            Some(GoalOutcome::Continue)
        }
    }

    /// Celebration over: red kicks off with a fresh move.
    pub fn finish_goal_reset(&mut self) -> bool {
        if self.phase != Phase::GoalScored {
            return false;
        }
        self.turn = Team::Red;
        self.moves_left = MOVES_PER_TURN;
        self.phase = Phase::Idle;
        true
    }

    /// Back to 0-0 with red on turn.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn switch_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.moves_left = MOVES_PER_TURN;
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: BodyId = BodyId(7);

    #[test]
    fn starts_with_red_to_move() {
        let state = MatchState::new();
        assert_eq!(state.turn(), Team::Red);
        assert_eq!(state.moves_left(), 1);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.score(), Score::default());
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn select_requires_turn_team() {
        let mut state = MatchState::new();
        assert!(!state.select(BODY, Team::White));
        assert_eq!(state.phase(), Phase::Idle);

        assert!(state.select(BODY, Team::Red));
        assert_eq!(state.phase(), Phase::Aiming);
        assert_eq!(state.selected(), Some(BODY));

        assert!(state.select(BodyId(8), Team::Red));
        assert_eq!(state.selected(), Some(BodyId(8)));

        assert!(state.deselect());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn settle_after_last_move_switches_turn() {
        let mut state = MatchState::new();
        state.select(BODY, Team::Red);
        assert!(state.begin_move());
        assert_eq!(state.moves_left(), 0);
        assert_eq!(state.phase(), Phase::Simulating);
        assert_eq!(state.selected(), None);

        assert!(!state.select(BODY, Team::Red));
        assert_eq!(state.settle(), Some(Team::White));
        assert_eq!(state.moves_left(), 1);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn moves_never_go_negative() {
        let mut state = MatchState::new();
        state.begin_move();
        state.phase = Phase::Idle;
        state.begin_move();
        assert_eq!(state.moves_left(), 0);
    }

    #[test]
    fn settle_outside_simulation_is_ignored() {
        let mut state = MatchState::new();
        assert_eq!(state.settle(), None);
        assert_eq!(state.turn(), Team::Red);
    }

    #[test]
    fn goal_resets_to_red_kickoff() {
        let mut state = MatchState::new();
        state.pass_turn();
        state.begin_move();
        assert_eq!(state.turn(), Team::White);

        assert_eq!(state.record_goal(Team::White), Some(GoalOutcome::Continue));
        assert_eq!(state.phase(), Phase::GoalScored);
        assert_eq!(state.record_goal(Team::White), None);
        assert_eq!(state.score().white, 1);

        assert!(state.finish_goal_reset());
        assert_eq!(state.turn(), Team::Red);
        assert_eq!(state.moves_left(), 1);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn third_goal_ends_the_match() {
        let mut state = MatchState::new();
        for _ in 0..2 {
            state.begin_move();
            state.record_goal(Team::Red);
            state.finish_goal_reset();
        }
        state.begin_move();
        assert_eq!(state.record_goal(Team::Red), Some(GoalOutcome::MatchWon(Team::Red)));
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.winner(), Some(Team::Red));

        assert_eq!(state.record_goal(Team::Red), None);
        assert_eq!(state.score().red, WINNING_SCORE);
        assert!(!state.select(BODY, Team::Red));
        assert!(!state.begin_move());
        assert!(!state.finish_goal_reset());

        state.reset();
        assert_eq!(state, MatchState::new());
    }
}
