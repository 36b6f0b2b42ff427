//! The match driver: input, timers, contacts and rules for one match.

use flick_engine::{
    BodyId, CollisionPair, EngineContext, Game, GameConfig, InputEvent, InputQueue, TimerQueue,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bounce::{self, Contact};
use crate::config::MatchConfig;
use crate::error::ConfigError;
use crate::events::{EventBus, MatchEvent, MatchObserver, Scoreboard};
use crate::goal::GoalDetector;
use crate::opponent::{self, Candidate, OpponentMove};
use crate::pitch::Pitch;
use crate::session::{LogSessionSink, SessionSink, SessionTracker};
use crate::shot::{self, AimPreview, Gesture};
use crate::state::{GoalOutcome, MatchState, Phase};
use crate::team::{Role, Team};

/// Custom event kinds from the UI layer.
pub mod custom_events {
    pub const RESTART: u32 = 1;
}

/// Delayed actions. All of them are dropped on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheduled {
    OpponentMove,
    GoalSequenceDone,
    ClosingDone,
    RestartSettled,
}

/// One match of flick soccer. Drive it with a [`flick_engine::GameRunner`].
pub struct SoccerMatch {
    config: MatchConfig,
    pitch: Option<Pitch>,
    state: MatchState,
    goals: GoalDetector,
    timers: TimerQueue<Scheduled>,
    rng: StdRng,
    events: EventBus,
    session: SessionTracker,
    sink: Box<dyn SessionSink>,
    gesture: Option<Gesture>,
    /// Set while a restart settles.
    input_locked: bool,
    awaiting_restart: bool,
}

impl Default for SoccerMatch {
    fn default() -> Self {
        Self::from_valid(MatchConfig::default())
    }
}

impl SoccerMatch {
    /// Set up a match. Rejects configs that fail [`MatchConfig::validate`].
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: MatchConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            goals: GoalDetector::new(config.goals, config.field.height),
            config,
            pitch: None,
            state: MatchState::new(),
            timers: TimerQueue::new(),
            rng,
            events: EventBus::new(),
            session: SessionTracker::new(),
            sink: Box::new(LogSessionSink),
            gesture: None,
            input_locked: false,
            awaiting_restart: false,
        }
    }

    /// Send finished-match records to `sink` instead of the log.
    pub fn with_session_sink(mut self, sink: Box<dyn SessionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn MatchObserver>) {
        self.events.subscribe(observer);
    }

    pub fn match_config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Bodies and roles; `None` until the match is initialized.
    pub fn pitch(&self) -> Option<&Pitch> {
        self.pitch.as_ref()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            score: self.state.score(),
            turn: self.state.turn(),
            moves_left: self.state.moves_left(),
            phase: self.state.phase(),
            winner: self.state.winner(),
            input_locked: self.input_locked,
            awaiting_restart: self.awaiting_restart,
        }
    }

    /// Queued notifications since the last drain.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        self.events.drain()
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn awaiting_restart(&self) -> bool {
        self.awaiting_restart
    }

    pub fn moves_played(&self) -> u32 {
        self.session.move_count()
    }

    pub fn gesture(&self) -> Option<Gesture> {
        self.gesture
    }

    /// Launch the current drag would produce, for drawing the aim line.
    pub fn aim_preview(&self) -> Option<AimPreview> {
        if self.state.phase() != Phase::Aiming {
            return None;
        }
        shot::aim(&self.gesture?, &self.config.shot)
    }

    /// Whether `team` takes its moves from input.
    pub fn human_controls(&self, team: Team) -> bool {
        !(self.config.opponent.enabled && team == self.config.opponent.team)
    }

    /// Select a player of the side on turn and start a drag from it.
    pub fn select(&mut self, ctx: &EngineContext, body: BodyId) -> bool {
        if self.input_locked || !self.state.accepts_moves() {
            return false;
        }
        let Some(pitch) = &self.pitch else {
            return false;
        };
        let Some(team) = pitch.role(body).and_then(Role::team) else {
            return false;
        };
        if !self.human_controls(team) || !pitch.all_settled(ctx, self.config.settle_epsilon) {
            return false;
        }
        let Some(origin) = ctx.position(body) else {
            return false;
        };
        if !self.state.select(body, team) {
            return false;
        }
        self.gesture = Some(Gesture::new(origin));
        log::debug!("{team} selected {body}");
        true
    }

    /// Move the pointer of the drag in progress.
    pub fn drag_to(&mut self, pointer: Vec2) {
        if self.state.phase() != Phase::Aiming {
            return;
        }
        if let Some(gesture) = &mut self.gesture {
            gesture.pointer = pointer;
        }
    }

    /// Release the drag at `pointer`. Returns `true` when a shot was taken.
    pub fn release(&mut self, ctx: &mut EngineContext, pointer: Vec2) -> bool {
        if self.input_locked || self.state.phase() != Phase::Aiming {
            self.gesture = None;
            return false;
        }
        let (Some(body), Some(mut gesture)) = (self.state.selected(), self.gesture.take()) else {
            return false;
        };
        gesture.pointer = pointer;

        let Some(shot) = shot::resolve(&gesture, &self.config.shot, &mut self.rng) else {
            log::debug!("drag of {:.1} too short, no shot", gesture.distance());
            return false;
        };

        ctx.set_velocity(body, shot.velocity);
        ctx.set_angular_velocity(body, shot.spin);
        log::debug!(
            "{} shoots {body}: v=({:.2}, {:.2}) spin={:.3}",
            self.state.turn(),
            shot.velocity.x,
            shot.velocity.y,
            shot.spin
        );
        self.commit_move();
        true
    }

    /// Start a fresh match once the closing sequence is over.
    pub fn restart(&mut self, ctx: &mut EngineContext) -> bool {
        if self.state.phase() != Phase::GameOver || !self.awaiting_restart || self.input_locked {
            return false;
        }
        let Some(pitch) = &self.pitch else {
            return false;
        };

        self.timers.cancel_all();
        pitch.reset(ctx);
        self.state.reset();
        self.goals.release();
        self.gesture = None;
        self.awaiting_restart = false;
        self.input_locked = true;
        self.timers
            .schedule(self.config.timing.restart_transition, Scheduled::RestartSettled);
        self.session.start();

        log::info!("match restarted");
        self.publish_kickoff();
        true
    }

    fn publish_kickoff(&mut self) {
        self.events.publish(MatchEvent::MatchStarted);
        self.events.publish(MatchEvent::ScoreChanged {
            score: self.state.score(),
        });
        self.events.publish(MatchEvent::TurnChanged {
            team: self.state.turn(),
        });
        self.events.publish(MatchEvent::MovesChanged {
            moves_left: self.state.moves_left(),
        });
    }

    fn commit_move(&mut self) {
        if self.state.begin_move() {
            self.session.record_move();
            self.events.publish(MatchEvent::MovesChanged {
                moves_left: self.state.moves_left(),
            });
        }
    }

    fn announce_turn(&mut self, team: Team) {
        log::info!("turn passes to {team}");
        self.events.publish(MatchEvent::TurnChanged { team });
        self.events.publish(MatchEvent::MovesChanged {
            moves_left: self.state.moves_left(),
        });
        self.schedule_opponent();
    }

    fn opponent_may_move(&self) -> bool {
        let opponent = &self.config.opponent;
        opponent.enabled
            && !self.input_locked
            && self.state.phase() == Phase::Idle
            && self.state.turn() == opponent.team
    }

    fn schedule_opponent(&mut self) {
        if !self.opponent_may_move() || self.timers.any(|t| *t == Scheduled::OpponentMove) {
            return;
        }
        self.timers
            .schedule(self.config.opponent.thinking_time, Scheduled::OpponentMove);
    }

    fn play_opponent(&mut self, ctx: &mut EngineContext) {
        if !self.opponent_may_move() {
            return;
        }
        let Some(pitch) = &self.pitch else {
            return;
        };
        let Some(ball) = ctx.position(pitch.ball()) else {
            return;
        };

        let opponent = self.config.opponent;
        let candidates: Vec<Candidate> = pitch
            .players(opponent.team)
            .iter()
            .filter_map(|&id| {
                Some(Candidate {
                    id,
                    position: ctx.position(id)?,
                    velocity: ctx.velocity(id),
                })
            })
            .collect();
        let target = opponent::aim_target(opponent.team, &self.config.field, &self.config.goals, &opponent);

        match opponent::select_move(&candidates, ball, target, &opponent, self.config.settle_epsilon) {
            OpponentMove::Shoot { body, velocity } => {
                ctx.set_velocity(body, velocity);
                log::debug!(
                    "{} opponent shoots {body}: v=({:.2}, {:.2})",
                    opponent.team,
                    velocity.x,
                    velocity.y
                );
                self.commit_move();
            }
            OpponentMove::Pass => {
                log::info!("{} has no idle player, passing", opponent.team);
                if let Some(team) = self.state.pass_turn() {
                    self.announce_turn(team);
                }
            }
        }
    }

    fn on_goal(&mut self, scorer: Team) {
        let Some(outcome) = self.state.record_goal(scorer) else {
            return;
        };
        let score = self.state.score();
        self.gesture = None;
        self.timers.cancel_where(|t| *t == Scheduled::OpponentMove);

        log::info!("goal for {scorer}: red {} - white {}", score.red, score.white);
        self.events.publish(MatchEvent::ScoreChanged { score });
        self.events.publish(MatchEvent::GoalScored { team: scorer, score });

        match outcome {
            GoalOutcome::Continue => {
                self.timers
                    .schedule(self.config.timing.goal_celebration, Scheduled::GoalSequenceDone);
            }
            GoalOutcome::MatchWon(winner) => {
                log::info!("{winner} wins {}-{}", score.red, score.white);
                self.timers
                    .schedule(self.config.timing.closing_sequence, Scheduled::ClosingDone);
                self.events.publish(MatchEvent::MatchEnded { winner, score });

                let record = self.session.finish(score, Some(winner));
                if let Err(err) = self.sink.submit(&record) {
                    log::warn!("failed to submit session record: {err}");
                }
            }
        }
    }

    fn on_timer(&mut self, ctx: &mut EngineContext, due: Scheduled) {
        match due {
            Scheduled::OpponentMove => self.play_opponent(ctx),
            Scheduled::GoalSequenceDone => {
                if let Some(pitch) = &self.pitch {
                    pitch.reset(ctx);
                }
                if self.state.finish_goal_reset() {
                    self.goals.release();
                    self.announce_turn(self.state.turn());
                }
            }
            Scheduled::ClosingDone => {
                self.awaiting_restart = true;
                log::info!("closing sequence over, awaiting restart");
            }
            Scheduled::RestartSettled => {
                self.input_locked = false;
                self.schedule_opponent();
            }
        }
    }

    fn on_input(&mut self, ctx: &mut EngineContext, event: &InputEvent) {
        match *event {
            InputEvent::Custom { kind, .. } if kind == custom_events::RESTART => {
                self.restart(ctx);
            }
            InputEvent::PointerDown { x, y } => self.pointer_down(ctx, Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => self.drag_to(Vec2::new(x, y)),
            InputEvent::PointerUp { x, y } => {
                self.release(ctx, Vec2::new(x, y));
            }
            InputEvent::Custom { .. } => {}
        }
    }

    fn pointer_down(&mut self, ctx: &EngineContext, point: Vec2) {
        if self.input_locked || !self.state.accepts_moves() {
            return;
        }
        let Some(pitch) = &self.pitch else {
            return;
        };
        match pitch.player_at(ctx, point, self.config.shot.pick_slop) {
            Some(body) => {
                self.select(ctx, body);
            }
            None => {
                if self.state.deselect() {
                    self.gesture = None;
                    log::debug!("selection cleared");
                }
            }
        }
    }

    fn classify(&self, pair: &CollisionPair) -> Option<Contact> {
        let pitch = self.pitch.as_ref()?;
        let a = pitch.role(pair.body_a)?;
        let b = pitch.role(pair.body_b)?;
        Some(bounce::classify((pair.body_a, a), (pair.body_b, b)))
    }

    /// React to contacts that started during the last physics step.
    fn apply_contacts(&mut self, ctx: &mut EngineContext) {
        let started: Vec<CollisionPair> = ctx
            .collisions()
            .iter()
            .filter(|c| c.started)
            .copied()
            .collect();

        for pair in started {
            let Some(contact) = self.classify(&pair) else {
                continue;
            };
            match contact {
                Contact::Goal(zone) => {
                    if self.state.phase() == Phase::Simulating {
                        if let Some(scorer) = self.goals.from_sensor(zone) {
                            self.on_goal(scorer);
                        }
                    }
                }
                Contact::Wall { body, side, is_ball } => {
                    let velocity = bounce::wall_bounce_for(
                        ctx.velocity(body),
                        side,
                        is_ball,
                        &self.config.bounce,
                    );
                    ctx.set_velocity(body, velocity);
                }
                Contact::BallHit { other } => {
                    let Some(ball) = self.pitch.as_ref().map(Pitch::ball) else {
                        continue;
                    };
                    let (Some(ball_pos), Some(other_pos)) = (ctx.position(ball), ctx.position(other)) else {
                        continue;
                    };
                    if let Some(velocity) =
                        bounce::ball_boost(ball_pos, ctx.velocity(ball), other_pos, &self.config.bounce)
                    {
                        ctx.set_velocity(ball, velocity);
                    }
                }
                Contact::Ignored | Contact::Native => {}
            }
        }
    }

    fn check_goal_position(&mut self, ctx: &EngineContext) {
        let Some(ball) = self.pitch.as_ref().and_then(|p| ctx.position(p.ball())) else {
            return;
        };
        if let Some(scorer) = self.goals.check_position(ball) {
            self.on_goal(scorer);
        }
    }

    fn check_settled(&mut self, ctx: &EngineContext) {
        let Some(pitch) = &self.pitch else {
            return;
        };
        if !pitch.all_settled(ctx, self.config.settle_epsilon) {
            return;
        }
        match self.state.settle() {
            Some(team) => self.announce_turn(team),
            None => self.schedule_opponent(),
        }
    }
}

impl Game for SoccerMatch {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            // One physics step per tick of simulated time: velocities are
            // field units per tick.
            physics_dt: 1.0,
            world_width: self.config.field.width,
            world_height: self.config.field.height,
            gravity: Vec2::ZERO,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        if self.pitch.is_some() {
            return;
        }
        self.pitch = Some(Pitch::build(ctx, &self.config));
        self.session.start();
        log::info!(
            "match ready: {} on turn, opponent {}",
            self.state.turn(),
            if self.config.opponent.enabled { "enabled" } else { "disabled" }
        );
        self.publish_kickoff();
        self.schedule_opponent();
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if self.pitch.is_none() {
            return;
        }

        self.apply_contacts(ctx);

        for due in self.timers.tick(ctx.dt()) {
            self.on_timer(ctx, due);
        }

        for event in input.iter() {
            self.on_input(ctx, event);
        }

        if self.state.phase() == Phase::Simulating {
            self.check_goal_position(ctx);
        }
        if self.state.phase() == Phase::Simulating {
            self.check_settled(ctx);
        }
    }
}
