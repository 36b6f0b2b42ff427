use crate::api::game::{EngineContext, Game, GameConfig};
use crate::core::time::FixedTimestep;
use crate::input::queue::{InputEvent, InputQueue};

/// Generic headless game runner that wires up the engine loop.
///
/// A host owns one runner per match, pushes input between frames, and calls
/// [`GameRunner::tick`] with the frame time. Each fixed step runs
/// `Game::update` followed by a physics step.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame);

        Self {
            ctx: EngineContext::new(&config),
            game,
            input: InputQueue::new(),
            timestep,
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.game.init(&mut self.ctx);
        self.initialized = true;
        log::debug!(
            "runner initialized: {} bodies, dt={}s",
            self.ctx.body_count(),
            self.config.fixed_dt
        );
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: as many fixed steps as the accumulated time allows.
    /// Pending input is delivered to the first step only.
    /// Returns the number of steps run.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        if !self.initialized {
            return 0;
        }

        let steps = self.timestep.accumulate(frame_dt);
        if steps == 0 {
            return 0;
        }

        let mut input = InputQueue::from(self.input.drain());
        for _ in 0..steps {
            self.run_step(&input);
            if !input.is_empty() {
                input = InputQueue::new();
            }
        }
        steps
    }

    /// Run exactly one fixed step, delivering any pending input.
    pub fn step(&mut self) {
        if !self.initialized {
            return;
        }
        let input = InputQueue::from(self.input.drain());
        self.run_step(&input);
    }

    /// Run `n` fixed steps.
    pub fn step_n(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    fn run_step(&mut self, input: &InputQueue) {
        self.game.update(&mut self.ctx, input);
        self.ctx.step_physics();
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Split borrow for driving game methods that need the context.
    pub fn parts_mut(&mut self) -> (&mut G, &mut EngineContext) {
        (&mut self.game, &mut self.ctx)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyId;
    use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
    use glam::Vec2;

    #[derive(Default)]
    struct Counter {
        updates: u32,
        pointer_downs: u32,
        body: Option<BodyId>,
    }

    impl Game for Counter {
        fn config(&self) -> GameConfig {
            GameConfig {
                physics_dt: 1.0,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            self.body = Some(ctx.spawn_body(
                BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
                    .with_velocity(Vec2::new(1.0, 0.0)),
                ColliderMaterial::default(),
            ));
        }

        fn update(&mut self, _ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            self.pointer_downs += input
                .iter()
                .filter(|e| matches!(e, InputEvent::PointerDown { .. }))
                .count() as u32;
        }
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = GameRunner::new(Counter::default());
        assert_eq!(runner.tick(1.0), 0);
        assert_eq!(runner.game().updates, 0);
    }

    #[test]
    fn input_delivered_once_per_frame() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });

        let steps = runner.tick(3.0 / 60.0 + 0.001);
        assert_eq!(steps, 3);
        assert_eq!(runner.game().updates, 3);
        assert_eq!(runner.game().pointer_downs, 1);
    }

    #[test]
    fn steps_advance_physics() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.step_n(5);

        let id = runner.game().body.unwrap_or(BodyId(0));
        let pos = runner.context().position(id).unwrap_or(Vec2::ZERO);
        assert!((pos.x - 5.0).abs() < 0.05, "x = {}", pos.x);
    }
}
