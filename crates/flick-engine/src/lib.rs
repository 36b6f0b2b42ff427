pub mod api;
pub mod core;
pub mod input;
pub mod runner;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::BodyId;
pub use crate::core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld,
};
pub use crate::core::time::FixedTimestep;
pub use crate::core::timers::{TimerId, TimerQueue};
pub use input::queue::{InputEvent, InputQueue};
pub use runner::GameRunner;
