pub mod api;
pub mod core;
pub mod components;
pub mod bridge;
pub mod input;
pub mod gameplay;
pub mod level;
#[cfg(feature = "physics")]
pub mod session;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent, EventRecord, TouchingPair};
pub use components::entity::Entity;
pub use components::tag::{Tag, Ability};
pub use crate::core::scene::Scene;
pub use crate::core::time::{FixedTimestep, SimClock, Timer};
pub use input::queue::{InputEvent, InputQueue};
pub use input::keys::{Key, KeyInput, KeySet, KeyboardState};
pub use bridge::protocol::ProtocolLayout;
pub use gameplay::{
    Abilities, ContactResolution, Difficulty, InputOutcome, MotionCommand, PatrolController,
    Player, PlayerState,
};
pub use level::LevelConfig;

#[cfg(feature = "physics")]
pub use crate::core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType, ColliderMaterial,
};

#[cfg(feature = "physics")]
pub use session::{GameSession, Outcome, StateSnapshot};
