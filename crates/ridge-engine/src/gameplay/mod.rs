pub mod contacts;
pub mod difficulty;
pub mod patrol;
pub mod player;

pub use contacts::{resolve_contacts, ContactResolution};
pub use difficulty::Difficulty;
pub use patrol::{knockback_impulse, Axis, Drive, MotionCommand, PatrolController};
pub use player::{Abilities, InputOutcome, Player, PlayerState, StateHistory};
