pub mod config;
#[cfg(feature = "physics")]
pub mod builder;

pub use config::{
    EnemyGroup, EnemyPatrol, LevelConfig, Placement, PlatformGroup, PlatformPatrol, PlayerSpawn,
    StaticGroup,
};
#[cfg(feature = "physics")]
pub use builder::{build_level, LevelHandles};
