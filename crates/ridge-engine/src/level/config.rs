use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::tag::Tag;
use crate::gameplay::patrol::Axis;

/// The level shipped with the crate.
const LEVEL_ONE_JSON: &str = include_str!("../../data/level_one.json");

/// Level geometry and patrol tables. Coordinates are world units, Y up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub player: PlayerSpawn,
    /// Immovable bodies, grouped by shared shape and material.
    #[serde(default)]
    pub statics: Vec<StaticGroup>,
    #[serde(default)]
    pub enemies: EnemyGroup,
    #[serde(default)]
    pub moving_platforms: PlatformGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub spawn: Vec2,
    /// Where the reset key teleports the player.
    pub reset_point: Vec2,
    #[serde(default = "default_player_half_extents")]
    pub half_extents: Vec2,
}

/// A run of fixed bodies sharing one box size, tag and material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticGroup {
    /// Human-readable name (e.g., "small_platforms").
    pub name: String,
    pub tag: Tag,
    pub half_extents: Vec2,
    /// Friction override; the engine default applies when absent.
    #[serde(default)]
    pub friction: Option<f32>,
    #[serde(default)]
    pub restitution: Option<f32>,
    /// Overlap-only body (pickups, collectable).
    #[serde(default)]
    pub sensor: bool,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec2,
    #[serde(default)]
    pub angle_deg: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyGroup {
    #[serde(default = "default_enemy_half_extents")]
    pub half_extents: Vec2,
    #[serde(default = "default_enemy_density")]
    pub density: f32,
    #[serde(default)]
    pub patrols: Vec<EnemyPatrol>,
}

/// Horizontal patrol between `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyPatrol {
    pub position: Vec2,
    pub start: f32,
    pub end: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformGroup {
    #[serde(default = "default_platform_half_extents")]
    pub half_extents: Vec2,
    #[serde(default)]
    pub friction: Option<f32>,
    #[serde(default)]
    pub patrols: Vec<PlatformPatrol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformPatrol {
    pub position: Vec2,
    #[serde(default)]
    pub axis: Axis,
    pub start: f32,
    pub end: f32,
    pub speed: f32,
}

fn default_player_half_extents() -> Vec2 {
    Vec2::splat(0.5)
}

fn default_enemy_half_extents() -> Vec2 {
    Vec2::new(1.0, 2.0)
}

fn default_enemy_density() -> f32 {
    2.0
}

fn default_platform_half_extents() -> Vec2 {
    Vec2::new(5.0, 0.5)
}

impl Default for EnemyGroup {
    fn default() -> Self {
        Self {
            half_extents: default_enemy_half_extents(),
            density: default_enemy_density(),
            patrols: Vec::new(),
        }
    }
}

impl Default for PlatformGroup {
    fn default() -> Self {
        Self {
            half_extents: default_platform_half_extents(),
            friction: None,
            patrols: Vec::new(),
        }
    }
}

impl Default for LevelConfig {
    /// An empty level: just the player above the origin.
    fn default() -> Self {
        Self {
            name: "empty".to_string(),
            player: PlayerSpawn {
                spawn: Vec2::new(0.0, 8.0),
                reset_point: Vec2::new(0.0, 4.0),
                half_extents: default_player_half_extents(),
            },
            statics: Vec::new(),
            enemies: EnemyGroup::default(),
            moving_platforms: PlatformGroup::default(),
        }
    }
}

impl LevelConfig {
    /// Parse a level from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded first level.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(LEVEL_ONE_JSON)
    }

    /// Number of placements across all static groups with the given tag.
    pub fn static_count(&self, tag: Tag) -> usize {
        self.statics
            .iter()
            .filter(|g| g.tag == tag)
            .map(|g| g.placements.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_level_parses() {
        let level = LevelConfig::builtin().unwrap();
        assert_eq!(level.name, "level-one");
        assert_eq!(level.player.spawn, Vec2::new(0.0, 8.0));
        assert_eq!(level.player.reset_point, Vec2::new(0.0, 4.0));
        assert_eq!(level.enemies.patrols.len(), 11);
        assert_eq!(level.moving_platforms.patrols.len(), 13);
        assert_eq!(level.moving_platforms.friction, Some(1.5));
        assert_eq!(level.enemies.half_extents, Vec2::new(1.0, 2.0));
        assert_eq!(level.enemies.density, 2.0);
    }

    #[test]
    fn builtin_level_counts_by_tag() {
        let level = LevelConfig::builtin().unwrap();
        assert_eq!(level.static_count(Tag::Ground), 113);
        assert_eq!(level.static_count(Tag::Wall), 48);
        assert_eq!(level.static_count(Tag::Spike), 40);
        assert_eq!(level.static_count(Tag::StickyWall), 10);
        assert_eq!(level.static_count(Tag::Collectable), 1);
        assert_eq!(level.static_count(Tag::AbilityDash), 1);
        assert_eq!(level.static_count(Tag::AbilityDoubleJump), 1);
        assert_eq!(level.static_count(Tag::AbilityWallReset), 1);
    }

    #[test]
    fn pickups_are_sensors() {
        let level = LevelConfig::builtin().unwrap();
        for group in &level.statics {
            if group.tag.ability().is_some() || group.tag == Tag::Collectable {
                assert!(group.sensor, "{} should be a sensor", group.name);
            }
        }
    }

    #[test]
    fn parse_minimal_level_uses_defaults() {
        let json = r#"{
            "name": "tiny",
            "player": { "spawn": [1.0, 2.0], "reset_point": [0.0, 0.0] },
            "statics": [
                {
                    "name": "floor",
                    "tag": "ground",
                    "half_extents": [10.0, 0.5],
                    "placements": [{ "position": [0.0, 0.0] }]
                }
            ],
            "moving_platforms": {
                "patrols": [{ "position": [0.0, 5.0], "start": 0.0, "end": 10.0, "speed": 4.0 }]
            }
        }"#;
        let level = LevelConfig::from_json(json).unwrap();
        assert_eq!(level.player.half_extents, Vec2::splat(0.5));
        assert_eq!(level.statics[0].friction, None);
        assert!(!level.statics[0].sensor);
        assert_eq!(level.statics[0].placements[0].angle_deg, 0.0);
        assert!(level.enemies.patrols.is_empty());
        assert_eq!(level.enemies.half_extents, Vec2::new(1.0, 2.0));
        assert_eq!(level.enemies.density, 2.0);
        assert_eq!(level.moving_platforms.patrols[0].axis, Axis::X);
        assert_eq!(level.moving_platforms.half_extents, Vec2::new(5.0, 0.5));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let json = r#"{
            "name": "bad",
            "player": { "spawn": [0.0, 0.0], "reset_point": [0.0, 0.0] },
            "statics": [{ "name": "x", "tag": "lava", "half_extents": [1.0, 1.0], "placements": [] }]
        }"#;
        assert!(LevelConfig::from_json(json).is_err());
    }
}
