use serde::{Deserialize, Serialize};

/// Gameplay kind attached to every entity (and, through the entity, to its
/// physics body). Contact resolution dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Player,
    GroundEnemy,
    Spike,
    Collectable,
    AbilityDash,
    AbilityDoubleJump,
    AbilityWallReset,
    Ground,
    Wall,
    StickyWall,
    MovingPlatform,
}

/// A movement capability the player can unlock by touching a pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Dash,
    DoubleJump,
    WallReset,
}

impl Tag {
    /// The ability granted by a pickup tag, if this is one.
    pub fn ability(self) -> Option<Ability> {
        match self {
            Tag::AbilityDash => Some(Ability::Dash),
            Tag::AbilityDoubleJump => Some(Ability::DoubleJump),
            Tag::AbilityWallReset => Some(Ability::WallReset),
            _ => None,
        }
    }

    /// Tags whose contact costs the player health.
    pub fn is_damaging(self) -> bool {
        matches!(self, Tag::GroundEnemy | Tag::Spike)
    }
}

impl Ability {
    pub const ALL: [Ability; 3] = [Ability::Dash, Ability::DoubleJump, Ability::WallReset];

    /// The pickup tag that grants this ability.
    pub fn pickup_tag(self) -> Tag {
        match self {
            Ability::Dash => Tag::AbilityDash,
            Ability::DoubleJump => Tag::AbilityDoubleJump,
            Ability::WallReset => Tag::AbilityWallReset,
        }
    }

    /// Stable numeric id used on the event wire.
    pub fn code(self) -> u32 {
        match self {
            Ability::Dash => 0,
            Ability::DoubleJump => 1,
            Ability::WallReset => 2,
        }
    }
}
