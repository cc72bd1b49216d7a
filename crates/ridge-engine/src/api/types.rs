use bytemuck::{Pod, Zeroable};

use crate::components::tag::Ability;

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// A sound cue emitted by the game logic.
/// The numeric value maps to a sample in the host's sound manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    /// Player took damage (or touched something that deals damage).
    pub const HIT: SoundEvent = SoundEvent(1);
    /// An ability pickup was collected.
    pub const PICKUP: SoundEvent = SoundEvent(2);
    pub const DOUBLE_JUMP: SoundEvent = SoundEvent(3);
    pub const DASH: SoundEvent = SoundEvent(4);
    pub const WIN: SoundEvent = SoundEvent(5);
    pub const LOSE: SoundEvent = SoundEvent(6);
}

/// Two entities whose bodies are touching after the latest physics step.
/// Order follows the physics backend's enumeration; neither side is privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchingPair {
    pub a: EntityId,
    pub b: EntityId,
}

impl TouchingPair {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }
}

/// Gameplay notifications raised during a tick, consumed by the audio/UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Health actually decreased; carries the remaining health.
    DamageTaken { health: i32 },
    /// An ability flag flipped from locked to unlocked.
    AbilityUnlocked(Ability),
    /// The collectable was reached; `time` is the frozen level clock in seconds.
    LevelCompleted { time: f32 },
    /// A ground enemy touched the player.
    EnemyHitPlayer,
    /// Health dropped below one.
    PlayerDefeated,
}

impl GameEvent {
    pub const KIND_DAMAGE_TAKEN: f32 = 1.0;
    pub const KIND_ABILITY_UNLOCKED: f32 = 2.0;
    pub const KIND_LEVEL_COMPLETED: f32 = 3.0;
    pub const KIND_ENEMY_HIT_PLAYER: f32 = 4.0;
    pub const KIND_PLAYER_DEFEATED: f32 = 5.0;

    /// Pack into the flat record read by the host through shared memory.
    pub fn to_record(&self) -> EventRecord {
        match *self {
            GameEvent::DamageTaken { health } => {
                EventRecord::new(Self::KIND_DAMAGE_TAKEN, health as f32)
            }
            GameEvent::AbilityUnlocked(ability) => {
                EventRecord::new(Self::KIND_ABILITY_UNLOCKED, ability.code() as f32)
            }
            GameEvent::LevelCompleted { time } => EventRecord::new(Self::KIND_LEVEL_COMPLETED, time),
            GameEvent::EnemyHitPlayer => EventRecord::new(Self::KIND_ENEMY_HIT_PLAYER, 0.0),
            GameEvent::PlayerDefeated => EventRecord::new(Self::KIND_PLAYER_DEFEATED, 0.0),
        }
    }
}

/// A game event as laid out on the wire.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;

    fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_carry_payload_in_first_slot() {
        let rec = GameEvent::DamageTaken { health: 3 }.to_record();
        assert_eq!(rec.kind, GameEvent::KIND_DAMAGE_TAKEN);
        assert_eq!(rec.a, 3.0);

        let rec = GameEvent::AbilityUnlocked(Ability::WallReset).to_record();
        assert_eq!(rec.kind, GameEvent::KIND_ABILITY_UNLOCKED);
        assert_eq!(rec.a, 2.0);

        let rec = GameEvent::LevelCompleted { time: 42.5 }.to_record();
        assert_eq!(rec.a, 42.5);
    }

    #[test]
    fn record_is_four_floats() {
        let records = [GameEvent::EnemyHitPlayer.to_record(), GameEvent::PlayerDefeated.to_record()];
        let floats: &[f32] = bytemuck::cast_slice(&records);
        assert_eq!(floats.len(), 2 * EventRecord::FLOATS);
        assert_eq!(floats[0], GameEvent::KIND_ENEMY_HIT_PLAYER);
        assert_eq!(floats[4], GameEvent::KIND_PLAYER_DEFEATED);
    }
}
