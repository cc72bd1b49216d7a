/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 8 floats]
/// [Player state: 12 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::EventRecord;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_SOUNDS: usize = 3;
pub const HEADER_SOUND_COUNT: usize = 4;
pub const HEADER_MAX_EVENTS: usize = 5;
pub const HEADER_EVENT_COUNT: usize = 6;
pub const HEADER_TICK_COUNT: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats in the player state block (wire format).
pub const STATE_FLOATS: usize = 12;

/// Player state block field indices, relative to `state_offset`.
pub const STATE_CURRENT: usize = 0;
pub const STATE_PREVIOUS: usize = 1;
pub const STATE_SECOND_PREVIOUS: usize = 2;
pub const STATE_HEALTH: usize = 3;
pub const STATE_INVULNERABLE: usize = 4;
/// Bit 0 dash, bit 1 double jump, bit 2 wall reset.
pub const STATE_ABILITIES: usize = 5;
pub const STATE_POS_X: usize = 6;
pub const STATE_POS_Y: usize = 7;
pub const STATE_VEL_X: usize = 8;
pub const STATE_VEL_Y: usize = 9;
/// 0 playing, 1 won, 2 lost.
pub const STATE_OUTCOME: usize = 10;
pub const STATE_LEVEL_TIME: usize = 11;

/// Floats per game event: kind, a, b, c (wire format).
pub const EVENT_FLOATS: usize = EventRecord::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum sound events per frame.
    pub max_sounds: usize,
    /// Maximum game events per frame.
    pub max_events: usize,

    /// Size of sound data section in floats.
    pub sound_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where the player state block begins.
    pub state_offset: usize,
    /// Offset (in floats) where sound data begins.
    pub sound_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_sounds: usize, max_events: usize) -> Self {
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let state_offset = HEADER_FLOATS;
        let sound_data_offset = state_offset + STATE_FLOATS;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_sounds,
            max_events,
            sound_data_floats,
            event_data_floats,
            state_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_sounds, config.max_events)
    }
}
