//! Keyboard state with both edge-triggered and level-triggered queries.
//!
//! Raw browser key codes arrive through [`InputEvent::KeyDown`] / [`InputEvent::KeyUp`]
//! and are folded into logical [`Key`]s. Held keys persist across ticks; the
//! pressed/released edges persist until [`KeyboardState::end_tick`], which the
//! session calls only after a simulation step consumed them, so a tap landing
//! on a frame with zero fixed steps is not lost.

use crate::input::queue::InputEvent;

/// Logical keys the level understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Jump,
    Left,
    Right,
    Dash,
    Reset,
}

impl Key {
    pub const ALL: [Key; 5] = [Key::Jump, Key::Left, Key::Right, Key::Dash, Key::Reset];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Map a DOM `keyCode` to a logical key.
    pub fn from_key_code(code: u32) -> Option<Key> {
        match code {
            // ArrowUp, W, Space
            38 | 87 | 32 => Some(Key::Jump),
            // ArrowLeft, A
            37 | 65 => Some(Key::Left),
            // ArrowRight, D
            39 | 68 => Some(Key::Right),
            // Control
            17 => Some(Key::Dash),
            82 => Some(Key::Reset),
            _ => None,
        }
    }
}

/// Small set of logical keys packed into a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet(u8);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    pub fn of(keys: &[Key]) -> Self {
        let mut set = Self::EMPTY;
        for &key in keys {
            set.insert(key);
        }
        set
    }

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn remove(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    pub fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// One tick's view of the keyboard, handed to the player state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// Keys that went down since the last consumed tick.
    pub pressed: KeySet,
    /// Keys currently down.
    pub held: KeySet,
    /// Keys that went up since the last consumed tick.
    pub released: KeySet,
}

impl KeyInput {
    pub fn pressed(&self, key: Key) -> bool {
        self.pressed.contains(key)
    }

    pub fn held(&self, key: Key) -> bool {
        self.held.contains(key)
    }

    pub fn released(&self, key: Key) -> bool {
        self.released.contains(key)
    }
}

/// Accumulates key events between simulation ticks.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    /// Physical key codes currently down; several codes can map to one key.
    down_codes: Vec<u32>,
    held: KeySet,
    just_pressed: KeySet,
    just_released: KeySet,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key_code: u32) {
        let Some(key) = Key::from_key_code(key_code) else {
            return;
        };
        // Auto-repeat delivers KeyDown again for a code that is already down.
        if self.down_codes.contains(&key_code) {
            return;
        }
        self.down_codes.push(key_code);
        if !self.held.contains(key) {
            self.held.insert(key);
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key_code: u32) {
        let Some(key) = Key::from_key_code(key_code) else {
            return;
        };
        let Some(idx) = self.down_codes.iter().position(|&c| c == key_code) else {
            return;
        };
        self.down_codes.swap_remove(idx);
        let still_down = self
            .down_codes
            .iter()
            .any(|&c| Key::from_key_code(c) == Some(key));
        if !still_down {
            self.held.remove(key);
            self.just_released.insert(key);
        }
    }

    /// Fold a batch of engine input events; non-key events are ignored.
    pub fn apply_events<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            match *event {
                InputEvent::KeyDown { key_code } => self.key_down(key_code),
                InputEvent::KeyUp { key_code } => self.key_up(key_code),
                InputEvent::Custom { .. } => {}
            }
        }
    }

    /// Snapshot for the current tick.
    pub fn snapshot(&self) -> KeyInput {
        KeyInput {
            pressed: self.just_pressed,
            held: self.held,
            released: self.just_released,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(key)
    }

    /// Clear the edges once a simulation step has consumed them.
    pub fn end_tick(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Forget everything, including held keys.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
