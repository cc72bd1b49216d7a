//! The player: locomotion state machine, health and ability latches.

pub mod state;
pub mod controller;

pub use state::{PlayerState, StateHistory};
pub use controller::InputOutcome;

use crate::components::tag::Ability;
use crate::core::time::Timer;

/// Seconds of immunity after taking damage.
pub const INVULNERABILITY_SECS: f64 = 2.0;

/// Unlocked movement abilities. Each flag only ever goes false → true
/// within one level attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Abilities {
    pub dash: bool,
    pub double_jump: bool,
    pub wall_reset: bool,
}

impl Abilities {
    pub fn has(&self, ability: Ability) -> bool {
        match ability {
            Ability::Dash => self.dash,
            Ability::DoubleJump => self.double_jump,
            Ability::WallReset => self.wall_reset,
        }
    }

    fn flag_mut(&mut self, ability: Ability) -> &mut bool {
        match ability {
            Ability::Dash => &mut self.dash,
            Ability::DoubleJump => &mut self.double_jump,
            Ability::WallReset => &mut self.wall_reset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    history: StateHistory,
    health: i32,
    invulnerable: bool,
    invulnerability: Timer,
    abilities: Abilities,
}

impl Player {
    pub fn new(health: i32) -> Self {
        Self {
            history: StateHistory::new(),
            health: health.max(0),
            invulnerable: false,
            invulnerability: Timer::new(),
            abilities: Abilities::default(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.history.current()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn abilities(&self) -> Abilities {
        self.abilities
    }

    /// Force a state from outside the input handler (wall and platform
    /// attachment come from contacts).
    pub fn enter_state(&mut self, state: PlayerState) {
        log::debug!("player: {:?} -> {:?}", self.history.current(), state);
        self.history.push(state);
    }

    /// Latch an ability. Returns `true` only when the flag actually changed.
    pub fn unlock(&mut self, ability: Ability) -> bool {
        let flag = self.abilities.flag_mut(ability);
        if *flag {
            return false;
        }
        *flag = true;
        log::debug!("player: unlocked {:?}", ability);
        true
    }

    /// Take one point of damage unless invulnerable. An expired window is
    /// closed first, so a hit just past the window lands.
    /// Returns `true` when health decreased.
    pub fn decrement_health(&mut self, now: f64) -> bool {
        self.refresh_invulnerability(now);
        if self.invulnerable {
            return false;
        }
        let before = self.health;
        self.health = (self.health - 1).max(0);
        self.invulnerable = true;
        self.invulnerability.start(now);
        self.health < before
    }

    /// Close the invulnerability window once it has run longer than
    /// [`INVULNERABILITY_SECS`].
    pub fn refresh_invulnerability(&mut self, now: f64) {
        if self.invulnerable && self.invulnerability.elapsed_seconds(now) > INVULNERABILITY_SECS {
            self.invulnerability.stop(now);
            self.invulnerable = false;
        }
    }
}
