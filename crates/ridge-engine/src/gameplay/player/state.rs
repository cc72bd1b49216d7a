/// Locomotion state of the player. Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    #[default]
    Standing,
    MovingLeft,
    MovingRight,
    DashingLeft,
    DashingRight,
    Jumping,
    DoubleJumping,
    /// Attached to a sticky wall; only entered from a contact.
    OnWall,
    /// Riding a moving platform; only entered from a contact.
    OnMovingPlatform,
}

impl PlayerState {
    pub fn is_dashing(self) -> bool {
        matches!(self, PlayerState::DashingLeft | PlayerState::DashingRight)
    }

    pub fn is_lateral(self) -> bool {
        matches!(self, PlayerState::MovingLeft | PlayerState::MovingRight)
    }

    /// Wire code, in declaration order.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Number of states kept: the current one plus two predecessors.
pub const HISTORY_DEPTH: usize = 3;

/// Fixed-capacity ring of the most recent states.
///
/// Several transitions depend on what the player was doing one or two
/// entries ago (a double jump is only legal right after a jump that led into
/// lateral movement), so the depth is bounded at exactly two predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHistory {
    ring: [PlayerState; HISTORY_DEPTH],
    head: usize,
}

impl StateHistory {
    /// History with every slot set to `Standing`.
    pub fn new() -> Self {
        Self {
            ring: [PlayerState::Standing; HISTORY_DEPTH],
            head: 0,
        }
    }

    /// Enter a new state; the oldest entry falls off.
    pub fn push(&mut self, state: PlayerState) {
        self.head = (self.head + 1) % HISTORY_DEPTH;
        self.ring[self.head] = state;
    }

    pub fn current(&self) -> PlayerState {
        self.ring[self.head]
    }

    /// The state `n` entries back. `previous(1)` is the one before current,
    /// `previous(2)` the one before that. Returns `None` past the depth.
    pub fn previous(&self, n: usize) -> Option<PlayerState> {
        if n >= HISTORY_DEPTH {
            return None;
        }
        let idx = (self.head + HISTORY_DEPTH - n) % HISTORY_DEPTH;
        Some(self.ring[idx])
    }

    /// Shorthand for `previous(1)`; always present.
    pub fn prev(&self) -> PlayerState {
        self.ring[(self.head + HISTORY_DEPTH - 1) % HISTORY_DEPTH]
    }

    /// Shorthand for `previous(2)`; always present.
    pub fn second_prev(&self) -> PlayerState {
        self.ring[(self.head + HISTORY_DEPTH - 2) % HISTORY_DEPTH]
    }
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}
