use serde::{Deserialize, Serialize};

/// Difficulty setting; decides how many hits the player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    /// A single hit ends the attempt.
    OneShot,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::OneShot,
    ];

    pub fn starting_health(self) -> i32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 5,
            Difficulty::Hard => 3,
            Difficulty::OneShot => 1,
        }
    }

    /// Position in [`Difficulty::ALL`]; used as the wire index.
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
            Difficulty::OneShot => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next setting in menu order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous setting in menu order, wrapping around.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
