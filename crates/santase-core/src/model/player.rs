use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    Human = 0,
    Opponent = 1,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::Human, Player::Opponent];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn other(self) -> Player {
        match self {
            Player::Human => Player::Opponent,
            Player::Opponent => Player::Human,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Player::Human => "Human",
            Player::Opponent => "Opponent",
        };
        f.write_str(label)
    }
}
