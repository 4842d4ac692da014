use crate::model::player::Player;
use serde::{Deserialize, Serialize};

/// Points needed to win a hand.
pub const WINNING_SCORE: u32 = 66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [u32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    /// Adds points and returns the new total.
    pub fn add(&mut self, player: Player, points: u32) -> u32 {
        let total = &mut self.totals[player.index()];
        *total = total.saturating_add(points);
        *total
    }

    pub fn score(&self, player: Player) -> u32 {
        self.totals[player.index()]
    }

    pub fn standings(&self) -> &[u32; 2] {
        &self.totals
    }

    pub fn has_won(&self, player: Player) -> bool {
        self.score(player) >= WINNING_SCORE
    }
}
