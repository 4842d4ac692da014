use crate::model::card::Card;
use crate::model::player::Player;
use serde::{Deserialize, Serialize};

/// Discrete things that happened at the table, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TrumpSwapped {
        player: Player,
        nine: Card,
        taken: Card,
    },
    StockClosed {
        player: Player,
    },
    CardPlayed {
        player: Player,
        card: Card,
    },
    AnnouncementMade {
        player: Player,
        value: u32,
    },
    TrickResolved {
        winner: Player,
        points: u32,
    },
    CardDrawn {
        player: Player,
        card: Card,
    },
    GameOver {
        winner: Player,
        final_scores: [u32; 2],
    },
}

impl GameEvent {
    pub fn is_game_over(&self) -> bool {
        matches!(self, GameEvent::GameOver { .. })
    }
}
