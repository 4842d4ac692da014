pub mod announcement;
pub mod legality;
pub mod resolver;

use crate::model::card::Card;
use crate::model::suit::Suit;

/// The parts of the table that decide whether a card may be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickContext {
    pub led: Option<Card>,
    pub trump: Suit,
    /// Stock closed or fully drawn: suit and trump obligations apply.
    pub must_follow: bool,
}

impl TrickContext {
    pub const fn leading(trump: Suit, must_follow: bool) -> Self {
        Self {
            led: None,
            trump,
            must_follow,
        }
    }

    pub const fn responding(led: Card, trump: Suit, must_follow: bool) -> Self {
        Self {
            led: Some(led),
            trump,
            must_follow,
        }
    }
}
