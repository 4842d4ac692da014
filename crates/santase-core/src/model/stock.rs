use crate::model::card::Card;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// The face-up card under the stock. Once drawn it is gone for the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrumpSlot {
    Visible(Card),
    Consumed,
}

impl TrumpSlot {
    pub const fn card(self) -> Option<Card> {
        match self {
            TrumpSlot::Visible(card) => Some(card),
            TrumpSlot::Consumed => None,
        }
    }

    pub const fn is_visible(self) -> bool {
        matches!(self, TrumpSlot::Visible(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Face-down cards; the last element is drawn next.
    cards: Vec<Card>,
    trump: TrumpSlot,
    trump_suit: Suit,
}

impl Stock {
    pub fn new(cards: Vec<Card>, trump_card: Card) -> Self {
        Self {
            cards,
            trump: TrumpSlot::Visible(trump_card),
            trump_suit: trump_card.suit,
        }
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    pub fn trump_slot(&self) -> TrumpSlot {
        self.trump
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Undrawn cards, counting the trump card while it is still visible.
    pub fn remaining(&self) -> usize {
        self.cards.len() + usize::from(self.trump.is_visible())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Draws the top face-down card, falling back to the trump card when the
    /// face-down pile is empty.
    pub fn draw(&mut self) -> Option<Card> {
        if let Some(card) = self.cards.pop() {
            return Some(card);
        }
        match std::mem::replace(&mut self.trump, TrumpSlot::Consumed) {
            TrumpSlot::Visible(card) => Some(card),
            TrumpSlot::Consumed => None,
        }
    }

    /// Puts `replacement` face up and returns the card it displaced.
    /// `None` if the trump card was already drawn.
    pub fn exchange_trump(&mut self, replacement: Card) -> Option<Card> {
        match self.trump {
            TrumpSlot::Visible(previous) => {
                self.trump = TrumpSlot::Visible(replacement);
                Some(previous)
            }
            TrumpSlot::Consumed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Stock, TrumpSlot};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn sample() -> Stock {
        Stock::new(
            vec![
                Card::new(Rank::Nine, Suit::Clubs),
                Card::new(Rank::Ace, Suit::Spades),
            ],
            Card::new(Rank::Jack, Suit::Hearts),
        )
    }

    #[test]
    fn draws_from_top_then_trump() {
        let mut stock = sample();
        assert_eq!(stock.remaining(), 3);
        assert_eq!(stock.draw(), Some(Card::new(Rank::Ace, Suit::Spades)));
        assert_eq!(stock.draw(), Some(Card::new(Rank::Nine, Suit::Clubs)));
        assert_eq!(stock.draw(), Some(Card::new(Rank::Jack, Suit::Hearts)));
        assert_eq!(stock.trump_slot(), TrumpSlot::Consumed);
        assert!(stock.is_exhausted());
        assert_eq!(stock.draw(), None);
    }

    #[test]
    fn trump_suit_survives_consumption() {
        let mut stock = sample();
        while stock.draw().is_some() {}
        assert_eq!(stock.trump_suit(), Suit::Hearts);
    }

    #[test]
    fn exchange_swaps_visible_card() {
        let mut stock = sample();
        let nine = Card::new(Rank::Nine, Suit::Hearts);
        assert_eq!(stock.exchange_trump(nine), Some(Card::new(Rank::Jack, Suit::Hearts)));
        assert_eq!(stock.trump_slot(), TrumpSlot::Visible(nine));
        assert_eq!(stock.remaining(), 3);
    }

    #[test]
    fn exchange_after_consumption_is_refused() {
        let mut stock = sample();
        while stock.draw().is_some() {}
        assert_eq!(stock.exchange_trump(Card::new(Rank::Nine, Suit::Hearts)), None);
    }
}
