use crate::model::card::Card;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::vec::Vec;

pub const HAND_SIZE: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(HAND_SIZE),
        }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    /// Adds a card; returns `false` if it was already held.
    pub fn add(&mut self, card: Card) -> bool {
        if self.contains(card) {
            return false;
        }
        self.cards.push(card);
        self.sort();
        true
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit == suit)
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank)));
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Jack, Suit::Clubs);
        assert!(hand.add(card));
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn duplicates_are_refused() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Ace, Suit::Spades);
        assert!(hand.add(card));
        assert!(!hand.add(card));
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn cards_are_sorted_by_suit_then_strength() {
        let mut hand = Hand::new();
        hand.add(Card::new(Rank::King, Suit::Spades));
        hand.add(Card::new(Rank::Ten, Suit::Clubs));
        hand.add(Card::new(Rank::King, Suit::Clubs));
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(ordered[0], Card::new(Rank::King, Suit::Clubs));
        assert_eq!(ordered[1], Card::new(Rank::Ten, Suit::Clubs));
        assert_eq!(ordered[2], Card::new(Rank::King, Suit::Spades));
        assert!(hand.has_suit(Suit::Spades));
        assert!(!hand.has_suit(Suit::Hearts));
    }
}
