use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = 24;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Builds a deck in a caller-chosen order. Returns `None` unless the
    /// order is a permutation of the 24 cards.
    pub fn from_order(cards: Vec<Card>) -> Option<Self> {
        if cards.len() != DECK_SIZE {
            return None;
        }
        let mut seen = [false; DECK_SIZE];
        for card in &cards {
            if std::mem::replace(&mut seen[card.index()], true) {
                return None;
            }
        }
        Some(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck};
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_24_unique_cards() {
        let deck = Deck::standard();
        let unique: HashSet<_> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn from_order_rejects_duplicates() {
        let mut cards = Deck::standard().cards().to_vec();
        assert!(Deck::from_order(cards.clone()).is_some());
        cards[1] = cards[0];
        assert!(Deck::from_order(cards).is_none());
    }
}
