use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn points(self) -> u32 {
        self.rank.points()
    }

    pub fn is_trump(self, trump: Suit) -> bool {
        self.suit == trump
    }

    /// The card this one would form a marriage with.
    pub fn marriage_partner(self) -> Option<Card> {
        self.rank
            .marriage_partner()
            .map(|rank| Card::new(rank, self.suit))
    }

    /// Stable index in `0..24`, suit-major.
    pub const fn index(self) -> usize {
        self.suit.index() * Rank::ORDERED.len() + self.rank.index()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse card from {0:?}")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseCardError(s.to_string());
        let suit_char = trimmed.chars().last().ok_or_else(err)?;
        let suit = Suit::from_symbol(suit_char).ok_or_else(err)?;
        let rank_text = &trimmed[..trimmed.len() - suit_char.len_utf8()];
        let rank = match rank_text.to_ascii_uppercase().as_str() {
            "9" => Rank::Nine,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "10" | "T" => Rank::Ten,
            "A" => Rank::Ace,
            _ => return Err(err()),
        };
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn display_and_parse_agree() {
        let card = Card::new(Rank::Ten, Suit::Spades);
        assert_eq!(card.to_string(), "10S");
        assert_eq!("10S".parse::<Card>().unwrap(), card);
        assert_eq!("qh".parse::<Card>().unwrap(), Card::new(Rank::Queen, Suit::Hearts));
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!("".parse::<Card>().is_err());
        assert!("8H".parse::<Card>().is_err());
        assert!("KX".parse::<Card>().is_err());
    }

    #[test]
    fn marriage_partner_keeps_suit() {
        let king = Card::new(Rank::King, Suit::Clubs);
        assert_eq!(king.marriage_partner(), Some(Card::new(Rank::Queen, Suit::Clubs)));
        assert_eq!(Card::new(Rank::Jack, Suit::Clubs).marriage_partner(), None);
    }

    #[test]
    fn indices_are_unique() {
        let mut seen = [false; 24];
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let idx = Card::new(rank, suit).index();
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
    }
}
