use crate::error::IllegalMove;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::stock::{Stock, TrumpSlot};
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Closing and trump exchange need fewer undrawn cards than this...
pub const SPECIAL_ACTION_MAX_STOCK: usize = 11;
/// ...and more than this.
pub const SPECIAL_ACTION_MIN_STOCK: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrickWinner {
    Leader,
    Responder,
}

pub fn resolve_trick(led: Card, response: Card, trump: Suit) -> TrickWinner {
    let responder_wins = if led.suit == response.suit {
        response.rank > led.rank
    } else {
        response.suit == trump
    };
    if responder_wins {
        TrickWinner::Responder
    } else {
        TrickWinner::Leader
    }
}

/// The card that takes the trick when `led` is answered by `response`.
pub fn stronger_card(led: Card, response: Card, trump: Suit) -> Card {
    match resolve_trick(led, response, trump) {
        TrickWinner::Leader => led,
        TrickWinner::Responder => response,
    }
}

pub fn trick_points(led: Card, response: Card) -> u32 {
    led.points() + response.points()
}

pub fn special_actions_open(trick_in_progress: bool, closed: bool, stock_remaining: usize) -> bool {
    !trick_in_progress
        && !closed
        && stock_remaining > SPECIAL_ACTION_MIN_STOCK
        && stock_remaining < SPECIAL_ACTION_MAX_STOCK
}

/// Validates a trump exchange and returns the nine that goes under the stock.
pub fn check_trump_exchange(
    hand: &Hand,
    stock: &Stock,
    closed: bool,
    trick_in_progress: bool,
) -> Result<Card, IllegalMove> {
    if !special_actions_open(trick_in_progress, closed, stock.remaining()) {
        return Err(IllegalMove::ExchangeUnavailable);
    }
    if matches!(stock.trump_slot(), TrumpSlot::Consumed) {
        return Err(IllegalMove::ExchangeUnavailable);
    }
    let nine = Card::new(Rank::Nine, stock.trump_suit());
    if !hand.contains(nine) {
        return Err(IllegalMove::MissingTrumpNine(stock.trump_suit()));
    }
    Ok(nine)
}

pub fn check_close(
    closed: bool,
    trick_in_progress: bool,
    stock_remaining: usize,
) -> Result<(), IllegalMove> {
    if special_actions_open(trick_in_progress, closed, stock_remaining) {
        Ok(())
    } else {
        Err(IllegalMove::CloseUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    #[test]
    fn higher_rank_of_same_suit_wins() {
        assert_eq!(resolve_trick(card("KC"), card("10C"), Suit::Hearts), TrickWinner::Responder);
        assert_eq!(resolve_trick(card("AC"), card("10C"), Suit::Hearts), TrickWinner::Leader);
    }

    #[test]
    fn trump_beats_other_suits() {
        assert_eq!(resolve_trick(card("AC"), card("9H"), Suit::Hearts), TrickWinner::Responder);
        assert_eq!(resolve_trick(card("9H"), card("AC"), Suit::Hearts), TrickWinner::Leader);
    }

    #[test]
    fn off_suit_discard_loses() {
        assert_eq!(resolve_trick(card("9C"), card("AS"), Suit::Hearts), TrickWinner::Leader);
        assert_eq!(stronger_card(card("9C"), card("AS"), Suit::Hearts), card("9C"));
    }

    #[test]
    fn points_sum_face_values() {
        assert_eq!(trick_points(card("AC"), card("10C")), 21);
        assert_eq!(trick_points(card("9C"), card("9D")), 0);
    }

    #[test]
    fn action_window_bounds() {
        assert!(!special_actions_open(false, false, 12));
        assert!(!special_actions_open(false, false, 11));
        assert!(special_actions_open(false, false, 10));
        assert!(special_actions_open(false, false, 2));
        assert!(!special_actions_open(false, false, 1));
        assert!(!special_actions_open(true, false, 6));
        assert!(!special_actions_open(false, true, 6));
    }

    #[test]
    fn exchange_requires_trump_nine() {
        let stock = Stock::new(
            vec![card("9C"), card("JC"), card("QC"), card("KC"), card("10C"), card("AC"), card("9D")],
            card("JH"),
        );
        assert_eq!(stock.remaining(), 8);
        let with_nine = Hand::with_cards(vec![card("9H"), card("AS")]);
        assert_eq!(check_trump_exchange(&with_nine, &stock, false, false), Ok(card("9H")));
        let without = Hand::with_cards(vec![card("AS")]);
        assert_eq!(
            check_trump_exchange(&without, &stock, false, false),
            Err(IllegalMove::MissingTrumpNine(Suit::Hearts))
        );
        assert_eq!(
            check_trump_exchange(&with_nine, &stock, true, false),
            Err(IllegalMove::ExchangeUnavailable)
        );
    }

    #[test]
    fn close_respects_window() {
        assert!(check_close(false, false, 6).is_ok());
        assert_eq!(check_close(true, false, 6), Err(IllegalMove::CloseUnavailable));
        assert_eq!(check_close(false, false, 12), Err(IllegalMove::CloseUnavailable));
    }
}
