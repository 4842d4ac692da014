use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::suit::Suit;

/// Marriages may be announced only while at least this many cards are undrawn.
pub const ANNOUNCEMENT_MIN_STOCK: usize = 11;
pub const MARRIAGE_POINTS: u32 = 20;
pub const TRUMP_MARRIAGE_POINTS: u32 = 40;

/// Value of the marriage announced by leading `card` from `hand`: 0, 20 or
/// 40. Only the suit of `card` is considered.
pub fn evaluate_announcement(
    hand: &Hand,
    card: Card,
    trick_in_progress: bool,
    stock_remaining: usize,
    trump: Suit,
) -> u32 {
    if trick_in_progress || stock_remaining < ANNOUNCEMENT_MIN_STOCK {
        return 0;
    }
    match card.marriage_partner() {
        Some(partner) if hand.contains(partner) => {
            if card.suit == trump {
                TRUMP_MARRIAGE_POINTS
            } else {
                MARRIAGE_POINTS
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::evaluate_announcement;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::suit::Suit;

    fn hand(cards: &[&str]) -> Hand {
        Hand::with_cards(cards.iter().map(|c| c.parse::<Card>().unwrap()).collect())
    }

    #[test]
    fn trump_marriage_is_forty() {
        let h = hand(&["KH", "QH", "9C"]);
        let king: Card = "KH".parse().unwrap();
        assert_eq!(evaluate_announcement(&h, king, false, 12, Suit::Hearts), 40);
        let queen: Card = "QH".parse().unwrap();
        assert_eq!(evaluate_announcement(&h, queen, false, 11, Suit::Hearts), 40);
    }

    #[test]
    fn plain_marriage_is_twenty() {
        let h = hand(&["KS", "QS"]);
        let king: Card = "KS".parse().unwrap();
        assert_eq!(evaluate_announcement(&h, king, false, 12, Suit::Hearts), 20);
    }

    #[test]
    fn window_closes_below_eleven() {
        let h = hand(&["KS", "QS"]);
        let king: Card = "KS".parse().unwrap();
        assert_eq!(evaluate_announcement(&h, king, false, 10, Suit::Hearts), 0);
        assert_eq!(evaluate_announcement(&h, king, false, 3, Suit::Hearts), 0);
    }

    #[test]
    fn never_while_responding() {
        let h = hand(&["KS", "QS"]);
        let king: Card = "KS".parse().unwrap();
        assert_eq!(evaluate_announcement(&h, king, true, 12, Suit::Spades), 0);
    }

    #[test]
    fn needs_partner_of_same_suit() {
        let h = hand(&["KS", "QH", "QD"]);
        let king: Card = "KS".parse().unwrap();
        assert_eq!(evaluate_announcement(&h, king, false, 12, Suit::Spades), 0);
        let jack: Card = "JH".parse().unwrap();
        assert_eq!(evaluate_announcement(&h, jack, false, 12, Suit::Hearts), 0);
    }
}
