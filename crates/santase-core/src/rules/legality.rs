use super::TrickContext;
use crate::error::IllegalMove;
use crate::model::card::Card;
use crate::model::hand::Hand;

/// Checks `card` against the follow/beat/trump obligations. Possession is
/// not checked here so the rule can be called speculatively.
pub fn check_rule(ctx: &TrickContext, hand: &Hand, card: Card) -> Result<(), IllegalMove> {
    let Some(led) = ctx.led else {
        return Ok(());
    };
    if !ctx.must_follow {
        return Ok(());
    }

    if card.suit == led.suit {
        if card.rank > led.rank {
            return Ok(());
        }
        let can_beat = hand
            .iter()
            .any(|c| c.suit == led.suit && c.rank > led.rank);
        return if can_beat {
            Err(IllegalMove::MustBeatLead(led))
        } else {
            Ok(())
        };
    }

    if hand.has_suit(led.suit) {
        return Err(IllegalMove::MustFollowSuit(led.suit));
    }

    if led.suit != ctx.trump && card.suit != ctx.trump && hand.has_suit(ctx.trump) {
        return Err(IllegalMove::MustPlayTrump(ctx.trump));
    }

    Ok(())
}

pub fn is_legal(ctx: &TrickContext, hand: &Hand, card: Card) -> bool {
    check_rule(ctx, hand, card).is_ok()
}

/// Cards from `hand` that may be played right now.
pub fn legal_cards(ctx: &TrickContext, hand: &Hand) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|&card| is_legal(ctx, hand, card))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{check_rule, is_legal, legal_cards};
    use crate::error::IllegalMove;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::rules::TrickContext;

    fn hand(cards: &[&str]) -> Hand {
        Hand::with_cards(cards.iter().map(|c| c.parse::<Card>().unwrap()).collect())
    }

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    #[test]
    fn anything_goes_while_leading() {
        let h = hand(&["9C", "AS"]);
        let ctx = TrickContext::leading(Suit::Hearts, true);
        assert!(h.iter().all(|&c| is_legal(&ctx, &h, c)));
    }

    #[test]
    fn anything_goes_while_stock_is_open() {
        let h = hand(&["9C", "AS", "KH"]);
        let ctx = TrickContext::responding(card("10C"), Suit::Hearts, false);
        assert!(h.iter().all(|&c| is_legal(&ctx, &h, c)));
    }

    #[test]
    fn must_beat_when_able() {
        let h = hand(&["9C", "AC", "KH"]);
        let ctx = TrickContext::responding(card("10C"), Suit::Hearts, true);
        assert_eq!(
            check_rule(&ctx, &h, card("9C")),
            Err(IllegalMove::MustBeatLead(card("10C")))
        );
        assert!(is_legal(&ctx, &h, card("AC")));
        assert_eq!(
            check_rule(&ctx, &h, card("KH")),
            Err(IllegalMove::MustFollowSuit(Suit::Clubs))
        );
    }

    #[test]
    fn losing_follow_allowed_without_higher_card() {
        let h = hand(&["9C", "JC", "AH"]);
        let ctx = TrickContext::responding(card("KC"), Suit::Hearts, true);
        assert_eq!(legal_cards(&ctx, &h), vec![card("9C"), card("JC")]);
    }

    #[test]
    fn trump_forced_when_void_in_led_suit() {
        let h = hand(&["9D", "QH", "AS"]);
        let ctx = TrickContext::responding(card("10C"), Suit::Hearts, true);
        assert_eq!(legal_cards(&ctx, &h), vec![card("QH")]);
        assert_eq!(
            check_rule(&ctx, &h, card("AS")),
            Err(IllegalMove::MustPlayTrump(Suit::Hearts))
        );
    }

    #[test]
    fn any_card_when_void_in_led_suit_and_trumps() {
        let h = hand(&["9D", "AS"]);
        let ctx = TrickContext::responding(card("10C"), Suit::Hearts, true);
        assert_eq!(legal_cards(&ctx, &h).len(), 2);
    }

    #[test]
    fn trump_lead_is_plain_follow() {
        // Led suit is trump: follow rules apply, no separate trump obligation.
        let h = hand(&["9D", "AS"]);
        let ctx = TrickContext::responding(Card::new(Rank::Jack, Suit::Hearts), Suit::Hearts, true);
        assert_eq!(legal_cards(&ctx, &h).len(), 2);
    }

    #[test]
    fn same_suit_obligation_beats_trump_obligation() {
        let h = hand(&["9C", "AH"]);
        let ctx = TrickContext::responding(card("10C"), Suit::Hearts, true);
        assert_eq!(legal_cards(&ctx, &h), vec![card("9C")]);
    }
}
