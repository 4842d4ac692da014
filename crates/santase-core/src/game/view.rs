use crate::game::state::Phase;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::rules::TrickContext;
use crate::rules::announcement::evaluate_announcement;
use crate::rules::legality;
use crate::rules::resolver::special_actions_open;

/// What one player can see of the table.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    pub player: Player,
    pub hand: &'a Hand,
    pub phase: Phase,
    pub trump_suit: Suit,
    pub trump_card: Option<Card>,
    pub stock_remaining: usize,
    pub card_led: Option<Card>,
    /// This player is on lead and no card is down yet.
    pub leading: bool,
    pub is_closed: bool,
    pub must_follow: bool,
    pub own_score: u32,
}

impl<'a> PlayerView<'a> {
    pub fn trick_context(&self) -> TrickContext {
        TrickContext {
            led: self.card_led,
            trump: self.trump_suit,
            must_follow: self.must_follow,
        }
    }

    pub fn legal_cards(&self) -> Vec<Card> {
        legality::legal_cards(&self.trick_context(), self.hand)
    }

    pub fn can_close(&self) -> bool {
        self.leading && special_actions_open(false, self.is_closed, self.stock_remaining)
    }

    pub fn can_switch_trump(&self) -> bool {
        self.leading
            && self.trump_card.is_some()
            && special_actions_open(false, self.is_closed, self.stock_remaining)
            && self.hand.contains(Card::new(Rank::Nine, self.trump_suit))
    }

    /// Points announced if `card` were led now.
    pub fn announcement_value(&self, card: Card) -> u32 {
        if !self.leading {
            return 0;
        }
        evaluate_announcement(self.hand, card, false, self.stock_remaining, self.trump_suit)
    }
}
