use crate::game::view::PlayerView;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::moves::Move;
use crate::model::suit::Suit;
use crate::rules::resolver::stronger_card;

/// Protocol an automated opponent must follow. The engine re-validates
/// every move returned by [`Opponent::choose_move`].
pub trait Opponent: Send {
    /// Pick the next move for the opponent. Called only on its turn.
    fn choose_move(&mut self, view: &PlayerView<'_>) -> Move;

    /// The human's completed move, once per human turn.
    fn observe_human_move(&mut self, mv: &Move);

    /// The card the opponent drew during replenishment.
    fn observe_drawn_card(&mut self, card: Card);

    fn compare_strength(&self, led: Card, response: Card, trump: Suit) -> Card {
        stronger_card(led, response, trump)
    }
}

/// Builds an opponent for a freshly dealt hand.
pub trait OpponentFactory {
    fn create_opponent(
        &self,
        initial_hand: &Hand,
        trump_card: Card,
        opponent_leads_first: bool,
    ) -> Box<dyn Opponent>;
}

impl<F> OpponentFactory for F
where
    F: Fn(&Hand, Card, bool) -> Box<dyn Opponent>,
{
    fn create_opponent(
        &self,
        initial_hand: &Hand,
        trump_card: Card,
        opponent_leads_first: bool,
    ) -> Box<dyn Opponent> {
        self(initial_hand, trump_card, opponent_leads_first)
    }
}
