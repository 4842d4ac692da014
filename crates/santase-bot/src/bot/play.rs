use super::card_sort_key;
use super::tracker::UnseenTracker;
use rand::Rng;
use rand::seq::SliceRandom;
use santase_core::game::view::PlayerView;
use santase_core::model::card::Card;
use santase_core::model::moves::Move;
use santase_core::model::rank::Rank;
use tracing::{Level, event};

/// How a bot picks among the legal cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Lowest,
    Random,
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// Cards playable after an optional trump exchange on this turn.
    pub fn candidates(view: &PlayerView<'_>, switch_trump: bool) -> Vec<Card> {
        if !switch_trump {
            return view.legal_cards();
        }
        let nine = Card::new(Rank::Nine, view.trump_suit);
        view.hand
            .iter()
            .copied()
            .filter(|card| *card != nine)
            .chain(view.trump_card)
            .collect()
    }

    pub fn lowest(cards: &[Card], view: &PlayerView<'_>) -> Option<Card> {
        cards
            .iter()
            .copied()
            .min_by_key(|card| card_sort_key(*card, view.trump_suit))
    }

    /// Builds the move for `view`. The trump exchange is always taken when
    /// open; closing is only ever chosen by the random pick.
    pub fn choose<R: Rng + ?Sized>(
        view: &PlayerView<'_>,
        pick: Pick,
        close_odds: f64,
        rng: &mut R,
        tracker: &UnseenTracker,
    ) -> Move {
        let switch_trump = view.can_switch_trump();
        let cards = Self::candidates(view, switch_trump);
        let chosen = match pick {
            Pick::Lowest => Self::lowest(&cards, view),
            Pick::Random => cards.choose(rng).copied(),
        };
        let Some(card) = chosen else {
            tracing::warn!(
                target: "santase_bot::play",
                player = %view.player,
                reason = "no_candidates",
                message = "asked to move with an empty hand"
            );
            return Move::play(Card::new(Rank::Nine, view.trump_suit));
        };

        let mut mv = Move::play(card);
        if switch_trump {
            mv = mv.switching_trump();
        } else if pick == Pick::Random && view.can_close() && rng.gen_bool(close_odds) {
            mv = mv.closing();
        }
        log_play_decision(view, pick, &cards, &mv, tracker);
        mv
    }
}

fn log_play_decision(
    view: &PlayerView<'_>,
    pick: Pick,
    candidates: &[Card],
    mv: &Move,
    tracker: &UnseenTracker,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let preview = candidates
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "santase_bot::play",
        Level::DEBUG,
        player = %view.player,
        pick = ?pick,
        leading = view.leading,
        candidates = %preview,
        chosen = %mv,
        unseen = tracker.unseen_count(),
        stock = view.stock_remaining,
    );
}
