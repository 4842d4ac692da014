mod play;
mod tracker;

pub use play::{Pick, PlayPlanner};
pub use tracker::UnseenTracker;

use rand::SeedableRng;
use rand::rngs::StdRng;
use santase_core::game::opponent::{Opponent, OpponentFactory};
use santase_core::game::view::PlayerView;
use santase_core::model::card::Card;
use santase_core::model::hand::Hand;
use santase_core::model::moves::Move;
use santase_core::model::rank::Rank;
use santase_core::model::suit::Suit;
use std::fmt;
use std::str::FromStr;

/// Odds that the random bot closes the stock when it may.
const RANDOM_CLOSE_ODDS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpponentKind {
    #[default]
    LowestLegal,
    Random,
}

impl OpponentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            OpponentKind::LowestLegal => "lowest_legal",
            OpponentKind::Random => "random",
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOpponentKind(pub String);

impl fmt::Display for UnknownOpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown opponent kind '{}' (expected lowest_legal or random)", self.0)
    }
}

impl std::error::Error for UnknownOpponentKind {}

impl FromStr for OpponentKind {
    type Err = UnknownOpponentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "lowest_legal" | "lowest" => Ok(OpponentKind::LowestLegal),
            "random" => Ok(OpponentKind::Random),
            _ => Err(UnknownOpponentKind(s.to_string())),
        }
    }
}

/// Sorts cheap off-trump cards first, then by suit for stability.
pub(crate) fn card_sort_key(card: Card, trump: Suit) -> (bool, u32, usize, Rank) {
    (card.is_trump(trump), card.points(), card.suit.index(), card.rank)
}

/// Shared bookkeeping for both bots: what has been seen so far.
fn observe_move(tracker: &mut UnseenTracker, trump: Suit, mv: &Move) {
    tracker.note_seen(mv.card);
    if mv.switch_trump_card {
        tracker.note_seen(Card::new(Rank::Nine, trump));
    }
    if mv.is_announcement {
        if let Some(partner) = mv.card.marriage_partner() {
            tracker.note_seen(partner);
        }
    }
}

/// Always plays its cheapest legal card; never closes.
pub struct LowestLegalBot {
    tracker: UnseenTracker,
    trump: Suit,
    rng: StdRng,
}

impl LowestLegalBot {
    pub fn new(initial_hand: &Hand, trump_card: Card) -> Self {
        Self {
            tracker: UnseenTracker::for_deal(initial_hand, trump_card),
            trump: trump_card.suit,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn tracker(&self) -> &UnseenTracker {
        &self.tracker
    }
}

impl Opponent for LowestLegalBot {
    fn choose_move(&mut self, view: &PlayerView<'_>) -> Move {
        let mv = PlayPlanner::choose(view, Pick::Lowest, 0.0, &mut self.rng, &self.tracker);
        if let Some(taken) = view.trump_card.filter(|_| mv.switch_trump_card) {
            self.tracker.note_seen(taken);
        }
        mv
    }

    fn observe_human_move(&mut self, mv: &Move) {
        observe_move(&mut self.tracker, self.trump, mv);
    }

    fn observe_drawn_card(&mut self, card: Card) {
        self.tracker.note_seen(card);
    }
}

/// Plays a uniformly random legal card from a seeded generator.
pub struct RandomBot {
    tracker: UnseenTracker,
    trump: Suit,
    rng: StdRng,
}

impl RandomBot {
    pub fn new(initial_hand: &Hand, trump_card: Card, seed: u64) -> Self {
        Self {
            tracker: UnseenTracker::for_deal(initial_hand, trump_card),
            trump: trump_card.suit,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn tracker(&self) -> &UnseenTracker {
        &self.tracker
    }
}

impl Opponent for RandomBot {
    fn choose_move(&mut self, view: &PlayerView<'_>) -> Move {
        PlayPlanner::choose(
            view,
            Pick::Random,
            RANDOM_CLOSE_ODDS,
            &mut self.rng,
            &self.tracker,
        )
    }

    fn observe_human_move(&mut self, mv: &Move) {
        observe_move(&mut self.tracker, self.trump, mv);
    }

    fn observe_drawn_card(&mut self, card: Card) {
        self.tracker.note_seen(card);
    }
}

/// Builds the configured bot for each new hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotFactory {
    pub kind: OpponentKind,
    pub seed: u64,
}

impl BotFactory {
    pub const fn new(kind: OpponentKind, seed: u64) -> Self {
        Self { kind, seed }
    }
}

impl OpponentFactory for BotFactory {
    fn create_opponent(
        &self,
        initial_hand: &Hand,
        trump_card: Card,
        opponent_leads_first: bool,
    ) -> Box<dyn Opponent> {
        tracing::debug!(
            target: "santase_bot::play",
            kind = %self.kind,
            seed = self.seed,
            opponent_leads_first,
            "opponent created"
        );
        match self.kind {
            OpponentKind::LowestLegal => Box::new(LowestLegalBot::new(initial_hand, trump_card)),
            OpponentKind::Random => Box::new(RandomBot::new(initial_hand, trump_card, self.seed)),
        }
    }
}
