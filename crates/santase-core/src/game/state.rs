use crate::error::GameError;
use crate::game::view::PlayerView;
use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::hand::{HAND_SIZE, Hand};
use crate::model::player::Player;
use crate::model::score::ScoreBoard;
use crate::model::stock::{Stock, TrumpSlot};
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use crate::rules::TrickContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the turn holder to lead.
    LeadWait,
    /// Waiting for the other player to answer the led card.
    ResponseWait,
    /// Both cards are down; the trick has not been settled yet.
    Resolving,
    GameOver,
}

/// Authoritative record of one hand of play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    hands: [Hand; 2],
    stock: Stock,
    scores: ScoreBoard,
    trick: Trick,
    played: Vec<Card>,
    phase: Phase,
    closed_by: Option<Player>,
    pending_announcement: u32,
    last_trick_winner: Option<Player>,
    winner: Option<Player>,
}

impl GameState {
    /// Six cards each, then the trump card, then the stock (drawn from the end).
    pub fn deal(deck: &Deck, first_leader: Player) -> Self {
        let cards = deck.cards();
        let human = Hand::with_cards(cards[..HAND_SIZE].to_vec());
        let opponent = Hand::with_cards(cards[HAND_SIZE..2 * HAND_SIZE].to_vec());
        let trump_card = cards[2 * HAND_SIZE];
        let stock = Stock::new(cards[2 * HAND_SIZE + 1..].to_vec(), trump_card);
        Self::from_parts(human, opponent, stock, first_leader)
    }

    pub fn with_seed(seed: u64, first_leader: Player) -> Self {
        Self::deal(&Deck::shuffled_with_seed(seed), first_leader)
    }

    /// Starts a hand from an explicit layout. Cards missing from the layout
    /// count as already played.
    pub fn from_parts(human: Hand, opponent: Hand, stock: Stock, first_leader: Player) -> Self {
        let mut played: Vec<Card> = Deck::standard()
            .cards()
            .iter()
            .copied()
            .filter(|card| {
                !human.contains(*card)
                    && !opponent.contains(*card)
                    && !stock.cards().contains(card)
                    && stock.trump_slot().card() != Some(*card)
            })
            .collect();
        played.sort_by_key(|card| card.index());
        Self {
            hands: [human, opponent],
            stock,
            scores: ScoreBoard::new(),
            trick: Trick::new(first_leader),
            played,
            phase: Phase::LeadWait,
            closed_by: None,
            pending_announcement: 0,
            last_trick_winner: None,
            winner: None,
        }
    }

    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn human_score(&self) -> u32 {
        self.scores.score(Player::Human)
    }

    pub fn opponent_score(&self) -> u32 {
        self.scores.score(Player::Opponent)
    }

    pub fn trump_suit(&self) -> Suit {
        self.stock.trump_suit()
    }

    pub fn trump_card(&self) -> Option<Card> {
        self.stock.trump_slot().card()
    }

    pub fn is_closed(&self) -> bool {
        self.closed_by.is_some()
    }

    pub fn closed_by(&self) -> Option<Player> {
        self.closed_by
    }

    pub fn trick(&self) -> &Trick {
        &self.trick
    }

    pub fn card_led(&self) -> Option<Card> {
        self.trick.led()
    }

    pub fn card_response(&self) -> Option<Card> {
        self.trick.response()
    }

    pub fn led_by_opponent(&self) -> bool {
        self.trick.leader() == Player::Opponent
    }

    /// Who is expected to act; after both cards are down, the leader.
    pub fn turn_holder(&self) -> Player {
        match self.phase {
            Phase::LeadWait | Phase::ResponseWait => self
                .trick
                .expected_player()
                .unwrap_or_else(|| self.trick.leader()),
            Phase::Resolving | Phase::GameOver => self.trick.leader(),
        }
    }

    pub fn pending_announcement(&self) -> u32 {
        self.pending_announcement
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn last_trick_winner(&self) -> Option<Player> {
        self.last_trick_winner
    }

    pub fn played(&self) -> &[Card] {
        &self.played
    }

    /// Must-follow regime: stock closed or trump card drawn.
    pub fn must_follow(&self) -> bool {
        self.is_closed() || matches!(self.stock.trump_slot(), TrumpSlot::Consumed)
    }

    pub fn trick_context(&self) -> TrickContext {
        TrickContext {
            led: self.trick.led(),
            trump: self.trump_suit(),
            must_follow: self.must_follow(),
        }
    }

    /// Whether `player` may play `card` now, ignoring turn order.
    pub fn is_legal(&self, player: Player, card: Card) -> bool {
        let hand = self.hand(player);
        hand.contains(card) && crate::rules::legality::is_legal(&self.trick_context(), hand, card)
    }

    pub fn view_for(&self, player: Player) -> PlayerView<'_> {
        PlayerView {
            player,
            hand: self.hand(player),
            phase: self.phase,
            trump_suit: self.trump_suit(),
            trump_card: self.trump_card(),
            stock_remaining: self.stock.remaining(),
            card_led: self.trick.led(),
            leading: self.phase == Phase::LeadWait && self.trick.leader() == player,
            is_closed: self.is_closed(),
            must_follow: self.must_follow(),
            own_score: self.scores.score(player),
        }
    }

    /// Verifies that the 24 cards are partitioned across hands, stock, trump
    /// slot, the trick on the table and the played pile.
    pub fn check_conservation(&self) -> Result<(), GameError> {
        let mut seen = [false; DECK_SIZE];
        let mut total = 0usize;
        let all = self.hands[0]
            .iter()
            .chain(self.hands[1].iter())
            .copied()
            .chain(self.stock.cards().iter().copied())
            .chain(self.stock.trump_slot().card())
            .chain(self.trick.cards())
            .chain(self.played.iter().copied());
        for card in all {
            total += 1;
            if std::mem::replace(&mut seen[card.index()], true) {
                return Err(self.invariant(format!("{card} appears more than once")));
            }
        }
        if total != DECK_SIZE {
            return Err(self.invariant(format!("{total} cards accounted for, expected {DECK_SIZE}")));
        }
        for player in Player::BOTH {
            if self.hand(player).len() > HAND_SIZE {
                return Err(self.invariant(format!(
                    "{player} holds {} cards",
                    self.hand(player).len()
                )));
            }
        }
        Ok(())
    }

    /// Verifies that the phase agrees with the cards on the table and the
    /// recorded winner.
    pub fn check_phase(&self) -> Result<(), GameError> {
        let trick = &self.trick;
        let consistent = match self.phase {
            Phase::LeadWait => trick.is_empty() && self.winner.is_none(),
            Phase::ResponseWait => {
                !trick.is_empty() && !trick.is_complete() && self.winner.is_none()
            }
            Phase::Resolving => trick.is_complete() && self.winner.is_none(),
            Phase::GameOver => self.winner.is_some(),
        };
        if consistent {
            Ok(())
        } else {
            Err(self.invariant(format!(
                "phase {:?} does not match the trick ({} cards down) or winner {:?}",
                self.phase,
                trick.cards().count(),
                self.winner
            )))
        }
    }

    pub(crate) fn invariant(&self, detail: String) -> GameError {
        let diagnostic = serde_json::to_string(self)
            .unwrap_or_else(|err| format!("<state not serializable: {err}>"));
        GameError::InvariantViolation { detail, diagnostic }
    }

    pub(crate) fn hand_mut(&mut self, player: Player) -> &mut Hand {
        &mut self.hands[player.index()]
    }

    pub(crate) fn stock_mut(&mut self) -> &mut Stock {
        &mut self.stock
    }

    pub(crate) fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub(crate) fn trick_mut(&mut self) -> &mut Trick {
        &mut self.trick
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn close(&mut self, player: Player) {
        self.closed_by = Some(player);
    }

    pub(crate) fn set_pending_announcement(&mut self, value: u32) {
        self.pending_announcement = value;
    }

    /// Moves the finished trick to the played pile and opens a new one.
    pub(crate) fn complete_trick(&mut self, winner: Player) {
        let finished = std::mem::replace(&mut self.trick, Trick::new(winner));
        self.played.extend(finished.cards());
        self.last_trick_winner = Some(winner);
    }

    pub(crate) fn finish(&mut self, winner: Player) {
        self.phase = Phase::GameOver;
        self.winner = Some(winner);
    }
}
