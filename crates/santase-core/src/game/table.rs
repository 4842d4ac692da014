use crate::error::GameError;
use crate::game::event::GameEvent;
use crate::game::opponent::{Opponent, OpponentFactory};
use crate::game::state::{GameState, Phase};
use crate::game::turn::TurnController;
use crate::model::moves::Move;
use crate::model::player::Player;
use tracing::{debug, error};

/// Acknowledgement of an accepted human move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// The move as applied (announcement flag normalised).
    pub mv: Move,
    /// Everything that followed, including the opponent's reply.
    pub events: Vec<GameEvent>,
    pub phase: Phase,
}

/// A hand of play against an automated opponent. The opponent is asked
/// for moves whenever it holds the turn; every answer is re-validated.
pub struct Table {
    controller: TurnController,
    opponent: Box<dyn Opponent>,
}

impl Table {
    pub fn deal(state: GameState, factory: &dyn OpponentFactory) -> Result<Self, GameError> {
        let Some(trump_card) = state.trump_card() else {
            return Err(state.invariant("a new hand needs a face-up trump card".to_string()));
        };
        let opponent = factory.create_opponent(
            state.hand(Player::Opponent),
            trump_card,
            state.led_by_opponent(),
        );
        Ok(Self::resume(TurnController::new(state)?, opponent))
    }

    /// Continues a hand, e.g. one restored from a snapshot.
    pub fn resume(controller: TurnController, opponent: Box<dyn Opponent>) -> Self {
        Self {
            controller,
            opponent,
        }
    }

    pub fn state(&self) -> &GameState {
        self.controller.state()
    }

    pub fn fault(&self) -> Option<&GameError> {
        self.controller.fault()
    }

    pub fn needs_resolution(&self) -> bool {
        self.controller.phase() == Phase::Resolving && self.controller.fault().is_none()
    }

    /// Lets the opponent act if it is on turn. Call once after dealing.
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.drive_opponent()
    }

    pub fn submit_human(&mut self, mv: Move) -> Result<Ack, GameError> {
        let accepted = self.controller.submit(Player::Human, mv)?;
        self.opponent.observe_human_move(&accepted.mv);
        let mut events = accepted.events;
        events.extend(self.drive_opponent()?);
        Ok(Ack {
            mv: accepted.mv,
            events,
            phase: self.controller.phase(),
        })
    }

    /// Settles the pending trick and lets the opponent lead if it won.
    pub fn resolve(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let mut events = self.controller.resolve()?;
        for event in &events {
            if let GameEvent::CardDrawn {
                player: Player::Opponent,
                card,
            } = event
            {
                self.opponent.observe_drawn_card(*card);
            }
        }
        events.extend(self.drive_opponent()?);
        Ok(events)
    }

    fn drive_opponent(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();
        loop {
            let mv = {
                let state = self.controller.state();
                let on_turn = matches!(state.phase(), Phase::LeadWait | Phase::ResponseWait)
                    && state.turn_holder() == Player::Opponent;
                if !on_turn || self.controller.fault().is_some() {
                    break;
                }
                self.opponent.choose_move(&state.view_for(Player::Opponent))
            };
            debug!(target: "santase_core::table", %mv, "opponent move");
            match self.controller.submit(Player::Opponent, mv) {
                Ok(accepted) => events.extend(accepted.events),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    error!(target: "santase_core::table", %mv, error = %err, "opponent broke the move contract");
                    return Err(self.controller.abort(GameError::OpponentContractViolation {
                        mv,
                        reason: err.to_string(),
                    }));
                }
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::Table;
    use crate::error::GameError;
    use crate::game::event::GameEvent;
    use crate::game::opponent::Opponent;
    use crate::game::state::{GameState, Phase};
    use crate::game::view::PlayerView;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::moves::Move;
    use crate::model::player::Player;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Log {
        humans: Vec<Move>,
        drawn: Vec<Card>,
    }

    /// Plays the first legal card; optionally cheats with a card it lacks.
    struct Scripted {
        log: Arc<Mutex<Log>>,
        cheat: Option<Card>,
    }

    impl Opponent for Scripted {
        fn choose_move(&mut self, view: &PlayerView<'_>) -> Move {
            if let Some(card) = self.cheat {
                return Move::play(card);
            }
            Move::play(view.legal_cards()[0])
        }

        fn observe_human_move(&mut self, mv: &Move) {
            self.log.lock().unwrap().humans.push(*mv);
        }

        fn observe_drawn_card(&mut self, card: Card) {
            self.log.lock().unwrap().drawn.push(card);
        }
    }

    fn table(seed: u64, leader: Player, cheat: Option<Card>) -> (Table, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let shared = Arc::clone(&log);
        let factory = move |_: &Hand, _: Card, _: bool| -> Box<dyn Opponent> {
            Box::new(Scripted {
                log: Arc::clone(&shared),
                cheat,
            })
        };
        let table = Table::deal(GameState::with_seed(seed, leader), &factory).unwrap();
        (table, log)
    }

    #[test]
    fn opponent_answers_human_lead() {
        let (mut table, log) = table(3, Player::Human, None);
        let lead = table.state().hand(Player::Human).cards()[0];
        let ack = table.submit_human(Move::play(lead)).unwrap();
        assert_eq!(ack.phase, Phase::Resolving);
        let plays = ack
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CardPlayed { .. }))
            .count();
        assert_eq!(plays, 2);
        assert!(table.needs_resolution());
        let seen = &log.lock().unwrap().humans;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].card, lead);
    }

    #[test]
    fn opponent_leads_first_when_dealt_the_lead() {
        let (mut table, _) = table(3, Player::Opponent, None);
        let events = table.start().unwrap();
        assert!(matches!(events[0], GameEvent::CardPlayed { player: Player::Opponent, .. }));
        assert_eq!(table.state().phase(), Phase::ResponseWait);
        assert_eq!(table.state().turn_holder(), Player::Human);
    }

    #[test]
    fn opponent_is_told_its_draws() {
        let (mut table, log) = table(11, Player::Human, None);
        let lead = table.state().hand(Player::Human).cards()[0];
        table.submit_human(Move::play(lead)).unwrap();
        let events = table.resolve().unwrap();
        let opponent_draws: Vec<Card> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CardDrawn { player: Player::Opponent, card } => Some(*card),
                _ => None,
            })
            .collect();
        assert_eq!(opponent_draws.len(), 1);
        assert_eq!(log.lock().unwrap().drawn, opponent_draws);
    }

    #[test]
    fn cheating_opponent_is_fatal() {
        let deal = GameState::with_seed(5, Player::Human);
        let missing = deal.hand(Player::Human).cards()[0];
        let (mut table, _) = table(5, Player::Human, Some(missing));
        let lead = table.state().hand(Player::Human).cards()[1];
        let err = table.submit_human(Move::play(lead)).unwrap_err();
        assert!(matches!(err, GameError::OpponentContractViolation { .. }));
        assert!(err.is_fatal());
        assert!(!table.needs_resolution());
        assert_eq!(table.submit_human(Move::play(missing)).unwrap_err(), err);
    }
}
