use crate::error::{GameError, IllegalMove};
use crate::game::event::GameEvent;
use crate::game::state::{GameState, Phase};
use crate::model::card::Card;
use crate::model::hand::HAND_SIZE;
use crate::model::moves::Move;
use crate::model::player::Player;
use crate::rules::announcement::evaluate_announcement;
use crate::rules::legality::check_rule;
use crate::rules::resolver::{check_close, check_trump_exchange};
use tracing::{debug, error, info, warn};

/// A move the controller accepted, with the flags it actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub mv: Move,
    pub events: Vec<GameEvent>,
}

/// Drives one hand of play through lead, response and resolution.
///
/// Every method either applies a whole transition or leaves the state
/// untouched. A fatal error is latched: all later calls return it again.
#[derive(Debug, Clone)]
pub struct TurnController {
    state: GameState,
    fault: Option<GameError>,
}

impl TurnController {
    pub fn new(state: GameState) -> Result<Self, GameError> {
        state.check_conservation()?;
        state.check_phase()?;
        Ok(Self { state, fault: None })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn fault(&self) -> Option<&GameError> {
        self.fault.as_ref()
    }

    /// Marks the hand as unable to continue.
    pub fn abort(&mut self, err: GameError) -> GameError {
        error!(target: "santase_core::turn", error = %err, "hand aborted");
        self.fault = Some(err.clone());
        err
    }

    pub fn submit(&mut self, player: Player, mv: Move) -> Result<Accepted, GameError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        let phase = self.state.phase();
        let result = match phase {
            Phase::LeadWait if self.state.trick().leader() == player => self.lead(player, mv),
            Phase::ResponseWait if self.state.trick().responder() == player => {
                if mv.has_lead_flags() {
                    Err(self.out_of_sequence(player, "special actions are only allowed when leading"))
                } else {
                    self.respond(player, mv)
                }
            }
            Phase::LeadWait | Phase::ResponseWait => {
                Err(self.out_of_sequence(player, "it is the other player's turn"))
            }
            Phase::Resolving => Err(self.out_of_sequence(player, "the trick is being resolved")),
            Phase::GameOver => Err(self.out_of_sequence(player, "the hand is over")),
        };
        match &result {
            Ok(accepted) => {
                debug!(target: "santase_core::turn", %player, mv = %accepted.mv, phase = ?self.state.phase(), "move accepted")
            }
            Err(err) => {
                warn!(target: "santase_core::turn", %player, %mv, error = %err, "move rejected")
            }
        }
        result
    }

    fn out_of_sequence(&self, player: Player, detail: &'static str) -> GameError {
        GameError::OutOfSequence {
            player,
            phase: self.state.phase(),
            detail,
        }
    }

    fn lead(&mut self, player: Player, mv: Move) -> Result<Accepted, GameError> {
        if mv.close_stock && mv.switch_trump_card {
            return Err(IllegalMove::ConflictingActions.into());
        }

        let closed = self.state.is_closed();
        let remaining = self.state.stock().remaining();
        let trump = self.state.trump_suit();
        let hand = self.state.hand(player);

        // Validate everything against the hand as it will look after a swap.
        let mut effective = hand.clone();
        let mut exchange: Option<(Card, Card)> = None;
        if mv.switch_trump_card {
            let nine = check_trump_exchange(hand, self.state.stock(), closed, false)?;
            let taken = self.state.trump_card().ok_or(IllegalMove::ExchangeUnavailable)?;
            effective.remove(nine);
            effective.add(taken);
            exchange = Some((nine, taken));
        }
        if mv.close_stock {
            check_close(closed, false, remaining)?;
        }
        if !effective.contains(mv.card) {
            return Err(IllegalMove::CardNotInHand(mv.card).into());
        }
        check_rule(&self.state.trick_context(), &effective, mv.card)?;
        let announcement = evaluate_announcement(&effective, mv.card, false, remaining, trump);
        if mv.is_announcement && announcement == 0 {
            return Err(IllegalMove::NoMarriage(mv.card).into());
        }

        let mut events = Vec::new();
        if let Some((nine, taken)) = exchange {
            let stock_card = self.state.stock_mut().exchange_trump(nine);
            if stock_card != Some(taken) {
                return Err(self.fail(format!("trump slot changed during exchange of {nine}")));
            }
            let hand = self.state.hand_mut(player);
            hand.remove(nine);
            hand.add(taken);
            events.push(GameEvent::TrumpSwapped { player, nine, taken });
        }
        if mv.close_stock {
            self.state.close(player);
            events.push(GameEvent::StockClosed { player });
        }

        self.state.hand_mut(player).remove(mv.card);
        if let Err(err) = self.state.trick_mut().play(player, mv.card) {
            return Err(self.fail(format!("lead rejected by trick: {err}")));
        }
        events.push(GameEvent::CardPlayed {
            player,
            card: mv.card,
        });

        self.state.set_pending_announcement(announcement);
        if announcement > 0 {
            let total = self.state.scores_mut().add(player, announcement);
            info!(target: "santase_core::turn", %player, value = announcement, total, "marriage announced");
            events.push(GameEvent::AnnouncementMade {
                player,
                value: announcement,
            });
        }

        if self.state.scores().has_won(player) {
            self.finish(player, &mut events);
        } else {
            self.state.set_phase(Phase::ResponseWait);
        }

        let applied = Move {
            is_announcement: announcement > 0,
            ..mv
        };
        Ok(Accepted {
            mv: applied,
            events,
        })
    }

    fn respond(&mut self, player: Player, mv: Move) -> Result<Accepted, GameError> {
        let hand = self.state.hand(player);
        if !hand.contains(mv.card) {
            return Err(IllegalMove::CardNotInHand(mv.card).into());
        }
        check_rule(&self.state.trick_context(), hand, mv.card)?;

        self.state.hand_mut(player).remove(mv.card);
        if let Err(err) = self.state.trick_mut().play(player, mv.card) {
            return Err(self.fail(format!("response rejected by trick: {err}")));
        }
        self.state.set_phase(Phase::Resolving);
        Ok(Accepted {
            mv,
            events: vec![GameEvent::CardPlayed {
                player,
                card: mv.card,
            }],
        })
    }

    /// Settles the trick on the table: points, game-over check, draws.
    pub fn resolve(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.state.phase() != Phase::Resolving {
            return Err(GameError::OutOfSequence {
                player: self.state.turn_holder(),
                phase: self.state.phase(),
                detail: "no completed trick to resolve",
            });
        }

        let trump = self.state.trump_suit();
        let Some(winner) = self.state.trick().winner(trump) else {
            return Err(self.fail("resolving an incomplete trick".to_string()));
        };
        let points = self.state.trick().points();
        let loser = winner.other();

        let mut events = Vec::new();
        self.state.complete_trick(winner);
        let total = self.state.scores_mut().add(winner, points);
        info!(target: "santase_core::turn", %winner, points, total, "trick resolved");
        events.push(GameEvent::TrickResolved { winner, points });

        if self.state.scores().has_won(winner) {
            self.finish(winner, &mut events);
            self.verify()?;
            return Ok(events);
        }

        let replenish = !self.state.is_closed()
            && !self.state.stock().is_exhausted()
            && self.state.hand(winner).len() == HAND_SIZE - 1
            && self.state.hand(loser).len() == HAND_SIZE - 1;
        if replenish {
            for player in [winner, loser] {
                let Some(card) = self.state.stock_mut().draw() else {
                    return Err(self.fail(format!("stock ran dry while drawing for {player}")));
                };
                self.state.hand_mut(player).add(card);
                debug!(target: "santase_core::turn", %player, %card, "card drawn");
                events.push(GameEvent::CardDrawn { player, card });
            }
        }

        if self.state.hand(winner).is_empty() && self.state.hand(loser).is_empty() {
            let champion = match self.state.closed_by() {
                Some(closer) if !self.state.scores().has_won(closer) => closer.other(),
                _ => winner,
            };
            self.finish(champion, &mut events);
        } else {
            self.state.set_pending_announcement(0);
            self.state.set_phase(Phase::LeadWait);
        }

        self.verify()?;
        Ok(events)
    }

    fn finish(&mut self, winner: Player, events: &mut Vec<GameEvent>) {
        self.state.finish(winner);
        let final_scores = *self.state.scores().standings();
        info!(target: "santase_core::turn", %winner, ?final_scores, "hand over");
        events.push(GameEvent::GameOver {
            winner,
            final_scores,
        });
    }

    fn verify(&mut self) -> Result<(), GameError> {
        match self.state.check_conservation() {
            Ok(()) => Ok(()),
            Err(err) => Err(self.abort(err)),
        }
    }

    fn fail(&mut self, detail: String) -> GameError {
        let err = self.state.invariant(detail);
        self.abort(err)
    }
}
