use crate::game::state::Phase;
use crate::model::card::Card;
use crate::model::moves::Move;
use crate::model::player::Player;
use crate::model::suit::Suit;
use thiserror::Error;

/// Why a move was refused by the rules. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("{0} is not in hand")]
    CardNotInHand(Card),
    #[error("must follow {0}")]
    MustFollowSuit(Suit),
    #[error("must beat {0} with a higher card of the same suit")]
    MustBeatLead(Card),
    #[error("must play a trump ({0})")]
    MustPlayTrump(Suit),
    #[error("a move may carry at most one of close and switch")]
    ConflictingActions,
    #[error("the stock cannot be closed now")]
    CloseUnavailable,
    #[error("the trump card cannot be exchanged now")]
    ExchangeUnavailable,
    #[error("the nine of trumps ({0}) is not in hand")]
    MissingTrumpNine(Suit),
    #[error("{0} does not complete a marriage that can be announced")]
    NoMarriage(Card),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    #[error("{player} cannot act during {phase:?}: {detail}")]
    OutOfSequence {
        player: Player,
        phase: Phase,
        detail: &'static str,
    },
    #[error("engine invariant violated: {detail}\n{diagnostic}")]
    InvariantViolation { detail: String, diagnostic: String },
    #[error("opponent returned an unusable move {mv}: {reason}")]
    OpponentContractViolation { mv: Move, reason: String },
}

impl GameError {
    /// Fatal errors end the hand; the rest leave the state untouched.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::InvariantViolation { .. } | GameError::OpponentContractViolation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{GameError, IllegalMove};
    use crate::game::state::Phase;
    use crate::model::card::Card;
    use crate::model::moves::Move;
    use crate::model::player::Player;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn user_errors_are_recoverable() {
        let illegal: GameError = IllegalMove::MustFollowSuit(Suit::Clubs).into();
        assert!(!illegal.is_fatal());
        let seq = GameError::OutOfSequence {
            player: Player::Human,
            phase: Phase::Resolving,
            detail: "trick is being resolved",
        };
        assert!(!seq.is_fatal());
        assert!(seq.to_string().contains("Resolving"));
    }

    #[test]
    fn engine_and_contract_errors_are_fatal() {
        let contract = GameError::OpponentContractViolation {
            mv: Move::play(Card::new(Rank::Ace, Suit::Hearts)),
            reason: "card not in hand".to_string(),
        };
        assert!(contract.is_fatal());
        let invariant = GameError::InvariantViolation {
            detail: "duplicate card".to_string(),
            diagnostic: String::new(),
        };
        assert!(invariant.is_fatal());
    }
}
