use crate::model::card::Card;
use crate::model::player::Player;
use crate::model::suit::Suit;
use crate::rules::resolver::{TrickWinner, resolve_trick, trick_points};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: Player,
    led: Option<Card>,
    response: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    OutOfTurn { expected: Player, actual: Player },
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: Player) -> Self {
        Self {
            leader,
            led: None,
            response: None,
        }
    }

    pub fn leader(&self) -> Player {
        self.leader
    }

    pub fn responder(&self) -> Player {
        self.leader.other()
    }

    pub fn led(&self) -> Option<Card> {
        self.led
    }

    pub fn response(&self) -> Option<Card> {
        self.response
    }

    pub fn is_empty(&self) -> bool {
        self.led.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.response.is_some()
    }

    pub fn expected_player(&self) -> Option<Player> {
        match (self.led, self.response) {
            (None, _) => Some(self.leader),
            (Some(_), None) => Some(self.responder()),
            (Some(_), Some(_)) => None,
        }
    }

    pub fn play(&mut self, player: Player, card: Card) -> Result<(), TrickError> {
        let expected = self.expected_player().ok_or(TrickError::TrickComplete)?;
        if expected != player {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: player,
            });
        }
        if self.led.is_none() {
            self.led = Some(card);
        } else {
            self.response = Some(card);
        }
        Ok(())
    }

    pub fn winner(&self, trump: Suit) -> Option<Player> {
        let (led, response) = (self.led?, self.response?);
        Some(match resolve_trick(led, response, trump) {
            TrickWinner::Leader => self.leader,
            TrickWinner::Responder => self.responder(),
        })
    }

    /// Card points on the table; a lone lead counts on its own.
    pub fn points(&self) -> u32 {
        match (self.led, self.response) {
            (Some(led), Some(response)) => trick_points(led, response),
            (led, _) => led.map_or(0, Card::points),
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.led.into_iter().chain(self.response)
    }
}

#[cfg(test)]
mod tests {
    use super::{Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::player::Player;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(Player::Opponent);
        assert!(matches!(
            trick.play(Player::Human, Card::new(Rank::Nine, Suit::Clubs)),
            Err(TrickError::OutOfTurn { .. })
        ));
        trick
            .play(Player::Opponent, Card::new(Rank::Nine, Suit::Clubs))
            .unwrap();
        trick
            .play(Player::Human, Card::new(Rank::Jack, Suit::Clubs))
            .unwrap();
        assert!(trick.is_complete());
        assert_eq!(
            trick.play(Player::Opponent, Card::new(Rank::Ace, Suit::Clubs)),
            Err(TrickError::TrickComplete)
        );
    }

    #[test]
    fn winner_and_points_for_completed_trick() {
        let mut trick = Trick::new(Player::Human);
        trick
            .play(Player::Human, Card::new(Rank::Ten, Suit::Clubs))
            .unwrap();
        assert_eq!(trick.winner(Suit::Spades), None);
        assert_eq!(trick.points(), 10);
        trick
            .play(Player::Opponent, Card::new(Rank::Nine, Suit::Spades))
            .unwrap();
        assert_eq!(trick.winner(Suit::Spades), Some(Player::Opponent));
        assert_eq!(trick.points(), 10);
        assert_eq!(trick.cards().count(), 2);
    }
}
