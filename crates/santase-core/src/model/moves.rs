use crate::model::card::Card;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A single player action: exactly one card, optionally bundled with one
/// lead-only special action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub card: Card,
    #[serde(default)]
    pub close_stock: bool,
    #[serde(default)]
    pub switch_trump_card: bool,
    #[serde(default)]
    pub is_announcement: bool,
}

impl Move {
    pub const fn play(card: Card) -> Self {
        Self {
            card,
            close_stock: false,
            switch_trump_card: false,
            is_announcement: false,
        }
    }

    pub const fn closing(mut self) -> Self {
        self.close_stock = true;
        self
    }

    pub const fn switching_trump(mut self) -> Self {
        self.switch_trump_card = true;
        self
    }

    pub const fn announcing(mut self) -> Self {
        self.is_announcement = true;
        self
    }

    pub const fn has_lead_flags(&self) -> bool {
        self.close_stock || self.switch_trump_card || self.is_announcement
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.card)?;
        if self.switch_trump_card {
            f.write_str(" +switch")?;
        }
        if self.close_stock {
            f.write_str(" +close")?;
        }
        if self.is_announcement {
            f.write_str(" +marriage")?;
        }
        Ok(())
    }
}
