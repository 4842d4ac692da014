use super::state::GameState;
use super::turn::TurnController;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("snapshot describes an inconsistent hand: {0}")]
    Invalid(#[from] GameError),
}

/// Full hand state, enough to continue play exactly where it stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub version: u32,
    pub state: GameState,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            state: state.clone(),
        }
    }

    pub fn restore(self) -> Result<TurnController, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        Ok(TurnController::new(self.state)?)
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(state))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
