//! Error types for the engine and the learner's storage.

use thiserror::Error;

use crate::game::Phase;

/// Why a transition was refused.
///
/// Transitions never fail outright: a refused call returns the state unchanged
/// apart from a log entry carrying this message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{action} is not allowed during {phase}")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("{player} is bankrupt")]
    Bankrupt { player: String },
    #[error("{player} can't afford ${needed} (has ${cash})")]
    InsufficientFunds {
        player: String,
        needed: i64,
        cash: i64,
    },
    #[error("{player} doesn't own tile {tile}")]
    NotOwner { player: String, tile: u8 },
    #[error("tile {0} can't be owned")]
    NotOwnable(u8),
    #[error("tile {0} is already owned")]
    AlreadyOwned(u8),
    #[error("tile {0} is fully improved")]
    FullyImproved(u8),
    #[error("tile {0} is mortgaged")]
    Mortgaged(u8),
    #[error("there is no tile {0}")]
    NoSuchTile(usize),
    #[error("{player} is played by a human")]
    HumanSeat { player: String },
    #[error("{player} is still in jail ({turns} turn(s) served)")]
    StillInJail { player: String, turns: u8 },
}

/// Failures of a storage backend. The learner logs these and carries on.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage key {0:?} is not a valid file name")]
    InvalidKey(String),
}
