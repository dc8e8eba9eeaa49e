//! A deterministic simulation of a property-trading board game, with
//! AI players that learn their buying and building habits as they play.

pub mod error;
pub mod game;

pub use error::{Rejection, StorageError};
pub use game::{Agent, Game, GameState, InitOptions, Phase};
