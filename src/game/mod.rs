pub mod globals;
pub use globals::*;

mod agent;
pub use agent::{learner_for, Agent};

mod engine;
pub mod learner;
pub mod prng;
pub mod rules;

mod state;
pub use state::GameState;

pub mod storage;

use std::rc::Rc;

use learner::Hyperparameters;
use storage::Storage;

/// A session of the game, as played through a user interface.
pub struct Game {
    /// Agents playing the game, one per seat.
    agents: Vec<Agent>,
    /// Every snapshot the game has been through, oldest first.
    history: Vec<GameState>,
    /// The index of the snapshot the game is currently at.
    current_handle: usize,
}

impl Game {
    /*********        PUBLIC INTERFACES        *********/

    /// Return a new game. AI players learn with `params` and keep what they learn in `storage`.
    pub fn new(options: InitOptions, storage: Rc<dyn Storage>, params: Hyperparameters) -> Self {
        let state = GameState::new(options);
        let mut agents = Agent::for_game(&state, storage, params);

        // The AI may hold the first seats
        let state = state.run_until_human(&mut agents);

        Self {
            agents,
            history: vec![state],
            current_handle: 0,
        }
    }

    /// Roll the dice for the current player.
    pub fn roll(&mut self) -> &GameState {
        let next = self.state().roll_and_advance();
        self.commit(next)
    }

    /// Resolve the tile the current player landed on.
    pub fn resolve(&mut self) -> &GameState {
        let next = self.state().resolve_landing();
        self.commit(next)
    }

    /// Buy the tile the current player is on.
    pub fn buy(&mut self) -> &GameState {
        let next = self.history[self.current_handle].buy_current(&mut self.agents);
        self.commit(next)
    }

    /// Decline to buy the tile the current player is on.
    pub fn skip(&mut self) -> &GameState {
        let next = self.state().skip_purchase();
        self.commit(next)
    }

    /// Improve the tile at `tile`.
    pub fn build(&mut self, tile: usize) -> &GameState {
        let next = self.history[self.current_handle].build_on_owned(tile, &mut self.agents);
        self.commit(next)
    }

    /// Mortgage the tile at `tile`, or lift its mortgage.
    pub fn mortgage(&mut self, tile: usize) -> &GameState {
        let next = self.state().toggle_mortgage(tile);
        self.commit(next)
    }

    /// End the current turn, then let the AI play until it's a human's turn again.
    pub fn end_turn(&mut self) -> &GameState {
        // A refused end doesn't hand over to the AI
        let accepted = self.state().phase == Phase::AwaitEnd;
        let ended = self.state().end_turn();

        let next = if accepted {
            ended.run_until_human(&mut self.agents)
        } else {
            ended
        };

        self.commit(next)
    }

    /// Let the AI play on, e.g. once every human seat is bankrupt.
    pub fn play_ai(&mut self) -> &GameState {
        let next = self.history[self.current_handle].run_until_human(&mut self.agents);
        self.commit(next)
    }

    /// Step back to the previous snapshot. Return whether there was one.
    ///
    /// Only the board is rewound: what the AI learned along the way is kept.
    pub fn undo(&mut self) -> bool {
        if self.current_handle == 0 {
            return false;
        }

        self.current_handle -= 1;
        true
    }

    /// Step forward to the snapshot last undone. Return whether there was one.
    pub fn redo(&mut self) -> bool {
        if self.current_handle + 1 >= self.history.len() {
            return false;
        }

        self.current_handle += 1;
        true
    }

    /*********        GETTERS        *********/

    /// Return an immutable reference to the current game state.
    pub fn state(&self) -> &GameState {
        &self.history[self.current_handle]
    }

    /// Return the agents playing the game.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The number of snapshots that can be stepped back through.
    pub fn depth(&self) -> usize {
        self.current_handle
    }

    /*********        HELPERS        *********/

    /// Make `next` the current state, discarding any snapshots that were undone.
    fn commit(&mut self, next: GameState) -> &GameState {
        self.history.truncate(self.current_handle + 1);
        self.history.push(next);
        self.current_handle = self.history.len() - 1;

        self.state()
    }
}
