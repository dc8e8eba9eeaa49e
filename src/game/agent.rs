use std::rc::Rc;

use super::learner::{Hyperparameters, QLearner};
use super::state::GameState;
use super::storage::Storage;

#[derive(Debug)]
/// An agent playing the game, or the "brains" of a player.
pub enum Agent {
    /// An AI agent that learns as it plays.
    Ai {
        /// The learned values behind the agent's decisions.
        learner: QLearner,
    },
    /// A physical human player.
    Human,
}

impl Agent {
    /*********        PUBLIC INTERFACES        *********/

    /// Return a new AI agent for `player`, restoring what it learned in earlier games.
    pub fn new_ai(player: usize, storage: Rc<dyn Storage>, params: Hyperparameters) -> Agent {
        Agent::Ai {
            learner: QLearner::load(player, storage, params),
        }
    }

    /// Return a new human agent.
    pub fn new_human() -> Agent {
        Agent::Human
    }

    /// Return one agent per player of `state`, in seat order.
    pub fn for_game(state: &GameState, storage: Rc<dyn Storage>, params: Hyperparameters) -> Vec<Agent> {
        state
            .players
            .iter()
            .map(|player| {
                if player.is_human {
                    Agent::new_human()
                } else {
                    Agent::new_ai(player.id, storage.clone(), params)
                }
            })
            .collect()
    }

    /*********        GETTERS        *********/

    pub fn is_human(&self) -> bool {
        matches!(self, Agent::Human)
    }

    /// The agent's learner, if it's an AI.
    pub fn learner(&self) -> Option<&QLearner> {
        match self {
            Agent::Ai { learner } => Some(learner),
            Agent::Human => None,
        }
    }

    /// A mutable reference to the agent's learner, if it's an AI.
    pub fn learner_mut(&mut self) -> Option<&mut QLearner> {
        match self {
            Agent::Ai { learner } => Some(learner),
            Agent::Human => None,
        }
    }
}

/// Return the learner of `player`, unless the player is human or has no agent.
pub fn learner_for(agents: &mut [Agent], player: usize) -> Option<&mut QLearner> {
    agents.get_mut(player).and_then(Agent::learner_mut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::globals::InitOptions;
    use crate::game::storage::NoStorage;

    #[test]
    fn agents_follow_the_seating() {
        let state = GameState::new(InitOptions {
            players: 4,
            humans: 1,
            ..InitOptions::default()
        });
        let mut agents = Agent::for_game(&state, Rc::new(NoStorage), Hyperparameters::default());

        assert_eq!(agents.len(), 4);
        assert!(agents[0].is_human());
        assert!(agents[1..].iter().all(|a| !a.is_human()));

        assert!(learner_for(&mut agents, 0).is_none());
        assert_eq!(learner_for(&mut agents, 2).map(|l| l.player()), Some(2));
        assert!(learner_for(&mut agents, 9).is_none());
    }
}
