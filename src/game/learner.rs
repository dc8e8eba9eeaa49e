//! A tabular Q-learner for the buy and build decisions of AI players.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::globals::*;
use super::prng::draw;
use super::rules::group_holdings;
use super::state::GameState;
use super::storage::Storage;

/// Learning rate.
pub const ALPHA: f64 = 0.2;
/// Discount applied to the value of the next state.
pub const GAMMA: f64 = 0.9;
/// Probability of exploring instead of picking the best-known action.
pub const EPSILON: f64 = 0.1;
/// Net worth is divided by this to get the reward.
pub const REWARD_SCALE: f64 = 50.;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Tunable constants of the learner.
pub struct Hyperparameters {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub reward_scale: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            alpha: ALPHA,
            gamma: GAMMA,
            epsilon: EPSILON,
            reward_scale: REWARD_SCALE,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// A decision the learner can make. Actions come in two
/// independent pairs: `Buy`/`Skip` and `Build`/`Hold`.
pub enum Action {
    Buy = 0,
    Skip = 1,
    Build = 2,
    Hold = 3,
}

impl Action {
    /// The choices offered when a player may buy a tile.
    pub const BUY_PAIR: [Action; 2] = [Action::Buy, Action::Skip];
    /// The choices offered when a player may improve a tile.
    pub const BUILD_PAIR: [Action; 2] = [Action::Build, Action::Hold];

    /// The pair this action belongs to.
    pub fn pair(self) -> [Action; 2] {
        match self {
            Action::Buy | Action::Skip => Action::BUY_PAIR,
            Action::Build | Action::Hold => Action::BUILD_PAIR,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Buy => "buy",
            Action::Skip => "skip",
            Action::Build => "build",
            Action::Hold => "hold",
        };

        write!(f, "{}", name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// A player's situation reduced to four small buckets.
pub struct Features {
    /// Cash in steps of 300, from 0 to 6.
    pub cash: u8,
    /// Tile cost in steps of 100, from 0 to 6.
    pub cost: u8,
    /// The share of the tile's group the player holds, from 0 to 3.
    pub group: u8,
    /// The dice sum: 2-5 is 0, 6-9 is 1 and 10-12 is 2.
    pub dice: u8,
}

impl Features {
    /// Describe `player`'s situation with regard to the tile at `tile`.
    pub fn observe(state: &GameState, player: usize, tile: u8) -> Features {
        let cash = state.players[player].cash;
        let prop = state
            .tiles
            .get(tile as usize)
            .and_then(|tile| tile.property.as_ref());

        let (cost, group) = match prop {
            Some(prop) => {
                let held = group_holdings(&state.tiles, player, prop.group) as f64;
                let size = group_size(prop.group).max(1) as f64;
                (prop.cost, (3. * held / size).round() as u8)
            }
            None => (0, 0),
        };

        let dice = match state.dice.map(|roll| roll.sum()) {
            Some(sum) if sum >= 10 => 2,
            Some(sum) if sum >= 6 => 1,
            _ => 0,
        };

        Features {
            cash: (cash / 300).max(0).min(6) as u8,
            cost: (cost / 100).max(0).min(6) as u8,
            group: group.min(3),
            dice,
        }
    }

    /// Pack the features and an action into a table key.
    ///
    /// Layout, high to low: cash (3 bits), cost (3), group (2), dice (2), action (2).
    pub fn key(&self, action: Action) -> u16 {
        (self.cash as u16) << 9
            | (self.cost as u16) << 6
            | (self.group as u16) << 4
            | (self.dice as u16) << 2
            | action as u16
    }
}

/// The learned values of one AI player, persisted under `q.p<id>`.
pub struct QLearner {
    /// The index of the player this learner plays for.
    player: usize,
    /// Value estimates by packed feature-action key. Missing keys are worth 0.
    table: HashMap<u16, f64>,
    params: Hyperparameters,
    storage: Rc<dyn Storage>,
}

impl fmt::Debug for QLearner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QLearner")
            .field("player", &self.player)
            .field("entries", &self.table.len())
            .field("params", &self.params)
            .finish()
    }
}

impl QLearner {
    /*********        INITIALISATION INTERFACES        *********/

    /// Create a learner for `player`, restoring its table from `storage` if one was saved.
    pub fn load(player: usize, storage: Rc<dyn Storage>, params: Hyperparameters) -> QLearner {
        let key = QLearner::storage_key(player);

        let table = match storage.get(&key) {
            Ok(Some(value)) => match serde_json::from_value::<HashMap<u16, f64>>(value) {
                Ok(table) => table,
                Err(e) => {
                    log::warn!("discarding unreadable policy {}: {}", key, e);
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                log::warn!("couldn't load policy {}: {}", key, e);
                HashMap::new()
            }
        };

        log::debug!("{:<32}{:<32}", "loaded policy", format!("{} ({} entries)", key, table.len()));

        QLearner {
            player,
            table,
            params,
            storage,
        }
    }

    /// The storage key of `player`'s table.
    pub fn storage_key(player: usize) -> String {
        format!("q.p{}", player)
    }

    /*********        GETTERS        *********/

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    /// The number of feature-action pairs with a learned value.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The learned value of taking `action` in the situation `features`.
    pub fn value(&self, features: &Features, action: Action) -> f64 {
        self.table.get(&features.key(action)).copied().unwrap_or(0.)
    }

    /*********        DECISIONS        *********/

    /// Pick from `pair` epsilon-greedily, drawing randomness from `seed`.
    /// Ties go to the first action of the pair.
    pub fn decide(&self, features: &Features, pair: [Action; 2], seed: &mut u32) -> Action {
        if draw(seed) >= self.params.epsilon {
            if self.value(features, pair[1]) > self.value(features, pair[0]) {
                pair[1]
            } else {
                pair[0]
            }
        } else if draw(seed) < 0.5 {
            pair[0]
        } else {
            pair[1]
        }
    }

    /// Decide whether to buy the tile at `tile`.
    pub fn decide_buy(&self, state: &GameState, tile: u8, seed: &mut u32) -> Action {
        let features = Features::observe(state, self.player, tile);
        self.decide(&features, Action::BUY_PAIR, seed)
    }

    /// Decide whether to improve the tile at `tile`.
    pub fn decide_build(&self, state: &GameState, tile: u8, seed: &mut u32) -> Action {
        let features = Features::observe(state, self.player, tile);
        self.decide(&features, Action::BUILD_PAIR, seed)
    }

    /*********        LEARNING        *********/

    /// Apply one temporal-difference update to the value of `action` in `before`.
    pub fn learn(&mut self, before: &Features, action: Action, after: &Features, reward: f64) {
        let next_best = action
            .pair()
            .iter()
            .map(|&a| self.value(after, a))
            .fold(f64::NEG_INFINITY, f64::max);

        let key = before.key(action);
        let current = self.table.get(&key).copied().unwrap_or(0.);
        let target = reward + self.params.gamma * next_best;

        self.table
            .insert(key, current + self.params.alpha * (target - current));
        self.save();
    }

    /// Learn from the outcome of taking `action` about the tile at `tile`,
    /// where `before` and `after` are the snapshots either side of the decision.
    pub fn learn_from(&mut self, before: &GameState, after: &GameState, tile: u8, action: Action) {
        let reward = (after.players[self.player].net_worth - before.players[self.player].net_worth)
            as f64
            / self.params.reward_scale;

        let s = Features::observe(before, self.player, tile);
        let s_next = Features::observe(after, self.player, tile);

        log::debug!(
            "player {} learns {} on tile {} (reward {:.2})",
            self.player,
            action,
            tile,
            reward
        );
        self.learn(&s, action, &s_next, reward);
    }

    /// Learn from a buy-or-skip decision.
    pub fn learn_buy(&mut self, before: &GameState, after: &GameState, tile: u8, action: Action) {
        debug_assert!(Action::BUY_PAIR.contains(&action));
        self.learn_from(before, after, tile, action);
    }

    /// Learn from a build-or-hold decision.
    pub fn learn_build(&mut self, before: &GameState, after: &GameState, tile: u8, action: Action) {
        debug_assert!(Action::BUILD_PAIR.contains(&action));
        self.learn_from(before, after, tile, action);
    }

    /*********        PERSISTENCE        *********/

    /// Write the table to storage. Failures are logged and otherwise ignored.
    pub fn save(&self) {
        let key = QLearner::storage_key(self.player);

        let result = serde_json::to_value(&self.table)
            .map_err(Into::into)
            .and_then(|value| self.storage.set(&key, value));

        if let Err(e) = result {
            log::warn!("couldn't save policy {}: {}", key, e);
        }
    }
}
