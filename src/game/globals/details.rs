use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DEFAULT_SEED, MAX_PLAYERS, STARTING_CASH};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The result of rolling the two dice.
pub struct DiceRoll {
    /// The value of the first die, from 1 to 6.
    pub d1: u8,
    /// The value of the second die, from 1 to 6.
    pub d2: u8,
}

impl DiceRoll {
    /// The sum of the two dice.
    pub fn sum(&self) -> u8 {
        self.d1 + self.d2
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// The type of a tile on the board.
pub enum TileKind {
    Go,
    Property,
    Transit,
    Utility,
    Tax,
    Event,
    Fund,
    GoToJail,
    Visit,
    Parking,
}

impl TileKind {
    /// Whether tiles of this kind can be bought by a player.
    pub fn is_ownable(&self) -> bool {
        matches!(self, TileKind::Property | TileKind::Transit | TileKind::Utility)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// The economics of a tile that can be bought.
pub struct Property {
    /// The price of the property.
    pub cost: i64,
    /// The group (color set) that the property belongs to.
    pub group: &'static str,
    /// The rent amount for each improvement level of the property.
    /// `rents[0]` is the rent of an unimproved property
    /// and `rents[5]` is that of a fully improved one.
    pub rents: [i64; 6],
    /// The index of the player who owns this property.
    pub owner: Option<usize>,
    /// The improvement level of this property, from 0 to 5.
    pub level: u8,
    /// Whether the property is mortgaged. Mortgaged properties collect no rent.
    pub mortgaged: bool,
}

impl Property {
    /// Create a new unowned property.
    pub fn new(cost: i64, group: &'static str, rents: [i64; 6]) -> Property {
        Property {
            cost,
            group,
            rents,
            owner: None,
            level: 0,
            mortgaged: false,
        }
    }

    /// Whether `player` owns this property.
    pub fn is_owned_by(&self, player: usize) -> bool {
        self.owner == Some(player)
    }

    /// The value of this property towards its owner's net worth.
    pub fn value(&self) -> i64 {
        (self.cost as f64 * (1. + 0.5 * self.level as f64)).floor() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A tile on the game board.
pub struct Tile {
    /// The position of the tile around the board. 'Go' is at 0.
    pub index: u8,
    pub name: &'static str,
    pub kind: TileKind,
    /// The amount charged by a tax tile.
    pub tax: Option<i64>,
    /// The economics of the tile, if it can be bought.
    pub property: Option<Property>,
}

impl Tile {
    /// Create a tile that can't be bought.
    pub fn plain(index: u8, name: &'static str, kind: TileKind) -> Tile {
        Tile {
            index,
            name,
            kind,
            tax: None,
            property: None,
        }
    }

    /// Create a tax tile.
    pub fn tax(index: u8, name: &'static str, amount: i64) -> Tile {
        Tile {
            tax: Some(amount),
            ..Tile::plain(index, name, TileKind::Tax)
        }
    }

    /// Create a tile that can be bought.
    pub fn ownable(index: u8, name: &'static str, kind: TileKind, property: Property) -> Tile {
        Tile {
            property: Some(property),
            ..Tile::plain(index, name, kind)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A player playing the game.
pub struct Player {
    /// The index of the player in `GameState.players`.
    pub id: usize,
    pub name: String,
    /// Whether this seat is controlled by a person rather than the learner.
    pub is_human: bool,
    /// The amount of money the player has. This can go negative.
    pub cash: i64,
    /// The player's position around the board, from 0 to 39.
    pub position: u8,
    /// Whether the player is currently in jail.
    pub in_jail: bool,
    /// The number of turns the player has spent in jail.
    pub jail_turns: u8,
    /// Once set, this is never cleared.
    pub bankrupt: bool,
    /// Cash plus the estimated value of every owned property.
    pub net_worth: i64,
}

impl Player {
    /// Create a vector of `amount` players, the first `humans` of which are human.
    pub fn multiple_new(amount: usize, humans: usize) -> Vec<Player> {
        let mut players = Vec::with_capacity(amount);

        for id in 0..amount {
            let is_human = id < humans;

            players.push(Player {
                id,
                name: if is_human {
                    format!("Player {}", id + 1)
                } else {
                    format!("Bot {}", id + 1)
                },
                is_human,
                cash: STARTING_CASH,
                position: 0,
                in_jail: false,
                jail_turns: 0,
                bankrupt: false,
                net_worth: STARTING_CASH,
            })
        }

        players
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos_color = if self.in_jail { "\x1b[31m" } else { "\x1b[36m" };
        let status = if self.bankrupt { " \x1b[31mbankrupt\x1b[0m" } else { "" };

        write!(
            f,
            "[{}{:02}\x1b[0m] {:<10} \x1b[32m${}\x1b[0m (worth \x1b[33m${}\x1b[0m){}",
            pos_color, self.position, self.name, self.cash, self.net_worth, status
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The stage of the current player's turn. This gates which transition may run.
pub enum Phase {
    /// The current player has to roll the dice.
    AwaitRoll,
    /// The current player has moved and the tile they landed on has to be resolved.
    AwaitResolve,
    /// The current player may buy the tile they landed on.
    AwaitAction,
    /// Nothing is left to do but end the turn.
    AwaitEnd,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::AwaitRoll => "await_roll",
            Phase::AwaitResolve => "await_resolve",
            Phase::AwaitAction => "await_action",
            Phase::AwaitEnd => "await_end",
        };

        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Hints for a UI layer about what the current player can or must do.
pub struct Prompts {
    /// The current player landed on an unowned tile and may buy it.
    pub can_buy: bool,
    /// The amount the current player was charged on landing.
    pub must_pay: Option<i64>,
    /// The tile the current player landed on.
    pub landed_tile: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// The options a game is created from.
pub struct InitOptions {
    /// The number of players, from 2 to `MAX_PLAYERS`.
    pub players: usize,
    /// The number of human players. These take the first seats.
    pub humans: usize,
    /// The seed that drives every random decision in the game.
    pub seed: u32,
}

impl Default for InitOptions {
    fn default() -> Self {
        InitOptions {
            players: 2,
            humans: 1,
            seed: DEFAULT_SEED,
        }
    }
}

impl InitOptions {
    /// Return a copy with the player counts clamped to what the engine supports.
    pub fn clamped(&self) -> InitOptions {
        let players = self.players.max(2).min(MAX_PLAYERS);

        InitOptions {
            players,
            humans: self.humans.min(players),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A timestamped line of the game's history.
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(text: impl Into<String>) -> Self {
        LogEntry {
            at: Utc::now(),
            text: text.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b[90m{}\x1b[0m {}", self.at.format("%H:%M:%S"), self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The two shuffled decks of card indexes.
pub struct Decks {
    pub event: Vec<u8>,
    pub fund: Vec<u8>,
}
