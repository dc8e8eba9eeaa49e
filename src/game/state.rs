use serde::Serialize;
use std::fmt;

use super::globals::*;
use super::prng::shuffle_deck;
use crate::error::Rejection;

#[derive(Clone, Debug, PartialEq, Serialize)]
/// A snapshot of a game.
///
/// Transitions never modify a snapshot: each returns a new one. A `GameState`
/// owns all of its data, so a clone never shares anything mutable with its source.
pub struct GameState {
    /// The index of the player (from `players`) whose turn it currently is.
    pub turn: usize,
    /// The last dice roll of the current turn.
    pub dice: Option<DiceRoll>,
    /// The board, carrying live ownership and improvements.
    pub tiles: Vec<Tile>,
    /// The players playing the game.
    pub players: Vec<Player>,
    /// The shuffled event and fund decks.
    pub decks: Decks,
    /// The stage of the current turn.
    pub phase: Phase,
    /// What the current player can or must do.
    pub prompts: Prompts,
    /// The seed that the next random decision is drawn from.
    pub seed: u32,
    /// The options this game was created from.
    pub options: InitOptions,
    /// Everything that happened so far. This is only ever appended to.
    pub log: Vec<LogEntry>,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut metadata = format!("Phase: \x1b[33m{}\x1b[0m", self.phase);

        if let Some(dice) = self.dice {
            metadata += &format!("\nDice: {} + {}", dice.d1, dice.d2);
        }

        if let Some(index) = self.prompts.landed_tile {
            metadata += &format!("\nLanded on: {}", self.tiles[index as usize].name);
        }

        let mut players_str = "".to_owned();
        for (i, player) in self.players.iter().enumerate() {
            players_str += &format!("{}", player);

            if self.turn == i {
                players_str += " < \x1b[36mto play\x1b[0m";
            }

            players_str += "\n";
        }

        write!(f, "{}\n{}", metadata, players_str)
    }
}

impl GameState {
    /*********        INITIALISATION INTERFACES        *********/

    /// Create a new game from `options`.
    pub fn new(options: InitOptions) -> GameState {
        let options = options.clamped();

        let mut state = GameState {
            turn: 0,
            dice: None,
            tiles: board(),
            players: Player::multiple_new(options.players, options.humans),
            decks: Decks {
                event: shuffle_deck(DECK_SIZE, options.seed ^ EVENT_DECK_SALT),
                fund: shuffle_deck(DECK_SIZE, options.seed ^ FUND_DECK_SALT),
            },
            phase: Phase::AwaitRoll,
            prompts: Prompts::default(),
            seed: options.seed,
            options,
            log: vec![],
        };

        state.push_log(format!(
            "New game with {} players ({} human)",
            options.players, options.humans
        ));

        state
    }

    /*********        ALIASES (FOR CONVENIENCE)        *********/

    /// The player whose turn it currently is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn]
    }

    /// A mutable reference to the player whose turn it currently is.
    pub fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.turn]
    }

    /// The tile the current player is on.
    pub fn current_tile(&self) -> &Tile {
        &self.tiles[self.current_player().position as usize]
    }

    /// The tile at `index`, if there is one.
    pub fn tile(&self, index: usize) -> Result<&Tile, Rejection> {
        self.tiles.get(index).ok_or(Rejection::NoSuchTile(index))
    }

    /// The positions of the tiles owned by `player`, in board order.
    pub fn owned_tiles(&self, player: usize) -> Vec<u8> {
        self.tiles
            .iter()
            .filter(|tile| {
                tile.property
                    .as_ref()
                    .map_or(false, |prop| prop.is_owned_by(player))
            })
            .map(|tile| tile.index)
            .collect()
    }

    /*********        GAME STATUS        *********/

    /// Whether at most one player is left standing.
    pub fn is_over(&self) -> bool {
        self.players.iter().filter(|p| !p.bankrupt).count() <= 1
    }

    /// The last player standing, once the game is over.
    pub fn winner(&self) -> Option<&Player> {
        if !self.is_over() {
            return None;
        }

        self.players.iter().find(|p| !p.bankrupt)
    }

    /// The index of the player whose turn comes after the current
    /// one's, skipping bankrupt players.
    pub fn next_turn(&self) -> usize {
        let count = self.players.len();

        (1..=count)
            .map(|offset| (self.turn + offset) % count)
            .find(|&i| !self.players[i].bankrupt)
            .unwrap_or(self.turn)
    }

    /*********        HELPER FUNCTIONS        *********/

    /// Append a line to the game's log.
    pub fn push_log(&mut self, text: impl Into<String>) {
        let entry = LogEntry::now(text);
        log::debug!("{}", entry.text);
        self.log.push(entry);
    }

    /// Return a copy of `self` that only records why a transition was refused.
    pub fn absorb(&self, rejection: Rejection) -> GameState {
        log::warn!("{}", rejection);

        let mut next = self.clone();
        next.push_log(rejection.to_string());
        next
    }

    /// Return an error if the current phase isn't `expected`.
    pub(crate) fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), Rejection> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Rejection::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(players: usize, humans: usize) -> InitOptions {
        InitOptions {
            players,
            humans,
            ..InitOptions::default()
        }
    }

    #[test]
    fn init_seats_humans_first() {
        let state = GameState::new(options(5, 2));

        assert_eq!(state.players.len(), 5);
        assert_eq!(state.players.iter().filter(|p| p.is_human).count(), 2);
        assert!(state.players[0].is_human && state.players[1].is_human);
        assert!(state.players.iter().all(|p| p.cash == STARTING_CASH));
        assert!(state.players.iter().enumerate().all(|(i, p)| p.id == i));
        assert_eq!(state.phase, Phase::AwaitRoll);
        assert_eq!(state.turn, 0);
    }

    #[test]
    fn init_clamps_player_counts() {
        let state = GameState::new(options(1, 3));
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.options.humans, 2);

        let state = GameState::new(options(50, 0));
        assert_eq!(state.players.len(), MAX_PLAYERS);
    }

    #[test]
    fn decks_are_shuffled_differently() {
        let state = GameState::new(options(2, 1));

        assert_eq!(state.decks.event.len(), DECK_SIZE as usize);
        assert_eq!(state.decks.fund.len(), DECK_SIZE as usize);
        assert_ne!(state.decks.event, state.decks.fund);
    }

    #[test]
    fn next_turn_skips_bankrupt_players() {
        let mut state = GameState::new(options(4, 1));
        state.players[1].bankrupt = true;
        state.players[2].bankrupt = true;

        assert_eq!(state.next_turn(), 3);

        state.turn = 3;
        assert_eq!(state.next_turn(), 0);
    }

    #[test]
    fn game_ends_with_one_player_standing() {
        let mut state = GameState::new(options(3, 1));
        assert!(!state.is_over());

        state.players[0].bankrupt = true;
        state.players[2].bankrupt = true;

        assert!(state.is_over());
        assert_eq!(state.winner().map(|p| p.id), Some(1));
    }

    #[test]
    fn absorb_only_appends_to_the_log() {
        let state = GameState::new(options(2, 1));
        let next = state.absorb(Rejection::NoSuchTile(99));

        assert_eq!(next.log.len(), state.log.len() + 1);
        assert_eq!(next.log.last().unwrap().text, "there is no tile 99");

        let mut trimmed = next.clone();
        trimmed.log.pop();
        assert_eq!(trimmed, state);
    }
}
