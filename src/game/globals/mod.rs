mod details;
pub use details::*;

use lazy_static::lazy_static;

/// The number of tiles around the board.
pub const BOARD_SIZE: u8 = 40;

/// The most players a single game can seat.
pub const MAX_PLAYERS: usize = 8;

/// The seed used when the init options don't specify one.
pub const DEFAULT_SEED: u32 = 0x5EED_1234;

/// The amount of money every player starts with.
pub const STARTING_CASH: i64 = 1500;

/// The amount a player receives for passing 'Go'.
pub const GO_BONUS: i64 = 200;

/// The position of the jail tile.
pub const JAIL_POSITION: u8 = 10;

/// The amount a player pays to leave jail.
pub const BAIL: i64 = 50;

/// The turns a player has to sit in jail (counting the turn of
/// the roll attempt) before they're allowed to pay their way out.
pub const JAIL_TURNS_BEFORE_BAIL: u8 = 2;

/// The amount granted by a fund tile.
pub const FUND_BONUS: i64 = 100;

/// The possible gains and losses of landing on an event tile.
pub const EVENT_OUTCOMES: [i64; 6] = [-150, -100, -50, 0, 50, 100];

/// Players whose cash drops below this are bankrupt.
pub const BANKRUPTCY_THRESHOLD: i64 = -500;

/// The number of cards in each of the event and fund decks.
pub const DECK_SIZE: u8 = 14;

/// Mixed into the game seed so the two decks are shuffled differently.
pub const EVENT_DECK_SALT: u32 = 0x0000_E4E4;
pub const FUND_DECK_SALT: u32 = 0x0000_F00D;

/// AI players only consider improving their properties above this amount of cash.
pub const AI_BUILD_RESERVE: i64 = 250;

/// The most AI turns `run_until_human` plays in one call.
pub const RUN_GUARD: usize = 20;

/// Fraction of the cost credited when mortgaging a property.
pub const MORTGAGE_RATE: f64 = 0.5;

/// Fraction of the cost charged when lifting a mortgage.
pub const UNMORTGAGE_RATE: f64 = 0.55;

/// A player needs at least this fraction of a property's cost in cash to improve it.
pub const BUILD_CASH_RATIO: f64 = 0.6;

/// The highest improvement level of a property.
pub const MAX_LEVEL: u8 = 5;

/// The owner of this many properties of a group collects the monopoly bonus.
pub const MONOPOLY_HOLDINGS: usize = 3;

/// Return a fresh copy of the board, with no property owned.
pub fn board() -> Vec<Tile> {
    BOARD.to_vec()
}

/// Return the number of properties in `group`.
pub fn group_size(group: &str) -> usize {
    BOARD
        .iter()
        .filter_map(|tile| tile.property.as_ref())
        .filter(|prop| prop.group == group)
        .count()
}

lazy_static! {
    /// Every tile on the game board, in order of position.
    pub static ref BOARD: [Tile; BOARD_SIZE as usize] = {
        let street = |index, name, group, cost, rents| {
            Tile::ownable(index, name, TileKind::Property, Property::new(cost, group, rents))
        };
        let transit = |index, name| {
            Tile::ownable(
                index,
                name,
                TileKind::Transit,
                Property::new(200, "transit", [25, 50, 100, 200, 300, 400]),
            )
        };
        let utility = |index, name| {
            Tile::ownable(
                index,
                name,
                TileKind::Utility,
                Property::new(150, "utility", [10, 40, 80, 120, 160, 200]),
            )
        };

        [
            Tile::plain(0, "Go", TileKind::Go),
            street(1, "Old Kent Road", "brown", 60, [2, 10, 30, 90, 160, 250]),
            Tile::plain(2, "Community Fund", TileKind::Fund),
            street(3, "Whitechapel Road", "brown", 60, [4, 20, 60, 180, 320, 450]),
            Tile::tax(4, "Income Tax", 200),
            transit(5, "King's Cross Station"),
            street(6, "The Angel Islington", "light_blue", 100, [6, 30, 90, 270, 400, 550]),
            Tile::plain(7, "Event", TileKind::Event),
            street(8, "Euston Road", "light_blue", 100, [6, 30, 90, 270, 400, 550]),
            street(9, "Pentonville Road", "light_blue", 120, [8, 40, 100, 300, 450, 600]),
            Tile::plain(10, "Jail", TileKind::Visit),
            street(11, "Pall Mall", "pink", 140, [10, 50, 150, 450, 625, 750]),
            utility(12, "Electric Company"),
            street(13, "Whitehall", "pink", 140, [10, 50, 150, 450, 625, 750]),
            street(14, "Northumberland Avenue", "pink", 160, [12, 60, 180, 500, 700, 900]),
            transit(15, "Marylebone Station"),
            street(16, "Bow Street", "orange", 180, [14, 70, 200, 550, 750, 950]),
            Tile::plain(17, "Community Fund", TileKind::Fund),
            street(18, "Marlborough Street", "orange", 180, [14, 70, 200, 550, 750, 950]),
            street(19, "Vine Street", "orange", 200, [16, 80, 220, 600, 800, 1000]),
            Tile::plain(20, "Free Parking", TileKind::Parking),
            street(21, "Strand", "red", 220, [18, 90, 250, 700, 875, 1050]),
            Tile::plain(22, "Event", TileKind::Event),
            street(23, "Fleet Street", "red", 220, [18, 90, 250, 700, 875, 1050]),
            street(24, "Trafalgar Square", "red", 240, [20, 100, 300, 750, 925, 1100]),
            transit(25, "Fenchurch Street Station"),
            street(26, "Leicester Square", "yellow", 260, [22, 110, 330, 800, 975, 1150]),
            street(27, "Coventry Street", "yellow", 260, [22, 110, 330, 800, 975, 1150]),
            utility(28, "Water Works"),
            street(29, "Piccadilly", "yellow", 280, [24, 120, 360, 850, 1025, 1200]),
            Tile::plain(30, "Go To Jail", TileKind::GoToJail),
            street(31, "Regent Street", "green", 300, [26, 130, 390, 900, 1100, 1275]),
            street(32, "Oxford Street", "green", 300, [26, 130, 390, 900, 1100, 1275]),
            Tile::plain(33, "Community Fund", TileKind::Fund),
            street(34, "Bond Street", "green", 320, [28, 150, 450, 1000, 1200, 1400]),
            transit(35, "Liverpool Street Station"),
            Tile::plain(36, "Event", TileKind::Event),
            street(37, "Park Lane", "dark_blue", 350, [35, 175, 500, 1100, 1300, 1500]),
            Tile::tax(38, "Super Tax", 100),
            street(39, "Mayfair", "dark_blue", 400, [50, 200, 600, 1400, 1700, 2000]),
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_is_indexed_by_position() {
        for (i, tile) in BOARD.iter().enumerate() {
            assert_eq!(tile.index as usize, i);
        }
    }

    #[test]
    fn only_ownable_tiles_carry_a_property() {
        for tile in BOARD.iter() {
            assert_eq!(tile.kind.is_ownable(), tile.property.is_some());
            assert_eq!(tile.kind == TileKind::Tax, tile.tax.is_some());
        }
    }

    #[test]
    fn board_copies_are_independent() {
        let mut copy = board();
        copy[1].property.as_mut().unwrap().owner = Some(0);

        assert_eq!(BOARD[1].property.as_ref().unwrap().owner, None);
    }

    #[test]
    fn group_sizes() {
        assert_eq!(group_size("brown"), 2);
        assert_eq!(group_size("light_blue"), 3);
        assert_eq!(group_size("transit"), 4);
        assert_eq!(group_size("utility"), 2);
        assert_eq!(group_size("nowhere"), 0);
    }
}
