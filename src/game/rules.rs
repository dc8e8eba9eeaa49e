//! Pure economic rules: rent, jail and net worth.

use super::globals::*;
use super::state::GameState;

/// Wrap any position (including negative ones) onto the board.
pub fn wrap(position: i64) -> u8 {
    position.rem_euclid(BOARD_SIZE as i64) as u8
}

/// Return the number of properties in `group` owned by `owner`.
pub fn group_holdings(tiles: &[Tile], owner: usize, group: &str) -> usize {
    tiles
        .iter()
        .filter_map(|tile| tile.property.as_ref())
        .filter(|prop| prop.group == group && prop.is_owned_by(owner))
        .count()
}

/// Return the rent charged for landing on `tile`, given how many
/// properties of the tile's group its owner holds.
pub fn compute_rent(tile: &Tile, holdings: usize) -> i64 {
    let prop = match &tile.property {
        Some(prop) => prop,
        None => return 0,
    };

    if prop.mortgaged {
        return 0;
    }

    let base = prop.rents[prop.level.min(MAX_LEVEL) as usize];

    // Monopoly bonus only applies to unimproved properties
    if holdings >= MONOPOLY_HOLDINGS && prop.level == 0 {
        (base as f64 * 1.5).floor() as i64
    } else {
        base
    }
}

/// Send a player to jail.
pub fn jail_player(player: &mut Player) {
    player.position = JAIL_POSITION;
    player.in_jail = true;
    player.jail_turns = 0;
}

/// Release a player from jail. They stay where they are.
pub fn leave_jail(player: &mut Player) {
    player.in_jail = false;
    player.jail_turns = 0;
}

/// Recompute every player's net worth and flag the players that went bankrupt.
pub fn adjust_net_worth(state: &mut GameState) {
    for player in &mut state.players {
        let holdings: i64 = state
            .tiles
            .iter()
            .filter_map(|tile| tile.property.as_ref())
            .filter(|prop| prop.is_owned_by(player.id))
            .map(|prop| prop.value())
            .sum();

        player.net_worth = player.cash + holdings;

        if player.cash < BANKRUPTCY_THRESHOLD {
            player.bankrupt = true;
        }
    }
}
