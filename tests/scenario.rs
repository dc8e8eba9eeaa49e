//! End-to-end turns through the public transition API.

use monopoly_sim::game::{Phase, STARTING_CASH};
use monopoly_sim::{GameState, InitOptions};

fn two_humans() -> GameState {
    GameState::new(InitOptions {
        players: 2,
        humans: 2,
        seed: 2024,
    })
}

/// Move the current player onto `tile` as if they had rolled there.
fn move_to(state: &GameState, tile: u8) -> GameState {
    let mut next = state.roll_and_advance();
    next.current_player_mut().position = tile;
    next.prompts.landed_tile = Some(tile);
    next
}

#[test]
fn rent_is_paid_to_the_first_buyer() {
    let state = two_humans();

    let landed = move_to(&state, 1).resolve_landing();
    assert_eq!(landed.phase, Phase::AwaitAction);
    assert!(landed.prompts.can_buy);

    let bought = landed.buy_current(&mut []);
    assert_eq!(bought.players[0].cash, STARTING_CASH - 60);
    assert_eq!(bought.tiles[1].property.as_ref().unwrap().owner, Some(0));
    assert_eq!(bought.phase, Phase::AwaitEnd);

    let handed_over = bought.end_turn();
    assert_eq!(handed_over.turn, 1);
    assert_eq!(handed_over.phase, Phase::AwaitRoll);

    let charged = move_to(&handed_over, 1).resolve_landing();
    assert_eq!(charged.players[1].cash, STARTING_CASH - 2);
    assert_eq!(charged.players[0].cash, STARTING_CASH - 60 + 2);
    assert_eq!(charged.prompts.must_pay, Some(2));
    assert_eq!(charged.phase, Phase::AwaitEnd);
}

#[test]
fn tax_prompts_the_amount_paid() {
    let state = move_to(&two_humans(), 4).resolve_landing();

    assert_eq!(state.players[0].cash, STARTING_CASH - 200);
    assert_eq!(state.prompts.must_pay, Some(200));
}

#[test]
fn early_end_turn_only_logs() {
    let resolving = move_to(&two_humans(), 1);
    let acting = resolving.resolve_landing();

    for state in [resolving, acting] {
        let refused = state.end_turn();

        assert_eq!(refused.turn, state.turn);
        assert_eq!(refused.log.len(), state.log.len() + 1);

        let mut trimmed = refused.clone();
        trimmed.log.pop();
        assert_eq!(trimmed, state);
    }
}

#[test]
fn snapshots_never_share_state() {
    let first = two_humans();
    let mut landed = move_to(&first, 1).resolve_landing();
    let bought = landed.buy_current(&mut []);

    // Transitions never touched their inputs
    assert_eq!(first.players[0].position, 0);
    assert_eq!(landed.tiles[1].property.as_ref().unwrap().owner, None);
    assert_eq!(landed.players[0].cash, STARTING_CASH);

    // Scribbling over an older snapshot leaves the newer one alone
    landed.players[0].cash = -9999;
    landed.tiles[1].property.as_mut().unwrap().owner = Some(1);
    landed.log.clear();

    assert_eq!(bought.players[0].cash, STARTING_CASH - 60);
    assert_eq!(bought.tiles[1].property.as_ref().unwrap().owner, Some(0));
    assert!(!bought.log.is_empty());
}

#[test]
fn same_seed_same_game() {
    let play = || {
        let mut state = two_humans();
        for _ in 0..40 {
            state = state.roll_and_advance().resolve_landing();
            if state.phase == Phase::AwaitAction {
                state = state.buy_current(&mut []);
            }
            state = state.end_turn();
        }
        state
    };

    let a = play();
    let b = play();

    assert_eq!(a.players, b.players);
    assert_eq!(a.tiles, b.tiles);
    assert_eq!(a.seed, b.seed);
}
