//! Property-based tests for the random primitives and the rent rules.

use proptest::prelude::*;

use monopoly_sim::game::prng::{next_seed, rand, roll_dice, shuffle_deck};
use monopoly_sim::game::rules::{compute_rent, wrap};
use monopoly_sim::game::{BOARD, MAX_LEVEL};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Seeds advance purely.
    #[test]
    fn prop_next_seed_is_pure(seed in any::<u32>()) {
        prop_assert_eq!(next_seed(seed), next_seed(seed));
        prop_assert_eq!(rand(seed).to_bits(), rand(seed).to_bits());
    }

    /// Floats land in the unit interval.
    #[test]
    fn prop_rand_in_unit_interval(seed in any::<u32>()) {
        let r = rand(seed);
        prop_assert!((0.0..1.0).contains(&r));
    }

    /// Dice always show a face.
    #[test]
    fn prop_dice_in_range(seed in any::<u32>()) {
        let (roll, next) = roll_dice(seed);

        prop_assert!((1..=6).contains(&roll.d1));
        prop_assert!((1..=6).contains(&roll.d2));
        prop_assert_eq!(next, next_seed(next_seed(seed)));
        prop_assert_eq!(roll_dice(seed), (roll, next));
    }

    /// Any position wraps onto the board.
    #[test]
    fn prop_wrap_in_range(position in any::<i64>()) {
        let wrapped = wrap(position);

        prop_assert!(wrapped < 40);
        prop_assert_eq!(wrapped as i64, position.rem_euclid(40));
    }

    /// Shuffles are permutations.
    #[test]
    fn prop_shuffle_is_permutation(seed in any::<u32>(), len in 1u8..60) {
        let mut deck = shuffle_deck(len, seed);
        deck.sort_unstable();

        prop_assert_eq!(deck, (0..len).collect::<Vec<u8>>());
    }

    /// Mortgaged tiles collect nothing, whatever the holdings or level.
    #[test]
    fn prop_mortgaged_rent_is_zero(
        tile in 0usize..40,
        holdings in 0usize..5,
        level in 0u8..=MAX_LEVEL
    ) {
        let mut tile = BOARD[tile].clone();

        if let Some(prop) = tile.property.as_mut() {
            prop.level = level;
            prop.mortgaged = true;
        }

        prop_assert_eq!(compute_rent(&tile, holdings), 0);
    }

    /// Rent never falls below the table entry of the tile's level.
    #[test]
    fn prop_rent_at_least_table(
        tile in 0usize..40,
        holdings in 0usize..5,
        level in 0u8..=MAX_LEVEL
    ) {
        let mut tile = BOARD[tile].clone();
        let base = match tile.property.as_mut() {
            Some(prop) => {
                prop.level = level;
                prop.rents[level as usize]
            }
            None => 0,
        };
        let rent = compute_rent(&tile, holdings);

        prop_assert!(rent >= base);
        prop_assert!(rent <= base * 3 / 2);
    }
}

#[test]
fn first_street_rent_table() {
    let tile = BOARD[1].clone();

    assert_eq!(tile.property.as_ref().unwrap().rents, [2, 10, 30, 90, 160, 250]);
    assert_eq!(compute_rent(&tile, 3), 3);
    assert_eq!(compute_rent(&tile, 2), 2);
}
