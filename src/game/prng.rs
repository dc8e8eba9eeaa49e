//! Seeded pseudo-random primitives.
//!
//! Every function here is pure: the same seed always gives the same output,
//! and there is no hidden generator state. Callers thread the seed through.

use super::globals::DiceRoll;

/// Advance a seed with a linear congruential step.
pub fn next_seed(seed: u32) -> u32 {
    seed.wrapping_mul(1664525).wrapping_add(1013904223)
}

/// Map a seed to a float in `[0, 1)` (mulberry32 mixing).
pub fn rand(seed: u32) -> f64 {
    let mut t = seed.wrapping_add(0x6D2B79F5);
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));

    (t ^ (t >> 14)) as f64 / 4294967296.
}

/// Advance `seed` in place and return a float in `[0, 1)` derived from the new seed.
pub fn draw(seed: &mut u32) -> f64 {
    *seed = next_seed(*seed);
    rand(*seed)
}

/// Return a uniformly distributed index below `n`, advancing `seed`.
pub fn draw_index(seed: &mut u32, n: usize) -> usize {
    ((draw(seed) * n as f64) as usize).min(n.saturating_sub(1))
}

/// Roll two dice. Return the roll and the seed advanced twice.
pub fn roll_dice(seed: u32) -> (DiceRoll, u32) {
    let mut seed = seed;
    let d1 = 1 + draw_index(&mut seed, 6) as u8;
    let d2 = 1 + draw_index(&mut seed, 6) as u8;

    (DiceRoll { d1, d2 }, seed)
}

/// Return the indexes `0..len` in an order shuffled by a Fisher-Yates pass.
pub fn shuffle_deck(len: u8, seed: u32) -> Vec<u8> {
    let mut deck: Vec<u8> = (0..len).collect();
    let mut seed = seed;

    for i in (1..deck.len()).rev() {
        let j = draw_index(&mut seed, i + 1);
        deck.swap(i, j);
    }

    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_seed_is_deterministic() {
        assert_eq!(next_seed(42), next_seed(42));
        assert_eq!(next_seed(0), 1013904223);
        assert_ne!(next_seed(1), next_seed(2));
    }

    #[test]
    fn rand_stays_in_unit_interval() {
        let mut seed = 7;
        for _ in 0..10_000 {
            let r = draw(&mut seed);
            assert!((0. ..1.).contains(&r));
        }
    }

    #[test]
    fn dice_advance_the_seed_twice() {
        let (_, seed) = roll_dice(99);
        assert_eq!(seed, next_seed(next_seed(99)));
    }

    #[test]
    fn dice_cover_every_face() {
        let mut seen = [false; 6];
        let mut seed = 1;

        for _ in 0..500 {
            let (roll, next) = roll_dice(seed);
            seen[roll.d1 as usize - 1] = true;
            seen[roll.d2 as usize - 1] = true;
            seed = next;
        }

        assert!(seen.iter().all(|&face| face));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut deck = shuffle_deck(14, 12345);
        assert_eq!(deck.len(), 14);

        deck.sort_unstable();
        assert_eq!(deck, (0..14).collect::<Vec<u8>>());
    }

    #[test]
    fn shuffle_depends_on_seed() {
        assert_eq!(shuffle_deck(14, 5), shuffle_deck(14, 5));
        assert_ne!(shuffle_deck(14, 5), shuffle_deck(14, 6));
    }
}
