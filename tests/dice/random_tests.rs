//! Plain numeric-range tests.

use loreforge_dice::Random;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn parse_from_str() {
    let r: Random = "3+1d4M2".parse().unwrap();
    assert_eq!((r.base, r.dice, r.sides, r.m_bonus), (3, 1, 4, 2));
}

#[test]
fn zero_and_fixed_roll_exactly() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(Random::ZERO.roll(&mut rng), 0);
    assert_eq!(Random::fixed(-5).roll(&mut rng), -5);
}

#[test]
fn variable_strings_are_not_plain_ranges() {
    assert!("$Bd6".parse::<Random>().is_err());
}

proptest! {
    #[test]
    fn rolls_stay_within_bounds(
        base in -20i32..20,
        dice in 1i32..8,
        sides in 1i32..12,
        m_bonus in 0i32..10,
        seed in any::<u64>(),
    ) {
        let r = Random { base, dice, sides, m_bonus };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let v = r.roll(&mut rng);
        prop_assert!(v >= base + dice);
        prop_assert!(v <= base + dice * sides + m_bonus);
    }

    #[test]
    fn parse_round_trips_literal_shapes(
        base in 0i32..100,
        dice in 1i32..10,
        sides in 1i32..20,
    ) {
        let source = format!("{base}+{dice}d{sides}");
        let r = Random::parse(&source).unwrap();
        prop_assert_eq!((r.base, r.dice, r.sides, r.m_bonus), (base, dice, sides, 0));
    }
}
