//! Dice-string tests.
//!
//! Tests for parsing, expression binding, and deterministic rolling.

use loreforge_dice::{BaseValue, Dice, EvalContext, Expression, NullContext};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A context in which every base-value function returns the same number.
struct Fixed(i32);

impl EvalContext for Fixed {
    fn base_value(&self, _base: BaseValue) -> i32 {
        self.0
    }
}

// =============================================================================
// Deterministic Rolling
// =============================================================================

#[test]
fn same_seed_same_rolls() {
    let dice = Dice::parse("2d6M4").unwrap();

    let mut a = ChaCha8Rng::seed_from_u64(42);
    let mut b = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..32 {
        assert_eq!(
            dice.roll(&mut a, &NullContext),
            dice.roll(&mut b, &NullContext)
        );
    }
}

#[test]
fn different_seeds_diverge() {
    let dice = Dice::parse("10d20").unwrap();

    let mut a = ChaCha8Rng::seed_from_u64(1);
    let mut b = ChaCha8Rng::seed_from_u64(2);

    let rolls_a: Vec<_> = (0..16).map(|_| dice.roll(&mut a, &NullContext)).collect();
    let rolls_b: Vec<_> = (0..16).map(|_| dice.roll(&mut b, &NullContext)).collect();
    assert_ne!(rolls_a, rolls_b);
}

// =============================================================================
// Bound Expressions
// =============================================================================

#[test]
fn bound_expression_supplies_the_dice_count() {
    let mut dice = Dice::parse("$Dd4").unwrap();
    let mut expr = Expression::new(Some(BaseValue::PlayerHp));
    expr.add_operations_str("/ 100").unwrap();
    dice.bind_expression("D", &expr).unwrap();

    // 250 hp -> 2 dice of d4: total in 2..=8.
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..64 {
        let v = dice.roll(&mut rng, &Fixed(250));
        assert!((2..=8).contains(&v), "roll {v} out of bounds");
    }
}

#[test]
fn unbound_variable_rolls_as_zero() {
    let dice = Dice::parse("3+$Bd6").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    // $B unbound resolves to zero dice, leaving the base.
    assert_eq!(dice.roll(&mut rng, &NullContext), 3);
}

#[test]
fn binding_copies_the_expression() {
    let mut dice = Dice::parse("$B").unwrap();
    let mut expr = Expression::new(None);
    expr.add_operations_str("+ 9").unwrap();
    dice.bind_expression("B", &expr).unwrap();

    // Mutating the original after binding must not affect the dice value.
    expr.add_operations_str("* 100").unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    assert_eq!(dice.roll(&mut rng, &NullContext), 9);
}

#[test]
fn shared_variable_names_share_one_slot() {
    let mut dice = Dice::parse("$Nd$N").unwrap();
    assert_eq!(dice.variable_names().count(), 1);

    let mut expr = Expression::new(None);
    expr.add_operations_str("+ 1").unwrap();
    dice.bind_expression("N", &expr).unwrap();

    // One die with one side always rolls 1.
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    assert_eq!(dice.roll(&mut rng, &NullContext), 1);
}

// =============================================================================
// Conversion to Plain Ranges
// =============================================================================

#[test]
fn literal_dice_convert_to_random() {
    let dice = Dice::parse("1+2d3M4").unwrap();
    let random = dice.to_random().unwrap();
    assert_eq!(
        (random.base, random.dice, random.sides, random.m_bonus),
        (1, 2, 3, 4)
    );
}

#[test]
fn variable_dice_do_not_convert() {
    assert!(Dice::parse("$Bd6").unwrap().to_random().is_none());
}
