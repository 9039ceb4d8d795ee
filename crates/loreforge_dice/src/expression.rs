//! Named expressions: a base-value function plus arithmetic operations.
//!
//! Effect directives like `expr B PLAYER_HP / 100` build one of these and
//! bind it into the dice value of the effect node. The base value is a named
//! function evaluated against game state at roll time; the operations are a
//! parsed `<op> <int>` sequence applied left to right.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_foundation::{ErrorKind, Result};

/// A named base-value function.
///
/// These stand in for the simulation-state accessors the rest of the system
/// supplies; load-time code only resolves the name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)] // variant names mirror the data-file tokens
pub enum BaseValue {
    SpellPower,
    PlayerLevel,
    PlayerHp,
    DungeonLevel,
    MaxSight,
    WeaponDamage,
    MonsterPercentHpGone,
}

impl BaseValue {
    const TABLE: [(Self, &'static str); 7] = [
        (Self::SpellPower, "SPELL_POWER"),
        (Self::PlayerLevel, "PLAYER_LEVEL"),
        (Self::PlayerHp, "PLAYER_HP"),
        (Self::DungeonLevel, "DUNGEON_LEVEL"),
        (Self::MaxSight, "MAX_SIGHT"),
        (Self::WeaponDamage, "WEAPON_DAMAGE"),
        (Self::MonsterPercentHpGone, "MONSTER_PERCENT_HP_GONE"),
    ];

    /// Looks a base-value function up by its data-file name.
    ///
    /// Unknown names resolve to `None` rather than erroring; an expression
    /// with no base function simply contributes zero before operations.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(b, _)| *b)
    }

    /// Returns the data-file name of this function.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::TABLE[self as usize].1
    }
}

/// Supplies base values at evaluation time.
pub trait EvalContext {
    /// Returns the current value of the given base-value function.
    fn base_value(&self, base: BaseValue) -> i32;
}

/// An [`EvalContext`] in which every base value is zero.
///
/// Useful when rolling dice whose expressions are irrelevant, and in tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullContext;

impl EvalContext for NullContext {
    fn base_value(&self, _base: BaseValue) -> i32 {
        0
    }
}

/// One arithmetic operation applied to the running value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Operation {
    Add(i32),
    Subtract(i32),
    Multiply(i32),
    Divide(i32),
}

/// A named expression: optional base-value function plus operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    base: Option<BaseValue>,
    operations: Vec<Operation>,
}

impl Expression {
    /// Creates an expression with the given base-value function.
    #[must_use]
    pub fn new(base: Option<BaseValue>) -> Self {
        Self {
            base,
            operations: Vec::new(),
        }
    }

    /// Parses an operations string such as `"/ 100 + 1"` and appends the
    /// operations to this expression.
    ///
    /// # Errors
    /// Returns [`ErrorKind::BadExpressionString`] when the string is not an
    /// alternating sequence of operator and integer tokens.
    pub fn add_operations_str(&mut self, source: &str) -> Result<()> {
        let bad = || ErrorKind::BadExpressionString(source.to_string());

        let mut tokens = source.split_whitespace();
        let mut parsed = Vec::new();
        while let Some(op) = tokens.next() {
            let operand: i32 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(bad)?;
            let operation = match op {
                "+" => Operation::Add(operand),
                "-" => Operation::Subtract(operand),
                "*" => Operation::Multiply(operand),
                "/" => Operation::Divide(operand),
                _ => return Err(bad().into()),
            };
            parsed.push(operation);
        }

        self.operations.extend(parsed);
        Ok(())
    }

    /// Evaluates the expression against the given context.
    ///
    /// A missing base function contributes zero; division by zero yields
    /// zero rather than aborting a roll.
    #[must_use]
    pub fn evaluate(&self, ctx: &dyn EvalContext) -> i32 {
        let mut value = self.base.map_or(0, |b| ctx.base_value(b));
        for op in &self.operations {
            value = match *op {
                Operation::Add(n) => value.wrapping_add(n),
                Operation::Subtract(n) => value.wrapping_sub(n),
                Operation::Multiply(n) => value.wrapping_mul(n),
                Operation::Divide(0) => 0,
                Operation::Divide(n) => value.wrapping_div(n),
            };
        }
        value
    }
}
