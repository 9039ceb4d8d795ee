//! Effect chains.
//!
//! Activations, afflictions, and usable items carry an ordered chain of
//! effects. The directives that describe a chain are stateful: `effect`
//! opens a new link, and `param`, `dice`, and `expr` refine the most recent
//! one. A refining directive with no open link is a no-op, as is an `expr`
//! before any `dice`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_dice::{BaseValue, Dice, Expression};
use loreforge_foundation::{ErrorKind, Result};
use loreforge_parser::Values;

use crate::narrow;

/// The recognised effect names.
pub const EFFECT_NAMES: &[&str] = &[
    "HEAL_HP",
    "RESTORE_MANA",
    "CURE",
    "TIMED_INC",
    "TIMED_DEC",
    "NOURISH",
    "MAP_AREA",
    "DETECT_TRAPS",
    "DETECT_DOORS",
    "DETECT_GOLD",
    "DETECT_INVISIBLE",
    "IDENTIFY",
    "RECHARGE",
    "PROJECT_LOS",
    "EARTHQUAKE",
    "TELEPORT",
    "TELEPORT_TO",
    "LIGHT_AREA",
    "DARKEN_AREA",
    "BALL",
    "BREATH",
    "BOLT",
    "BEAM",
    "TOUCH",
    "ENCHANT",
    "RECALL",
    "BRAND_WEAPON",
    "REMOVE_AFFLICTION",
];

/// One link in an effect chain.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Effect {
    /// The effect name, one of [`EFFECT_NAMES`].
    pub kind: String,
    /// Optional subtype token, interpreted per effect.
    pub subtype: Option<String>,
    /// Radius, for area effects.
    pub radius: i32,
    /// Extra parameters, filled by the `param` directive.
    pub params: [i32; 2],
    /// Magnitude dice, filled by the `dice` directive.
    pub dice: Option<Dice>,
}

/// Handles an `effect` directive: opens a new link on the chain.
///
/// # Errors
/// Returns [`ErrorKind::UnrecognisedEffect`] for an unknown effect name.
pub fn begin(chain: &mut Vec<Effect>, values: &Values) -> Result<()> {
    let kind = values.get_sym("eff")?;
    if !EFFECT_NAMES.contains(&kind) {
        return Err(ErrorKind::UnrecognisedEffect(kind.to_string()).into());
    }

    let subtype = if values.has("type") {
        Some(values.get_sym("type")?.to_string())
    } else {
        None
    };
    let radius = if values.has("xtra") {
        narrow(values.get_int("xtra")?)
    } else {
        0
    };

    chain.push(Effect {
        kind: kind.to_string(),
        subtype,
        radius,
        params: [0; 2],
        dice: None,
    });
    Ok(())
}

/// Handles a `param` directive: sets the extra parameters of the open link.
///
/// # Errors
/// Field-access errors only; with no open link this is a no-op.
pub fn param(chain: &mut [Effect], values: &Values) -> Result<()> {
    let Some(effect) = chain.last_mut() else {
        return Ok(());
    };
    effect.params[0] = narrow(values.get_int("p2")?);
    if values.has("p3") {
        effect.params[1] = narrow(values.get_int("p3")?);
    }
    Ok(())
}

/// Handles a `dice` directive: attaches magnitude dice to the open link.
///
/// # Errors
/// Returns [`ErrorKind::InvalidDice`] for a malformed dice string; with no
/// open link this is a no-op.
pub fn dice(chain: &mut [Effect], values: &Values) -> Result<()> {
    let Some(effect) = chain.last_mut() else {
        return Ok(());
    };
    effect.dice = Some(Dice::parse(values.get_str("dice")?)?);
    Ok(())
}

/// Handles an `expr` directive: binds an expression to a dice variable of
/// the open link.
///
/// An `expr` with no open link, or before the link has dice, is a no-op.
///
/// # Errors
/// Returns [`ErrorKind::BadExpressionString`] for malformed operations and
/// [`ErrorKind::UnboundExpression`] for a variable the dice do not carry.
pub fn expr(chain: &mut [Effect], values: &Values) -> Result<()> {
    let Some(effect) = chain.last_mut() else {
        return Ok(());
    };
    let Some(dice) = effect.dice.as_mut() else {
        return Ok(());
    };

    let name = values.get_sym("name")?;
    let base = BaseValue::from_name(values.get_sym("base")?);
    let mut expression = Expression::new(base);
    expression.add_operations_str(values.get_str("expr")?)?;
    dice.bind_expression(name, &expression)
}
