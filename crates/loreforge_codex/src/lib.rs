//! The Loreforge codex: entity records, their builders, and the load
//! sequence that turns definition files into finalized lookup tables.
//!
//! Each entity kind lives in its own module with three parts: the record
//! type, the builder the directive parser drives, and the finalizer that
//! freezes the builder's list into a [`Table`]. The [`loader`] module runs
//! the kinds in dependency order and performs the cross-kind fix-ups
//! (affliction back-fill, the instant-relic dummy template).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod affliction;
pub mod bane;
pub mod category;
pub mod effect;
pub mod flags;
pub mod loader;
pub mod power;
pub mod relic;
pub mod scourge;
pub mod suffix;
pub mod table;
pub mod template;

pub use affliction::Affliction;
pub use bane::Bane;
pub use category::Category;
pub use effect::Effect;
pub use flags::{Capability, Element, ElementInfo, ElementInfoSet, FlagSet, KindFlag, Modifier};
pub use loader::{Codex, LoadConfig, Sources};
pub use power::Power;
pub use relic::Relic;
pub use scourge::Scourge;
pub use suffix::Suffix;
pub use table::Table;
pub use template::Template;

/// Appends directive text to an accumulating description/message field.
///
/// Repeated directives concatenate rather than overwrite, so records can
/// carry multi-line text.
pub(crate) fn append_text(slot: &mut Option<String>, text: &str) {
    match slot {
        Some(existing) => existing.push_str(text),
        None => *slot = Some(text.to_string()),
    }
}

/// Parses an allocation depth range of the form `"N to M"`.
pub(crate) fn parse_alloc_range(text: &str) -> loreforge_foundation::Result<(i32, i32)> {
    let invalid = || {
        loreforge_foundation::Error::new(loreforge_foundation::ErrorKind::InvalidAllocation(
            text.to_string(),
        ))
    };
    let mut tokens = text.split_whitespace();
    let min: i32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(invalid)?;
    if tokens.next() != Some("to") {
        return Err(invalid());
    }
    let max: i32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(invalid)?;
    if tokens.next().is_some() {
        return Err(invalid());
    }
    Ok((min, max))
}

/// Checks allocation bounds against the `0..=255` range suffixes and relics
/// require.
pub(crate) fn check_alloc_bounds(min: i32, max: i32, text: &str) -> loreforge_foundation::Result<()> {
    if (0..=255).contains(&min) && (0..=255).contains(&max) {
        Ok(())
    } else {
        Err(loreforge_foundation::ErrorKind::OutOfBounds(text.to_string()).into())
    }
}

/// Narrows a directive `int` field to the record range.
///
/// Values outside `i32` never survive a finalize anyway; clamping keeps the
/// handlers infallible on width.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn narrow(value: i64) -> i32 {
    i64::clamp(value, i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Narrows a directive `uint` field likewise.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn narrow_u(value: u64) -> u32 {
    u64::min(value, u64::from(u32::MAX)) as u32
}
