//! Finalized record tables.
//!
//! A builder accumulates records in file order; finalizing freezes them into
//! a [`Table`] indexed by record identity. Two numbering schemes exist:
//!
//! * **Sequential** tables assign identities `1..=len` themselves, walking
//!   the build list back to front so the *last* record in the file gets
//!   identity 1. Slot 0 stays empty.
//! * **Identity** tables honor the identity each record declared in its
//!   header; the table is sized to the largest identity and unclaimed slots
//!   stay empty. Identity 0 is reserved and records claiming it are dropped.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A finalized, identity-indexed record table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table<T> {
    slots: Vec<Option<T>>,
    count: usize,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            count: 0,
        }
    }
}

impl<T> Table<T> {
    /// Freezes a build list, numbering records `1..=len` in reverse file
    /// order.
    ///
    /// `identify` stamps the assigned identity back onto each record so the
    /// record itself knows its slot.
    #[must_use]
    pub fn sequential(records: Vec<T>, mut identify: impl FnMut(&mut T, u32)) -> Self {
        let len = records.len();
        let mut slots: Vec<Option<T>> = Vec::with_capacity(len + 1);
        slots.resize_with(len + 1, || None);

        let mut identity = 0u32;
        for mut record in records.into_iter().rev() {
            identity += 1;
            identify(&mut record, identity);
            slots[identity as usize] = Some(record);
        }

        Self { slots, count: len }
    }

    /// Freezes a build list, honoring the identity each record declares.
    ///
    /// Records declaring identity 0 are dropped; a later record with the
    /// same identity replaces an earlier one.
    #[must_use]
    pub fn by_identity(records: Vec<T>, identity_of: impl Fn(&T) -> u32) -> Self {
        let max = records.iter().map(&identity_of).max().unwrap_or(0) as usize;
        let mut slots: Vec<Option<T>> = Vec::with_capacity(max + 1);
        slots.resize_with(max + 1, || None);

        let mut count = 0;
        for record in records {
            let identity = identity_of(&record) as usize;
            if identity == 0 {
                continue;
            }
            if slots[identity].is_none() {
                count += 1;
            }
            slots[identity] = Some(record);
        }

        Self { slots, count }
    }

    /// The number of records present.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The size of the identity space, including empty slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Looks up a record by identity.
    #[must_use]
    pub fn get(&self, identity: u32) -> Option<&T> {
        self.slots.get(identity as usize)?.as_ref()
    }

    /// Looks up a record mutably by identity.
    #[must_use]
    pub fn get_mut(&mut self, identity: u32) -> Option<&mut T> {
        self.slots.get_mut(identity as usize)?.as_mut()
    }

    /// Iterates the records present, in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Iterates the records present mutably, in identity order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Iterates `(identity, record)` pairs, in identity order.
    pub fn iter_with_identity(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| Some((u32::try_from(i).ok()?, slot.as_ref()?)))
    }

    /// Appends a record at the next identity, growing the table.
    ///
    /// Used for mid-parse synthesis; cross-record references must be stable
    /// indices, never pointers, so growth cannot invalidate them.
    pub fn push(&mut self, record: T) -> u32 {
        if self.slots.is_empty() {
            // Identity 0 is the reserved sentinel.
            self.slots.push(None);
        }
        let identity = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Some(record));
        self.count += 1;
        identity
    }

    /// Finds the identity of the first record matching the predicate.
    #[must_use]
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<u32> {
        self.iter_with_identity()
            .find(|(_, record)| predicate(record))
            .map(|(identity, _)| identity)
    }
}
