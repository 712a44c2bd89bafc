//! Ordered position sets and the list algorithms built on them.
//!
//! A list UI addresses rows by position. Deleting or dragging several rows at
//! once hands the data layer a *set* of positions, all resolved against the
//! sequence as it was before the operation. This module provides that set
//! (`Offsets`) and the two operations on a `Vec` that consume it:
//!
//! - [`remove_offsets`]: remove every addressed element at once
//! - [`move_offsets`]: lift the addressed elements out and reinsert them as
//!   one contiguous block before a destination resolved after removal
//!
//! Both validate every position before touching the vector, so on error the
//! vector is left exactly as it was.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors from offset-based list operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetError {
    /// A source offset does not address an element
    #[error("offset {offset} is out of range for a list of length {len}")]
    OutOfRange {
        /// The offending offset
        offset: usize,
        /// Length of the list it was resolved against
        len: usize,
    },

    /// The destination lies past the end of the list after removal
    #[error("destination {to} is out of range for {len} remaining elements")]
    DestinationOutOfRange {
        /// The offending destination
        to: usize,
        /// Length of the list after the moved elements were lifted out
        len: usize,
    },
}

/// An ordered set of positions into a sequence
///
/// Duplicates collapse and iteration is always ascending, so the order in
/// which positions were collected (e.g. the order rows were tapped) never
/// matters.
///
/// # Examples
///
/// ```
/// use todo_store_core::Offsets;
///
/// let offsets: Offsets = [2, 0, 2].into_iter().collect();
/// assert_eq!(offsets.len(), 2);
/// assert_eq!(offsets.iter().collect::<Vec<_>>(), vec![0, 2]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Offsets(BTreeSet<usize>);

impl Offsets {
    /// Create an empty offset set
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add an offset; returns false if it was already present
    pub fn insert(&mut self, offset: usize) -> bool {
        self.0.insert(offset)
    }

    /// Returns true if `offset` is in the set
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.0.contains(&offset)
    }

    /// Number of distinct offsets
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest offset in the set
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Iterate offsets in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Check that every offset addresses an element of a list of length `len`
    ///
    /// # Errors
    ///
    /// Returns [`OffsetError::OutOfRange`] naming the largest offending offset.
    pub fn check_bounds(&self, len: usize) -> Result<(), OffsetError> {
        match self.last() {
            Some(offset) if offset >= len => Err(OffsetError::OutOfRange { offset, len }),
            _ => Ok(()),
        }
    }
}

impl FromIterator<usize> for Offsets {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Offsets {
    fn from(offsets: [usize; N]) -> Self {
        offsets.into_iter().collect()
    }
}

impl From<usize> for Offsets {
    fn from(offset: usize) -> Self {
        Self(BTreeSet::from([offset]))
    }
}

impl<'a> IntoIterator for &'a Offsets {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl fmt::Display for Offsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, offset) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{offset}")?;
        }
        write!(f, "}}")
    }
}

/// Remove every element addressed by `offsets`, all at once
///
/// Offsets are resolved against the vector before any removal, so removing
/// `{0, 2}` from `[a, b, c]` leaves `[b]`. Removed elements are returned in
/// their original relative order.
///
/// # Errors
///
/// Returns [`OffsetError::OutOfRange`] if any offset is `>= items.len()`.
/// `items` is untouched in that case.
///
/// # Examples
///
/// ```
/// use todo_store_core::offsets::{remove_offsets, Offsets};
///
/// let mut items = vec!['a', 'b', 'c'];
/// let removed = remove_offsets(&mut items, &Offsets::from([0, 2])).unwrap();
/// assert_eq!(items, vec!['b']);
/// assert_eq!(removed, vec!['a', 'c']);
/// ```
pub fn remove_offsets<T>(items: &mut Vec<T>, offsets: &Offsets) -> Result<Vec<T>, OffsetError> {
    offsets.check_bounds(items.len())?;

    if offsets.is_empty() {
        return Ok(Vec::new());
    }

    let original = std::mem::take(items);
    items.reserve(original.len() - offsets.len());
    let mut removed = Vec::with_capacity(offsets.len());

    for (index, item) in original.into_iter().enumerate() {
        if offsets.contains(index) {
            removed.push(item);
        } else {
            items.push(item);
        }
    }

    Ok(removed)
}

/// Move the elements addressed by `from` to sit, as one block, before `to`
///
/// `from` is resolved against the vector before the move. `to` is resolved
/// against the vector *after* the addressed elements were lifted out, and may
/// equal that shorter length to append the block at the end. Moved elements
/// keep their relative order, and so do all the others.
///
/// # Errors
///
/// - [`OffsetError::OutOfRange`] if any source offset is `>= items.len()`
/// - [`OffsetError::DestinationOutOfRange`] if `to > items.len() - from.len()`
///
/// `items` is untouched on error.
///
/// # Examples
///
/// ```
/// use todo_store_core::offsets::{move_offsets, Offsets};
///
/// let mut items = vec!['a', 'b', 'c', 'd'];
/// move_offsets(&mut items, &Offsets::from([0, 2]), 1).unwrap();
/// assert_eq!(items, vec!['b', 'a', 'c', 'd']);
/// ```
pub fn move_offsets<T>(items: &mut Vec<T>, from: &Offsets, to: usize) -> Result<(), OffsetError> {
    from.check_bounds(items.len())?;

    let remaining = items.len() - from.len();
    if to > remaining {
        return Err(OffsetError::DestinationOutOfRange { to, len: remaining });
    }

    let block = remove_offsets(items, from)?;
    items.splice(to..to, block);

    Ok(())
}
