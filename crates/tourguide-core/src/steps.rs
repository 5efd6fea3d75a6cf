#![forbid(unsafe_code)]

//! Key-ordered step collection.
//!
//! Tips register in whatever order the host discovers them, sometimes with an
//! author-assigned index that skips or reorders, sometimes with none at all.
//! [`OrderedSteps`] keeps them addressable by key and iterable in ascending
//! key order regardless of insertion order.
//!
//! # Invariants
//!
//! 1. Keys are unique.
//! 2. Iteration is in ascending numeric key order.
//! 3. Overwriting an existing key replaces the value only; order is unaffected.
//!
//! # Example
//!
//! ```
//! use tourguide_core::steps::OrderedSteps;
//!
//! let mut steps = OrderedSteps::new();
//! steps.set(5, "five");
//! steps.set(1, "one");
//! assert_eq!(steps.push("six"), 6);
//! let keys: Vec<i64> = steps.keys().collect();
//! assert_eq!(keys, vec![1, 5, 6]);
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::rc::Rc;

use crate::error::{Result, TourError};

/// Reverse lookups match on identity, never on value equality.
pub trait StepIdentity {
    /// Whether `self` and `other` are handles to the same registered step.
    fn same_step(&self, other: &Self) -> bool;
}

impl<T: ?Sized> StepIdentity for Rc<T> {
    fn same_step(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// Convert a host-supplied number into a step key.
///
/// NaN, infinities, fractional values, and values outside the `i64` range
/// have no key.
#[must_use]
pub fn step_key(value: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !value.is_finite() || value.fract() != 0.0 || value < -LIMIT || value >= LIMIT {
        return None;
    }
    Some(value as i64)
}

/// Sparse mapping from integer key to step, iterated in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSteps<T> {
    entries: BTreeMap<i64, T>,
}

impl<T> Default for OrderedSteps<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedSteps<T> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert `step` at `key`, or replace the value already stored there.
    pub fn set(&mut self, key: i64, step: T) {
        self.entries.insert(key, step);
    }

    /// Host-facing [`set`](Self::set) taking an untyped number.
    ///
    /// Non-integer keys are ignored without error; returns whether the step
    /// was stored.
    pub fn set_number(&mut self, key: f64, step: T) -> bool {
        match step_key(key) {
            Some(key) => {
                self.set(key, step);
                true
            }
            None => false,
        }
    }

    /// Append `step` after the highest key (or at `0` when empty) and return
    /// the key it was stored under.
    pub fn push(&mut self, step: T) -> i64 {
        let key = self
            .last_key()
            .map_or(0, |last| last.saturating_add(1));
        self.set(key, step);
        key
    }

    /// Step stored at `key`.
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&T> {
        self.entries.get(&key)
    }

    /// Whether `key` is registered.
    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.entries.contains_key(&key)
    }

    /// Remove `key` and return its step.
    ///
    /// # Errors
    ///
    /// [`TourError::KeyNotFound`] when `key` is not registered.
    pub fn remove(&mut self, key: i64) -> Result<T> {
        self.entries
            .remove(&key)
            .ok_or(TourError::KeyNotFound { key })
    }

    /// Visit every entry once, in ascending key order.
    pub fn for_each(&self, mut visitor: impl FnMut(&T, i64)) {
        for (key, step) in &self.entries {
            visitor(step, *key);
        }
    }

    /// Lazy ascending traversal of `(key, step)` pairs.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Registered keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = i64> + '_ {
        self.entries.keys().copied()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step with the lowest key.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.entries.values().next()
    }

    #[must_use]
    pub fn first_key(&self) -> Option<i64> {
        self.entries.keys().next().copied()
    }

    #[must_use]
    pub fn last_key(&self) -> Option<i64> {
        self.entries.keys().next_back().copied()
    }
}

impl<T: StepIdentity> OrderedSteps<T> {
    /// Key of the entry that is the same step as `step`. O(n).
    #[must_use]
    pub fn index_of(&self, step: &T) -> Option<i64> {
        self.entries
            .iter()
            .find(|(_, stored)| stored.same_step(step))
            .map(|(key, _)| *key)
    }
}

/// Iterator returned by [`OrderedSteps::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: btree_map::Iter<'a, i64, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (i64, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, step)| (*key, step))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, step)| (*key, step))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a OrderedSteps<T> {
    type Item = (i64, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
