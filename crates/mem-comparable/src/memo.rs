//! Change-detecting memo cell.
//!
//! Holds the last thunk it evaluated together with the result. A new thunk is
//! only called when its captured state differs from the stored one.

use crate::closure::Fun;
use crate::compare::Comparator;

/// Cached result of a zero-argument [`Fun`].
#[derive(Debug)]
pub struct Memo<R> {
    entry: Option<(Fun<(), R>, R)>,
    comparator: Comparator,
    recomputations: usize,
}

impl<R> Memo<R> {
    pub fn new() -> Self {
        Self::with_comparator(Comparator::default())
    }

    pub fn with_comparator(comparator: Comparator) -> Self {
        Self {
            entry: None,
            comparator,
            recomputations: 0,
        }
    }

    /// Result of `thunk`, reusing the cached one when `thunk` is identical to
    /// the thunk that produced it.
    pub fn get(&mut self, thunk: &Fun<(), R>) -> &R {
        let entry = match self.entry.take() {
            Some((previous, value)) if !self.is_stale(&previous, thunk) => (previous, value),
            _ => {
                self.recomputations += 1;
                log::debug!("memo recomputing (#{})", self.recomputations);
                (thunk.clone(), thunk.call(()))
            }
        };
        &self.entry.insert(entry).1
    }

    /// The cached value, if any.
    pub fn value(&self) -> Option<&R> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    /// Drop the cached entry so the next [`get`](Self::get) recomputes.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times a thunk has been called so far.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    fn is_stale(&self, previous: &Fun<(), R>, thunk: &Fun<(), R>) -> bool {
        match self.comparator.compare(previous, thunk) {
            Ok(comparison) => comparison.is_updated(),
            Err(err) => {
                log::warn!("memo comparison failed, recomputing: {err}");
                true
            }
        }
    }
}

impl<R> Default for Memo<R> {
    fn default() -> Self {
        Self::new()
    }
}
