//! The lockstep driver.
//!
//! Both values are walked with their own arena. Each round first checks
//! whether the walks have ended, then compares the leaves byte for byte and
//! advances both sides. The first mismatch ends the walk. Two values are
//! identical when both walks reach the top of the graph together.

use crate::arena::{INITIAL_CAPACITY, StackArena};
use crate::capability::Transparent;
use crate::error::CompareError;
use crate::step::Leaf;

/// Tuning knobs for a [`Comparator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompareConfig {
    /// Bytes each arena starts with.
    pub initial_arena_capacity: usize,
    /// Abort with [`CompareError::StepLimitExceeded`] after this many steps.
    pub step_limit: Option<usize>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            initial_arena_capacity: INITIAL_CAPACITY,
            step_limit: None,
        }
    }
}

impl CompareConfig {
    pub fn with_initial_arena_capacity(mut self, bytes: usize) -> Self {
        self.initial_arena_capacity = bytes;
        self
    }

    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }
}

/// Outcome of a finished comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub identical: bool,
    /// Steps consumed per side, including the one that decided the result.
    pub steps: usize,
}

impl Comparison {
    pub fn is_updated(&self) -> bool {
        !self.identical
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Walk `a` and `b` in lockstep.
    ///
    /// Sharing the type parameter is the shape check: values of different
    /// static shapes cannot be passed together.
    pub fn compare<T: Transparent>(&self, a: &T, b: &T) -> Result<Comparison, CompareError> {
        let mut arena_a = StackArena::with_capacity(self.config.initial_arena_capacity);
        let mut arena_b = StackArena::with_capacity(self.config.initial_arena_capacity);
        let mut step_a = a.mem_compare_step(None, &mut arena_a);
        let mut step_b = b.mem_compare_step(None, &mut arena_b);
        let mut steps = 0;

        loop {
            steps += 1;
            if let Some(limit) = self.config.step_limit.filter(|&limit| steps > limit) {
                return Err(CompareError::StepLimitExceeded { limit });
            }

            let (next_a, next_b) = match (step_a.next(), step_b.next()) {
                (None, None) => {
                    if step_a.leaf().is_some() || step_b.leaf().is_some() {
                        return Err(CompareError::LeafOnFinalStep { step: steps });
                    }
                    debug_assert!(arena_a.is_empty(), "left arena not drained: {arena_a:?}");
                    debug_assert!(arena_b.is_empty(), "right arena not drained: {arena_b:?}");
                    return Ok(Comparison {
                        identical: true,
                        steps,
                    });
                }
                (Some(next_a), Some(next_b)) => (next_a, next_b),
                _ => return Err(CompareError::TraversalDesync { step: steps }),
            };

            match (step_a.leaf(), step_b.leaf()) {
                (Some(leaf_a), Some(leaf_b)) => {
                    if !leaves_match(leaf_a, leaf_b) {
                        log::trace!(
                            "mismatch at step {steps}: {} vs {} bytes",
                            leaf_a.size(),
                            leaf_b.size()
                        );
                        return Ok(Comparison {
                            identical: false,
                            steps,
                        });
                    }
                }
                (None, None) => {}
                _ => return Err(CompareError::TraversalDesync { step: steps }),
            }

            // SAFETY: `a` and `b` stay borrowed for the whole walk and each
            // resume point is fed the arena of its own side.
            step_a = unsafe { next_a.resume(&mut arena_a) };
            step_b = unsafe { next_b.resume(&mut arena_b) };
        }
    }
}

fn leaves_match(a: Leaf, b: Leaf) -> bool {
    // SAFETY: leaves point into the borrowed values or into arena slots that
    // are not touched until the next resume.
    a.size() == b.size() && unsafe { a.bytes() == b.bytes() }
}

/// True when `a` and `b` are byte-for-byte identical in every compared leaf.
///
/// A broken traversal is logged and reported as "different".
pub fn is_identical<T: Transparent>(a: &T, b: &T) -> bool {
    match Comparator::default().compare(a, b) {
        Ok(comparison) => comparison.identical,
        Err(err) => {
            log::error!("comparison aborted, treating values as different: {err}");
            false
        }
    }
}

/// Negation of [`is_identical`].
pub fn is_updated<T: Transparent>(a: &T, b: &T) -> bool {
    !is_identical(a, b)
}
