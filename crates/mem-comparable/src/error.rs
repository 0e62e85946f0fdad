//! Errors reported by [`Comparator::compare`](crate::Comparator::compare).

use std::fmt;

/// Why a comparison stopped without an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareError {
    /// The two walks disagreed on whether a step carries bytes or on whether
    /// the traversal has ended. Two values of the same type never do this
    /// unless a `Transparent` impl is broken.
    TraversalDesync {
        /// 1-based index of the step at which the walks diverged.
        step: usize,
    },
    /// A walk ended on a step that still carried bytes.
    LeafOnFinalStep { step: usize },
    /// The configured step budget ran out before the walks finished.
    StepLimitExceeded { limit: usize },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareError::TraversalDesync { step } => {
                write!(f, "traversals diverged at step {step}")
            }
            CompareError::LeafOnFinalStep { step } => {
                write!(f, "final step {step} still carries a leaf")
            }
            CompareError::StepLimitExceeded { limit } => {
                write!(f, "step limit of {limit} exceeded")
            }
        }
    }
}

impl std::error::Error for CompareError {}
