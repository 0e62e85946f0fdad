//! Structural memory comparison for closures and composite values.
//!
//! Answers one question: are two values of the same type byte-for-byte
//! identical in everything that matters? Values are decomposed into byte
//! ranges ("leaves") according to their [`Capability`], and both sides are
//! walked in lockstep without recursion: resume state lives in a
//! [`StackArena`], never on the call stack.
//!
//! The main use is change detection for partially applied callables, whose
//! bound arguments may themselves be closures, tuples or foreign composites
//! with no usable `PartialEq`.
//!
//! ```
//! use mem_comparable::{is_identical, is_updated};
//!
//! assert!(is_identical(&vec![1, 2], &vec![1, 2]));
//! assert!(is_updated(&vec![1, 2], &vec![1, 2, 3]));
//! assert!(is_updated(&(1u8, 'a'), &(1u8, 'b')));
//! ```
//!
//! Both arguments share one type parameter, so values of different shapes are
//! rejected by the compiler:
//!
//! ```compile_fail
//! mem_comparable::is_identical(&1u32, &1u64);
//! ```
//!
//! and so are types that never registered a capability:
//!
//! ```compile_fail
//! struct Opaque(u8);
//! mem_comparable::is_identical(&Opaque(1), &Opaque(1));
//! ```

pub mod arena;
pub mod capability;
pub mod closure;
pub mod compare;
pub mod error;
pub mod members;
pub mod memo;
pub mod sequence;
pub mod step;

pub use arena::StackArena;
pub use capability::{Capability, Transparent, assert_transparent, capability_of};
pub use closure::{Bound, Chain, Closure, FnLeaf, FnPtr, Fun, SplitFirst, closure_from_fp};
pub use compare::{CompareConfig, Comparator, Comparison, is_identical, is_updated};
pub use error::CompareError;
pub use members::{ExposeMembers, Member, Members};
pub use memo::Memo;
pub use step::{Continuation, Leaf, Resume, Step};

#[doc(hidden)]
pub use smallvec;
