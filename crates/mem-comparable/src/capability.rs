//! Capability classification: which decomposition strategy a type uses.
//!
//! Implementing [`Transparent`] is the registration. Every place a value enters
//! a comparable position (a closure argument, a struct member, a sequence
//! element) carries a `Transparent` bound, so a type without an impl is
//! rejected when the offending code is compiled rather than during a walk.

use crate::arena::StackArena;
use crate::step::{Leaf, Resume, Step};

/// The four mutually exclusive decomposition strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Compared by its full byte representation.
    Scalar,
    /// Exposes an ordered list of its members, each compared on its own.
    MemberExposing,
    /// Produces its own steps (closures and their binding chains).
    SelfDescribing,
    /// Decomposed by a rule defined outside the type (sequences, boxes, options).
    Specialized,
}

/// A type the comparator knows how to decompose.
///
/// # Safety
///
/// Implementations promise that:
/// - every [`Leaf`] returned, directly or through a continuation, points at
///   initialised memory owned by `self`, by the arena, or by a `static`, and
///   stays readable while `self` is borrowed and the arena slot is live;
/// - `CAPABILITY == Capability::Scalar` only for types whose whole byte
///   representation is significant: no padding, no embedded addresses;
/// - every continuation pops exactly the arena state its own strategy pushed,
///   and finally hands `parent` back.
pub unsafe trait Transparent {
    const CAPABILITY: Capability;

    /// First step of this value's traversal. Once the value is exhausted the
    /// walk continues at `parent`, or ends when `parent` is `None`.
    fn mem_compare_step(&self, parent: Option<Resume>, arena: &mut StackArena) -> Step;
}

/// Capability of `T`, fixed at compile time.
pub const fn capability_of<T: Transparent>() -> Capability {
    T::CAPABILITY
}

/// Compile-time check that `T` is transparent.
pub const fn assert_transparent<T: Transparent + ?Sized>() {}

/// Step for a scalar: its whole byte range, then straight back to `parent`.
#[inline]
pub fn scalar_step<T: Transparent>(value: &T, parent: Option<Resume>) -> Step {
    debug_assert_eq!(T::CAPABILITY, Capability::Scalar);
    Step::then(parent, Leaf::of(value))
}

/// Register flat types as scalars.
///
/// The caller vouches that the types contain no padding bytes and no
/// addresses, e.g. fieldless `#[repr(u8)]` enums or `#[repr(C)]` structs of
/// scalars without gaps.
///
/// ```
/// #[derive(Clone, Copy)]
/// #[repr(u8)]
/// enum Mode { Fast = 1, Exact = 2 }
///
/// mem_comparable::unsafe_scalar!(Mode);
///
/// assert!(mem_comparable::is_identical(&Mode::Fast, &Mode::Fast));
/// assert!(mem_comparable::is_updated(&Mode::Fast, &Mode::Exact));
/// ```
#[macro_export]
macro_rules! unsafe_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::Transparent for $ty {
                const CAPABILITY: $crate::Capability = $crate::Capability::Scalar;

                #[inline]
                fn mem_compare_step(
                    &self,
                    parent: ::core::option::Option<$crate::Resume>,
                    _arena: &mut $crate::StackArena,
                ) -> $crate::Step {
                    $crate::capability::scalar_step(self, parent)
                }
            }
        )+
    };
}

crate::unsafe_scalar!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, (),
);
